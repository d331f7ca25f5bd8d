use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <chart.json> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>   Output file (default: stdout)");
    eprintln!("  -W, --width <px>      Canvas width (default: 800)");
    eprintln!("  -H, --height <px>     Canvas height (default: 600)");
    eprintln!("      --hover <label>   Draw the tooltip of this node");
    eprintln!();
    eprintln!("Set TREEGRAPH_LOG (e.g. debug) for diagnostics.");
    process::exit(1);
}

fn parse_px(flag: &str, value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(v) if v > 0.0 => v,
        _ => {
            eprintln!("Invalid {}: {}", flag, value);
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TREEGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut width = 800.0;
    let mut height = 600.0;
    let mut hover: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-W" | "--width" => {
                i += 1;
                if i < args.len() {
                    width = parse_px("width", &args[i]);
                }
            }
            "-H" | "--height" => {
                i += 1;
                if i < args.len() {
                    height = parse_px("height", &args[i]);
                }
            }
            "--hover" => {
                i += 1;
                if i < args.len() {
                    hover = Some(args[i].clone());
                }
            }
            "-h" | "--help" => usage(&args[0]),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let svg = match treegraph::render_svg(&input, width, height, hover.as_deref()) {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Render error: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &svg) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", svg),
    }
}
