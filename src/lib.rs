pub mod coords;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod measure;
pub mod plugin;
pub mod render;
pub mod svg;
pub mod wasm;

use wasm_bindgen::prelude::*;

use coords::ChartArea;
use error::Error;
use interaction::InteractionState;
use plugin::{ChartFrame, TreeGraphPlugin};
use svg::SvgSurface;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render a chart config or bare dataset (JSON) to an SVG document of the given size.
///
/// Frames the plugin would skip (wrong chart type, non-edge data) produce an empty SVG;
/// cyclic graphs are an error here since there is no host to fall back to.
pub fn render_svg(
    json: &str,
    width: f64,
    height: f64,
    hovered: Option<&str>,
) -> Result<String, Error> {
    let frame = ChartFrame::from_json(json, ChartArea::new(0.0, 0.0, width, height))?;
    let state = InteractionState::hovering(hovered);

    let mut surface = SvgSurface::new(width, height);
    TreeGraphPlugin::default().try_draw(&frame, &mut surface, &state)?;
    Ok(surface.finish())
}

/// Render tree graph JSON to SVG
#[wasm_bindgen(js_name = "treeGraphToSvg")]
pub fn render_tree_graph(json: &str, width: f64, height: f64) -> Result<String, String> {
    render_svg(json, width, height, None).map_err(|e| e.to_string())
}
