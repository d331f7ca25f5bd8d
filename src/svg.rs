use crate::error::RenderError;
use crate::measure::TextMetrics;
use crate::render::{Surface, TextAlign, TextBaseline};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
struct DrawState {
    fill: String,
    stroke: String,
    line_width: f64,
    font: String,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: "#000".to_string(),
            stroke: "#000".to_string(),
            line_width: 1.0,
            font: "10px sans-serif".to_string(),
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

/// A `Surface` that accumulates SVG elements instead of painting pixels.
pub struct SvgSurface {
    width: f64,
    height: f64,
    metrics: TextMetrics,
    body: String,
    path: String,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            metrics: TextMetrics::default(),
            body: String::new(),
            path: String::new(),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    /// Close the document.
    pub fn finish(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn push_segment(&mut self, segment: &str) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push_str(segment);
    }
}

impl Surface for SvgSurface {
    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_fill_style(&mut self, color: &str) {
        self.state.fill = color.to_string();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.state.stroke = color.to_string();
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.baseline = baseline;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push_segment(&format!("M {} {}", x, y));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.push_segment(&format!("C {} {} {} {} {} {}", cp1x, cp1y, cp2x, cp2y, x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        if radius < 0.0 {
            return Err(RenderError::Surface(format!("negative arc radius {}", radius)));
        }
        let lead = if self.path.is_empty() { "M" } else { "L" };
        let (sx, sy) = (x + radius * start.cos(), y + radius * start.sin());

        if end - start >= 2.0 * PI - f64::EPSILON {
            // Full circle: two half arcs
            let (mx, my) = (x - radius * start.cos(), y - radius * start.sin());
            self.push_segment(&format!(
                "{lead} {sx} {sy} A {r} {r} 0 1 1 {mx} {my} A {r} {r} 0 1 1 {sx} {sy} Z",
                r = radius
            ));
        } else {
            let (ex, ey) = (x + radius * end.cos(), y + radius * end.sin());
            let large = if (end - start).rem_euclid(2.0 * PI) > PI { 1 } else { 0 };
            self.push_segment(&format!(
                "{lead} {sx} {sy} A {r} {r} 0 {large} 1 {ex} {ey}",
                r = radius
            ));
        }
        Ok(())
    }

    fn fill(&mut self) {
        self.body.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\" />\n",
            self.path,
            escape_xml(&self.state.fill)
        ));
    }

    fn stroke(&mut self) {
        self.body.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" />\n",
            self.path,
            escape_xml(&self.state.stroke),
            self.state.line_width
        ));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.body.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" />\n",
            x,
            y,
            width,
            height,
            escape_xml(&self.state.fill)
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        let anchor = match self.state.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match self.state.baseline {
            TextBaseline::Top => "text-before-edge",
            TextBaseline::Middle => "central",
            TextBaseline::Alphabetic => "alphabetic",
        };
        self.body.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" style=\"font: {}\" text-anchor=\"{}\" dominant-baseline=\"{}\">{}</text>\n",
            x,
            y,
            escape_xml(&self.state.fill),
            escape_xml(&self.state.font),
            anchor,
            baseline,
            escape_xml(text)
        ));
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError> {
        Ok(self.metrics.text_width(text))
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ChartArea, Point};
    use crate::ir::{Edge, TreeDataset};
    use crate::layout::LayoutEngine;
    use crate::render::{NodePaint, Renderer};

    #[test]
    fn test_render_basic() {
        let dataset = TreeDataset::from_edges(&[Edge::new("Root", "Leaf", 3.0)]);
        let edges = dataset.edges().unwrap();
        let layout = LayoutEngine::default()
            .layout(&edges, dataset.overrides())
            .unwrap();

        let mut surface = SvgSurface::new(400.0, 300.0);
        Renderer::default()
            .render(
                &mut surface,
                &layout,
                &dataset,
                ChartArea::new(0.0, 0.0, 400.0, 300.0),
                None,
            )
            .unwrap();
        let svg = surface.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Root"));
        assert!(svg.contains("Leaf"));
        assert!(svg.contains(r##"stroke="#888""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_unicode_and_escape() {
        let mut surface = SvgSurface::new(100.0, 100.0);
        let paint = NodePaint {
            fill: "black",
            border_width: 0,
            border_color: "black",
        };
        Renderer::default()
            .draw_node(&mut surface, Point { x: 50.0, y: 50.0 }, "ノード<&>", paint)
            .unwrap();
        let svg = surface.finish();

        assert!(svg.contains("ノード&lt;&amp;&gt;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_save_restore() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.set_fill_style("red");
        surface.save();
        surface.set_fill_style("blue");
        surface.restore();
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);

        assert!(surface.finish().contains(r#"fill="red""#));
    }

    #[test]
    fn test_full_circle_path() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        surface.begin_path();
        surface.arc(5.0, 5.0, 2.0, 0.0, 2.0 * PI).unwrap();
        surface.fill();
        let svg = surface.finish();

        assert!(svg.contains("M 7 5 A 2 2 0 1 1 3 5 A 2 2 0 1 1 7 5 Z"));
    }

    #[test]
    fn test_negative_radius() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        assert!(surface.arc(0.0, 0.0, -1.0, 0.0, PI).is_err());
    }

    #[test]
    fn test_measure_text() {
        let mut surface = SvgSurface::new(10.0, 10.0);
        assert_eq!(surface.measure_text("A: 4").unwrap(), 32.0);
    }
}
