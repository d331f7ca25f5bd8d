//! Draw routines for one frame. Everything here is a function of the layout,
//! the dataset styling and the hover selection; nothing is cached between frames.

use crate::coords::{ChartArea, CoordinateMapper, Padding, Point};
use crate::error::RenderError;
use crate::ir::TreeDataset;
use crate::layout::{Layout, LayoutNode};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
        }
    }
}

/// The subset of a 2D canvas context the renderer needs.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError>;
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError>;
    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError>;
}

/// Visual constants. Passed through untouched by the layout.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub node_radius: f64,
    pub edge_color: String,
    pub edge_width: f64,
    pub font: String,
    pub label_color: String,
    pub label_offset: f64,
    pub tooltip_background: String,
    pub tooltip_color: String,
    pub tooltip_padding: f64,
    pub tooltip_height: f64,
    pub tooltip_offset: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            node_radius: 10.0,
            edge_color: "#888".to_string(),
            edge_width: 2.0,
            font: "bold 14px sans-serif".to_string(),
            label_color: "#222".to_string(),
            label_offset: 14.0,
            tooltip_background: "rgba(0,0,0,0.7)".to_string(),
            tooltip_color: "#fff".to_string(),
            tooltip_padding: 6.0,
            tooltip_height: 20.0,
            tooltip_offset: 30.0,
        }
    }
}

/// Fill and optional border ring for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePaint<'a> {
    pub fill: &'a str,
    pub border_width: i64,
    pub border_color: &'a str,
}

impl<'a> NodePaint<'a> {
    pub fn for_node(dataset: &'a TreeDataset, label: &str) -> Self {
        Self {
            fill: dataset.node_color(label),
            border_width: dataset.border_width(),
            border_color: dataset.border_color(),
        }
    }
}

/// Tooltip text: "label: value".
pub fn tooltip_text(node: &LayoutNode) -> String {
    format!("{}: {}", node.label, node.value)
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub style: RenderStyle,
    pub padding: Padding,
}

impl Renderer {
    pub fn new(style: RenderStyle, padding: Padding) -> Self {
        Self { style, padding }
    }

    pub fn mapper(&self, area: ChartArea, layout: &Layout) -> CoordinateMapper {
        CoordinateMapper::new(area, self.padding, layout)
    }

    /// Draw edges, then nodes with labels, then the tooltip of `hovered` if it is in the layout.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &Layout,
        dataset: &TreeDataset,
        area: ChartArea,
        hovered: Option<&str>,
    ) -> Result<(), RenderError> {
        let mapper = self.mapper(area, layout);
        let points = mapper.node_points(layout);

        for (from, to) in layout.links() {
            self.draw_edge(surface, points[from], points[to]);
        }

        for (node, &point) in layout.nodes.iter().zip(&points) {
            let paint = NodePaint::for_node(dataset, &node.label);
            self.draw_node(surface, point, &node.label, paint)?;
        }

        if let Some(id) = hovered.and_then(|label| layout.node_id(label)) {
            let node = &layout.nodes[id];
            self.draw_tooltip(surface, points[id], &tooltip_text(node))?;
        }

        Ok(())
    }

    /// Cubic S-curve between two node centers.
    pub fn draw_edge<S: Surface + ?Sized>(&self, surface: &mut S, from: Point, to: Point) {
        let dx = (to.x - from.x) * 0.5;

        surface.save();
        surface.set_stroke_style(&self.style.edge_color);
        surface.set_line_width(self.style.edge_width);
        surface.begin_path();
        surface.move_to(from.x, from.y);
        surface.bezier_curve_to(from.x + dx, from.y, to.x - dx, to.y, to.x, to.y);
        surface.stroke();
        surface.restore();
    }

    pub fn draw_node<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        at: Point,
        label: &str,
        paint: NodePaint<'_>,
    ) -> Result<(), RenderError> {
        let radius = self.style.node_radius;

        surface.save();

        // Border ring: a larger circle underneath
        if paint.border_width > 0 {
            surface.begin_path();
            surface.arc(at.x, at.y, radius + paint.border_width as f64 / 2.0, 0.0, 2.0 * PI)?;
            surface.set_fill_style(paint.border_color);
            surface.fill();
        }

        surface.begin_path();
        surface.arc(at.x, at.y, radius, 0.0, 2.0 * PI)?;
        surface.set_fill_style(paint.fill);
        surface.fill();

        surface.set_font(&self.style.font);
        surface.set_fill_style(&self.style.label_color);
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Top);
        surface.fill_text(label, at.x, at.y + self.style.label_offset)?;

        surface.restore();
        Ok(())
    }

    pub fn draw_tooltip<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        at: Point,
        text: &str,
    ) -> Result<(), RenderError> {
        let padding = self.style.tooltip_padding;
        let height = self.style.tooltip_height;

        surface.save();
        surface.set_font(&self.style.font);
        let width = surface.measure_text(text)?;

        surface.set_fill_style(&self.style.tooltip_background);
        surface.fill_rect(
            at.x - width / 2.0 - padding,
            at.y - self.style.tooltip_offset,
            width + 2.0 * padding,
            height,
        );

        surface.set_fill_style(&self.style.tooltip_color);
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.fill_text(text, at.x, at.y - self.style.tooltip_offset + height / 2.0)?;
        surface.restore();
        Ok(())
    }
}
