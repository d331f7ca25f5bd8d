//! Normalized layout space to pixel space.

use crate::layout::{Layout, LayoutNode};
use serde::Deserialize;

/// Drawable rectangle in canvas pixels, as reported by the host chart.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChartArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ChartArea {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub x: f64,
    pub y: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self { x: 50.0, y: 40.0 }
    }
}

/// Per-frame mapping. Holds the actual y range of the layout so that the
/// topmost and bottommost nodes touch the padded edges.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    area: ChartArea,
    padding: Padding,
    max_depth: i64,
    min_y: f64,
    max_y: f64,
}

impl CoordinateMapper {
    pub fn new(area: ChartArea, padding: Padding, layout: &Layout) -> Self {
        let (min_y, max_y) = layout.y_range().unwrap_or((0.0, 0.0));
        Self {
            area,
            padding,
            max_depth: layout.max_depth,
            min_y,
            max_y,
        }
    }

    pub fn to_canvas(&self, depth: i64, y: f64) -> Point {
        let width = self.area.width() - 2.0 * self.padding.x;
        let height = self.area.height() - 2.0 * self.padding.y;

        let depth_span = if self.max_depth == 0 { 1.0 } else { self.max_depth as f64 };
        let y_span = non_zero(self.max_y - self.min_y);
        let y_norm = (y - self.min_y) / y_span;

        Point {
            x: self.area.left + self.padding.x + (depth as f64 / depth_span) * width,
            y: self.area.top + self.padding.y + y_norm * height,
        }
    }

    pub fn node_point(&self, node: &LayoutNode) -> Point {
        self.to_canvas(node.depth, node.y)
    }

    /// Pixel position of every node, indexed like `layout.nodes`.
    pub fn node_points(&self, layout: &Layout) -> Vec<Point> {
        layout.nodes.iter().map(|n| self.node_point(n)).collect()
    }
}

/// Client (viewport) pointer coordinates to canvas-local ones.
pub fn client_to_canvas(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Point {
    Point {
        x: client_x - rect_left,
        y: client_y - rect_top,
    }
}

fn non_zero(span: f64) -> f64 {
    if span == 0.0 || span.is_nan() { 1.0 } else { span }
}
