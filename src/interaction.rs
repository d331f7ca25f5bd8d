//! Pointer hit-testing and hover tracking.

use crate::coords::Point;
use crate::graph::NodeId;
use crate::layout::Layout;

pub const DEFAULT_HIT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitMode {
    /// First node within the radius, in layout order.
    #[default]
    FirstMatch,
    /// Closest node within the radius; ties go to the earlier node.
    Nearest,
}

impl HitMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Self::FirstMatch),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }
}

/// Find the node under `pointer`. `points` is indexed like `layout.nodes`.
pub fn hit_test(points: &[Point], pointer: Point, radius: f64, mode: HitMode) -> Option<NodeId> {
    let mut within = points
        .iter()
        .enumerate()
        .map(|(id, p)| (id, p.distance(pointer)))
        .filter(|&(_, d)| d <= radius);

    match mode {
        HitMode::FirstMatch => within.next().map(|(id, _)| id),
        HitMode::Nearest => within
            .fold(None, |best: Option<(NodeId, f64)>, (id, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((id, d)),
            })
            .map(|(id, _)| id),
    }
}

/// Hover selection for one chart. Stores the label, since node ids are only
/// valid for the frame that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    hovered: Option<String>,
    attached: bool,
}

impl InteractionState {
    /// State with a fixed selection, for headless rendering.
    pub fn hovering(label: Option<&str>) -> Self {
        Self {
            hovered: label.map(str::to_string),
            attached: false,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn clear(&mut self) {
        self.hovered = None;
    }

    /// Mark the pointer listener as installed. Returns false if it already was.
    pub fn attach(&mut self) -> bool {
        !std::mem::replace(&mut self.attached, true)
    }

    /// Replace the hover selection from a pointer position. Returns the new selection.
    pub fn pointer_moved(
        &mut self,
        layout: &Layout,
        points: &[Point],
        pointer: Point,
        radius: f64,
        mode: HitMode,
    ) -> Option<&str> {
        let hit = hit_test(points, pointer, radius, mode).map(|id| layout.nodes[id].label.clone());
        if hit != self.hovered {
            tracing::trace!(hovered = ?hit, "hover changed");
        }
        self.hovered = hit;
        self.hovered.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ChartArea, CoordinateMapper, Padding};
    use crate::ir::{Edge, TreeDataset};
    use crate::layout::LayoutEngine;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn test_hit_within_radius() {
        let points = vec![pt(0.0, 0.0), pt(100.0, 100.0)];
        assert_eq!(hit_test(&points, pt(6.0, 8.0), 10.0, HitMode::FirstMatch), Some(0));
        assert_eq!(hit_test(&points, pt(95.0, 95.0), 10.0, HitMode::FirstMatch), Some(1));
    }

    #[test]
    fn test_miss_outside_radius() {
        let points = vec![pt(0.0, 0.0)];
        assert_eq!(hit_test(&points, pt(8.0, 8.0), 10.0, HitMode::FirstMatch), None);
        assert_eq!(hit_test(&points, pt(8.0, 8.0), 10.0, HitMode::Nearest), None);
        assert_eq!(hit_test(&[], pt(0.0, 0.0), 10.0, HitMode::FirstMatch), None);
    }

    #[test]
    fn test_first_match_vs_nearest() {
        let points = vec![pt(0.0, 0.0), pt(8.0, 0.0)];
        let pointer = pt(6.0, 0.0);
        assert_eq!(hit_test(&points, pointer, 10.0, HitMode::FirstMatch), Some(0));
        assert_eq!(hit_test(&points, pointer, 10.0, HitMode::Nearest), Some(1));
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let points = vec![pt(0.0, 0.0), pt(10.0, 0.0)];
        assert_eq!(hit_test(&points, pt(5.0, 0.0), 10.0, HitMode::Nearest), Some(0));
    }

    #[test]
    fn test_hit_mode_from_str() {
        assert_eq!(HitMode::parse("first"), Some(HitMode::FirstMatch));
        assert_eq!(HitMode::parse("nearest"), Some(HitMode::Nearest));
        assert_eq!(HitMode::parse("closest"), None);
    }

    #[test]
    fn test_attach_once() {
        let mut state = InteractionState::default();
        assert!(state.attach());
        assert!(!state.attach());
        assert!(!state.attach());

        // Hover changes leave the flag alone
        state.clear();
        assert!(!state.attach());
    }

    #[test]
    fn test_pointer_moved() {
        let dataset = TreeDataset::from_edges(&[Edge::new("A", "B", 4.0), Edge::new("A", "C", 6.0)]);
        let edges = dataset.edges().unwrap();
        let layout = LayoutEngine::default()
            .layout(&edges, dataset.overrides())
            .unwrap();
        let area = ChartArea::new(0.0, 0.0, 500.0, 380.0);
        let points = CoordinateMapper::new(area, Padding::default(), &layout).node_points(&layout);

        let mut state = InteractionState::default();
        let b = points[layout.node_id("B").unwrap()];

        let hovered = state.pointer_moved(&layout, &points, pt(b.x + 3.0, b.y), 10.0, HitMode::FirstMatch);
        assert_eq!(hovered, Some("B"));
        assert_eq!(state.hovered(), Some("B"));

        state.pointer_moved(&layout, &points, pt(b.x + 30.0, b.y), 10.0, HitMode::FirstMatch);
        assert_eq!(state.hovered(), None);
    }
}
