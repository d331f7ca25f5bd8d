//! Host-independent plugin: gate a chart frame, lay it out, draw it, track hover.
//!
//! The host calls [`TreeGraphPlugin::after_draw`] once per redraw and
//! [`TreeGraphPlugin::pointer_move`] on every pointer move. Both recompute the
//! layout from the frame's dataset; only the [`InteractionState`] survives between calls.

use crate::coords::{ChartArea, Padding, Point};
use crate::error::{ConfigError, Error};
use crate::interaction::{DEFAULT_HIT_RADIUS, HitMode, InteractionState};
use crate::ir::TreeDataset;
use crate::layout::{Layout, LayoutEngine};
use crate::render::{RenderStyle, Renderer, Surface};
use serde::Deserialize;
use std::fmt::Display;

pub const PLUGIN_ID: &str = "treeGraph";
pub const SCATTER: &str = "scatter";

/// What the plugin sees of a host chart for one frame.
#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub chart_type: String,
    pub dataset: Option<TreeDataset>,
    pub area: ChartArea,
}

#[derive(Debug, Deserialize)]
struct ChartDocument {
    #[serde(rename = "type", default)]
    chart_type: Option<String>,
    data: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    datasets: Vec<TreeDataset>,
}

impl ChartFrame {
    pub fn scatter(dataset: TreeDataset, area: ChartArea) -> Self {
        Self {
            chart_type: SCATTER.to_string(),
            dataset: Some(dataset),
            area,
        }
    }

    /// Build a frame from what a live host chart exposes. `first_dataset` yields
    /// `None` when the chart has no first dataset, and is only consulted for scatter charts.
    pub fn from_host<E: Display>(
        chart_type: String,
        area: ChartArea,
        first_dataset: impl FnOnce() -> Option<Result<TreeDataset, E>>,
    ) -> Self {
        let dataset = if chart_type == SCATTER {
            match first_dataset() {
                Some(Ok(dataset)) => Some(dataset),
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "dataset could not be decoded");
                    None
                }
                None => None,
            }
        } else {
            None
        };
        Self {
            chart_type,
            dataset,
            area,
        }
    }

    /// Read either a chart config (`{"type", "data": {"datasets": [...]}}`) or a bare dataset.
    pub fn from_json(json: &str, area: ChartArea) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let is_chart = value
            .get("data")
            .is_some_and(|data| data.get("datasets").is_some());

        if is_chart {
            let doc = ChartDocument::deserialize(&value)?;
            let dataset = doc.data.datasets.into_iter().next();
            if dataset.is_none() {
                return Err(ConfigError::MissingDataset);
            }
            Ok(Self {
                chart_type: doc.chart_type.unwrap_or_else(|| SCATTER.to_string()),
                dataset,
                area,
            })
        } else {
            Ok(Self::scatter(TreeDataset::deserialize(&value)?, area))
        }
    }
}

#[derive(Debug, Clone)]
pub struct PluginOptions {
    pub style: RenderStyle,
    pub padding: Padding,
    pub hit_radius: f64,
    pub hit_mode: HitMode,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            padding: Padding::default(),
            hit_radius: DEFAULT_HIT_RADIUS,
            hit_mode: HitMode::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeGraphPlugin {
    engine: LayoutEngine,
    renderer: Renderer,
    hit_radius: f64,
    hit_mode: HitMode,
}

impl Default for TreeGraphPlugin {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}

impl TreeGraphPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            engine: LayoutEngine::default(),
            renderer: Renderer::new(options.style, options.padding),
            hit_radius: options.hit_radius,
            hit_mode: options.hit_mode,
        }
    }

    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    /// Lay out the frame, or `None` when the frame is not ours to draw.
    pub fn layout_frame<'f>(
        &self,
        frame: &'f ChartFrame,
    ) -> Result<Option<(Layout, &'f TreeDataset)>, Error> {
        if frame.chart_type != SCATTER {
            tracing::trace!(chart_type = %frame.chart_type, "not a scatter chart");
            return Ok(None);
        }
        let Some(dataset) = frame.dataset.as_ref() else {
            tracing::debug!("chart has no dataset");
            return Ok(None);
        };
        let edges = match dataset.edges() {
            Ok(edges) => edges,
            Err(err) => {
                tracing::debug!(error = %err, "dataset is not an edge list");
                return Ok(None);
            }
        };
        let layout = self.engine.layout(&edges, dataset.overrides())?;
        Ok(Some((layout, dataset)))
    }

    /// Draw hook. Returns whether anything was drawn; failures are logged, never raised.
    pub fn after_draw<S: Surface + ?Sized>(
        &self,
        frame: &ChartFrame,
        surface: &mut S,
        state: &InteractionState,
    ) -> bool {
        match self.try_draw(frame, surface, state) {
            Ok(drawn) => drawn,
            Err(err) => {
                tracing::warn!(error = %err, "tree graph frame skipped");
                false
            }
        }
    }

    /// Like [`after_draw`](Self::after_draw) but reports failures.
    pub fn try_draw<S: Surface + ?Sized>(
        &self,
        frame: &ChartFrame,
        surface: &mut S,
        state: &InteractionState,
    ) -> Result<bool, Error> {
        let Some((layout, dataset)) = self.layout_frame(frame)? else {
            return Ok(false);
        };
        if layout.is_empty() {
            return Ok(false);
        }
        self.renderer
            .render(surface, &layout, dataset, frame.area, state.hovered())?;
        Ok(true)
    }

    /// Update hover from a canvas-local pointer position. The caller should redraw afterwards.
    pub fn pointer_move<'s>(
        &self,
        frame: &ChartFrame,
        state: &'s mut InteractionState,
        pointer: Point,
    ) -> Option<&'s str> {
        let layout = match self.layout_frame(frame) {
            Ok(Some((layout, _))) => layout,
            Ok(None) => {
                state.clear();
                return None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "hit test skipped");
                state.clear();
                return None;
            }
        };
        let points = self.renderer.mapper(frame.area, &layout).node_points(&layout);
        state.pointer_moved(&layout, &points, pointer, self.hit_radius, self.hit_mode)
    }
}
