//! Browser bindings: the Chart.js-style plugin object and a canvas `Surface`.

use crate::coords::{ChartArea, client_to_canvas};
use crate::error::RenderError;
use crate::interaction::{HitMode, InteractionState};
use crate::ir::TreeDataset;
use crate::plugin::{ChartFrame, PLUGIN_ID, PluginOptions, SCATTER, TreeGraphPlugin};
use crate::render::{Surface, TextAlign, TextBaseline};
use js_sys::{Function, Object, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

/// `Surface` over a browser 2D context.
pub struct CanvasSurface(pub CanvasRenderingContext2d);

fn surface_error(e: JsValue) -> RenderError {
    RenderError::Surface(format!("{:?}", e))
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.0.save();
    }

    fn restore(&mut self) {
        self.0.restore();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.0.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.0.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.0.set_line_width(width);
    }

    fn set_font(&mut self, font: &str) {
        self.0.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.0.set_text_align(align.as_str());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.0.set_text_baseline(baseline.as_str());
    }

    fn begin_path(&mut self) {
        self.0.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.0.move_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.0.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        self.0.arc(x, y, radius, start, end).map_err(surface_error)
    }

    fn fill(&mut self) {
        self.0.fill();
    }

    fn stroke(&mut self) {
        self.0.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.0.fill_rect(x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        self.0.fill_text(text, x, y).map_err(surface_error)
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, RenderError> {
        self.0
            .measure_text(text)
            .map(|m| m.width())
            .map_err(surface_error)
    }
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

/// Snapshot the parts of a host chart the plugin reads.
fn read_frame(chart: &JsValue) -> Result<ChartFrame, JsValue> {
    let chart_type = get(&get(chart, "config")?, "type")?
        .as_string()
        .unwrap_or_default();

    let area: ChartArea = serde_wasm_bindgen::from_value(get(chart, "chartArea")?)?;

    Ok(ChartFrame::from_host(chart_type, area, || {
        let first = get(&get(chart, "data").ok()?, "datasets")
            .and_then(|datasets| Reflect::get_u32(&datasets, 0))
            .ok()?;
        if first.is_undefined() || first.is_null() {
            return None;
        }
        Some(serde_wasm_bindgen::from_value::<TreeDataset>(first))
    }))
}

fn request_redraw(chart: &JsValue) -> Result<(), JsValue> {
    let draw: Function = get(chart, "draw")?.dyn_into()?;
    draw.call0(chart)?;
    Ok(())
}

struct Listener {
    canvas: HtmlCanvasElement,
    callback: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    fn detach(&self) {
        if let Err(err) = self
            .canvas
            .remove_event_listener_with_callback("mousemove", self.callback.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?err, "could not remove pointer listener");
        }
    }
}

struct ChartEntry {
    chart: JsValue,
    state: Rc<RefCell<InteractionState>>,
    // Kept alive until the chart is destroyed; the canvas holds a reference to it.
    listener: Option<Listener>,
}

/// Plugin object to hand to `Chart.register`.
#[wasm_bindgen(js_name = "TreeGraphPlugin")]
pub struct TreeGraphHook {
    plugin: TreeGraphPlugin,
    charts: Vec<ChartEntry>,
}

#[wasm_bindgen(js_class = "TreeGraphPlugin")]
impl TreeGraphHook {
    /// `hit_mode` is "first" (default) or "nearest".
    #[wasm_bindgen(constructor)]
    pub fn new(hit_mode: Option<String>) -> Self {
        let hit_mode = hit_mode
            .as_deref()
            .and_then(HitMode::parse)
            .unwrap_or_default();
        Self {
            plugin: TreeGraphPlugin::new(PluginOptions {
                hit_mode,
                ..PluginOptions::default()
            }),
            charts: Vec::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        PLUGIN_ID.to_string()
    }

    /// Host draw hook. Never throws for data problems; those just skip the frame.
    #[wasm_bindgen(js_name = "afterDraw")]
    pub fn after_draw(&mut self, chart: JsValue) -> Result<(), JsValue> {
        let frame = match read_frame(&chart) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::debug!(error = ?err, "chart not readable");
                return Ok(());
            }
        };
        if frame.chart_type != SCATTER || frame.dataset.is_none() {
            return Ok(());
        }

        let ctx: CanvasRenderingContext2d = get(&chart, "ctx")?.dyn_into()?;
        let index = self.entry(&chart);
        let state = Rc::clone(&self.charts[index].state);

        let drawn = {
            let state = state.borrow();
            self.plugin.after_draw(&frame, &mut CanvasSurface(ctx), &state)
        };

        if drawn && state.borrow_mut().attach() {
            self.attach_listener(index)?;
        }
        Ok(())
    }

    /// Host destroy hook: detach the pointer listener and forget the chart.
    #[wasm_bindgen(js_name = "afterDestroy")]
    pub fn after_destroy(&mut self, chart: JsValue) {
        let Some(index) = self.position(&chart) else {
            return;
        };
        let entry = self.charts.swap_remove(index);
        if let Some(listener) = entry.listener {
            listener.detach();
            tracing::debug!("pointer listener detached");
        }
    }
}

impl TreeGraphHook {
    fn position(&self, chart: &JsValue) -> Option<usize> {
        self.charts.iter().position(|e| Object::is(&e.chart, chart))
    }

    fn entry(&mut self, chart: &JsValue) -> usize {
        if let Some(index) = self.position(chart) {
            return index;
        }
        self.charts.push(ChartEntry {
            chart: chart.clone(),
            state: Rc::new(RefCell::new(InteractionState::default())),
            listener: None,
        });
        self.charts.len() - 1
    }

    fn attach_listener(&mut self, index: usize) -> Result<(), JsValue> {
        let entry = &mut self.charts[index];
        let canvas: HtmlCanvasElement = get(&entry.chart, "canvas")?.dyn_into()?;

        let chart = entry.chart.clone();
        let state = Rc::clone(&entry.state);
        let plugin = self.plugin.clone();
        let target = canvas.clone();

        let callback = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let frame = match read_frame(&chart) {
                Ok(frame) => frame,
                Err(_) => return,
            };
            let rect = target.get_bounding_client_rect();
            let pointer = client_to_canvas(
                event.client_x() as f64,
                event.client_y() as f64,
                rect.left(),
                rect.top(),
            );
            plugin.pointer_move(&frame, &mut state.borrow_mut(), pointer);
            if let Err(err) = request_redraw(&chart) {
                tracing::warn!(error = ?err, "redraw request failed");
            }
        });

        canvas.add_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref())?;
        entry.listener = Some(Listener { canvas, callback });
        tracing::debug!("pointer listener attached");
        Ok(())
    }
}
