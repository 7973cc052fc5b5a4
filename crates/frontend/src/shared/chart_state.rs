//! Chart.js instances owned by the component that renders them.
//!
//! Chart.js is loaded from `index.html` as the global `Chart`; it is reached
//! through `Reflect` the same way the other JS globals are.

use js_sys::{Array, Function, Object, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// One chart bound to one canvas
pub struct ChartState {
    canvas_id: String,
    chart: Option<JsValue>,
}

impl ChartState {
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            chart: None,
        }
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn is_rendered(&self) -> bool {
        self.chart.is_some()
    }

    /// Create the chart from a full Chart.js config, replacing any previous one
    pub fn render(&mut self, config: &JsValue) -> Result<(), JsValue> {
        self.destroy();
        let canvas = canvas_by_id(&self.canvas_id)?;
        self.chart = Some(construct_chart(&canvas, config)?);
        Ok(())
    }

    /// Swap data and options in place and redraw; renders on first use
    pub fn replace_data(&mut self, config: &JsValue) -> Result<(), JsValue> {
        let Some(chart) = &self.chart else {
            return self.render(config);
        };
        for key in ["data", "options"] {
            let value = Reflect::get(config, &JsValue::from_str(key))?;
            Reflect::set(chart, &JsValue::from_str(key), &value)?;
        }
        call_method(chart, "update")?;
        Ok(())
    }

    pub fn destroy(&mut self) {
        if let Some(chart) = self.chart.take() {
            if let Err(e) = call_method(&chart, "destroy") {
                log::warn!("Chart destroy failed on {}: {:?}", self.canvas_id, e);
            }
        }
    }
}

impl Drop for ChartState {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Serialize a config built with `serde_json::json!` into a plain JS object
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Set `value` at `path` (e.g. `["options", "plugins", "tooltip", "callbacks", "label"]`),
/// creating intermediate objects
pub fn set_path(target: &JsValue, path: &[&str], value: &JsValue) -> Result<(), JsValue> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut current = target.clone();
    for key in parents {
        let k = JsValue::from_str(key);
        let mut next = Reflect::get(&current, &k)?;
        if next.is_undefined() || next.is_null() {
            next = Object::new().into();
            Reflect::set(&current, &k, &next)?;
        }
        current = next;
    }
    Reflect::set(&current, &JsValue::from_str(last), value)?;
    Ok(())
}

/// JS function `(ctx) => body`
pub fn js_callback(body: &str) -> JsValue {
    Function::new_with_args("ctx", body).into()
}

pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{} not found", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", id)))
}

fn chart_constructor() -> Result<Function, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let ctor = Reflect::get(&window, &JsValue::from_str("Chart"))?;
    if !ctor.is_function() {
        return Err(JsValue::from_str("Chart.js no está cargado"));
    }
    ctor.dyn_into()
}

fn construct_chart(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<JsValue, JsValue> {
    let ctor = chart_constructor()?;
    Reflect::construct(&ctor, &Array::of2(canvas, config))
}

fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.call0(target)
}

/// Size that fits `src` inside `max` with the aspect ratio preserved.
/// Returns `(width, height, scale)`.
pub fn fit_scale(src_w: f64, src_h: f64, max_w: f64, max_h: f64) -> (f64, f64, f64) {
    if src_w <= 0.0 || src_h <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let scale = (max_w / src_w).min(max_h / src_h);
    (src_w * scale, src_h * scale, scale)
}

/// Copy the pixels of `source` into `target`, scaled to fit `max_w` x `max_h`
pub fn copy_raster(
    source: &HtmlCanvasElement,
    target: &HtmlCanvasElement,
    max_w: f64,
    max_h: f64,
) -> Result<(), JsValue> {
    let (w, h, _) = fit_scale(source.width() as f64, source.height() as f64, max_w, max_h);
    target.set_width(w.round() as u32);
    target.set_height(h.round() as u32);

    let ctx = target
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.set_image_smoothing_enabled(true);
    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(source, 0.0, 0.0, w, h)
}
