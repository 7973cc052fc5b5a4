use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use crate::shared::chart_panel::ChartSpec;
use crate::shared::chart_state::{self, ChartState};

const ZOOM_CANVAS_ID: &str = "zoom-modal-canvas";
/// Share of the viewport the enlarged chart may use
const VIEWPORT_SHARE: f64 = 0.9;

/// How the enlarged chart is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomMode {
    /// New chart instance built from its own copy of the source chart's configuration
    Rebuild,
    /// Pixel copy of the source canvas, scaled with its aspect ratio
    Raster,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomRequest {
    pub title: String,
    pub source_canvas_id: String,
    /// Configuration the source chart was last drawn from
    pub spec: Option<ChartSpec>,
    pub mode: ZoomMode,
}

fn viewport() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1200.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    (w * VIEWPORT_SHARE, h * VIEWPORT_SHARE - 80.0)
}

fn draw(req: &ZoomRequest, holder: &mut ChartState) -> Result<(), wasm_bindgen::JsValue> {
    let source = chart_state::canvas_by_id(&req.source_canvas_id)?;
    let target = chart_state::canvas_by_id(ZOOM_CANVAS_ID)?;
    let (max_w, max_h) = viewport();
    match req.mode {
        ZoomMode::Raster => chart_state::copy_raster(&source, &target, max_w, max_h),
        ZoomMode::Rebuild => {
            let (w, h, _) = chart_state::fit_scale(
                source.client_width() as f64,
                source.client_height() as f64,
                max_w,
                max_h,
            );
            if let Some(parent) = target.parent_element() {
                let _ = parent.set_attribute(
                    "style",
                    &format!("width: {}px; height: {}px; position: relative;", w.round(), h.round()),
                );
            }
            let spec = req
                .spec
                .as_ref()
                .ok_or_else(|| wasm_bindgen::JsValue::from_str("no hay gráfico que ampliar"))?;
            holder.render(&spec.for_zoom().to_js_config()?)
        }
    }
}

/// Enlarged view of a chart. Open while `request` holds a value; closes on
/// Escape, overlay click or the close button.
#[component]
pub fn ZoomModal(request: RwSignal<Option<ZoomRequest>>) -> impl IntoView {
    let holder = StoredValue::new_local(ChartState::new(ZOOM_CANVAS_ID));

    let close = move || {
        holder.update_value(|h| h.destroy());
        request.set(None);
    };

    // Escape closes the modal
    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" && request.get_untracked().is_some() {
                    holder.update_value(|h| h.destroy());
                    request.set(None);
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    });

    // Draw once the modal canvas is in the DOM
    Effect::new(move |_| {
        let Some(req) = request.get() else {
            return;
        };
        leptos::leptos_dom::helpers::request_animation_frame(move || {
            holder.update_value(|h| {
                if let Err(e) = draw(&req, h) {
                    log::error!("Zoom failed for #{}: {:?}", req.source_canvas_id, e);
                }
            });
        });
    });

    let stop_propagation = move |ev: ev::MouseEvent| ev.stop_propagation();

    view! {
        {move || {
            request
                .get()
                .map(|req| {
                    view! {
                        <div class="modal-overlay" on:click=move |_| close()>
                            <div class="modal modal--zoom" on:click=stop_propagation>
                                <div class="modal-header">
                                    <h2 class="modal-title">{req.title.clone()}</h2>
                                    <button class="button button--icon modal__close" on:click=move |_| close()>
                                        "✕"
                                    </button>
                                </div>
                                <div class="modal-body">
                                    <div class="zoom-canvas-box">
                                        <canvas id=ZOOM_CANVAS_ID></canvas>
                                    </div>
                                </div>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
