use leptos::prelude::*;
use serde_json::Value;
use thaw::*;
use wasm_bindgen::JsValue;

use crate::shared::chart_state::{js_callback, set_path, to_js, ChartState};
use crate::shared::modal::{ZoomMode, ZoomRequest};

/// Chart.js config plus the JS bodies of its callbacks
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub config: Value,
    /// Body of `options.plugins.tooltip.callbacks.label(ctx)`
    pub tooltip_label: Option<String>,
}

/// Datasets flagged `_umbral` are reference lines, not data
const TOOLTIP_FILTER: &str = "return !ctx.dataset._umbral;";

impl ChartSpec {
    /// Fresh JS config with the callbacks attached. Every call builds new
    /// objects, so no two charts share their `data` or `options`.
    pub fn to_js_config(&self) -> Result<JsValue, JsValue> {
        let config = to_js(&self.config)?;
        set_path(
            &config,
            &["options", "plugins", "tooltip", "filter"],
            &js_callback(TOOLTIP_FILTER),
        )?;
        if let Some(body) = &self.tooltip_label {
            set_path(
                &config,
                &["options", "plugins", "tooltip", "callbacks", "label"],
                &js_callback(body),
            )?;
        }
        Ok(config)
    }

    /// Copy for the zoom modal; it fills its container instead of keeping the aspect ratio
    pub fn for_zoom(&self) -> ChartSpec {
        let mut config = self.config.clone();
        if let Some(options) = config.as_object_mut().and_then(|c| {
            c.entry("options")
                .or_insert_with(|| Value::Object(Default::default()))
                .as_object_mut()
        }) {
            options.insert("responsive".into(), Value::Bool(true));
            options.insert("maintainAspectRatio".into(), Value::Bool(false));
        }
        ChartSpec {
            config,
            tooltip_label: self.tooltip_label.clone(),
        }
    }
}

fn apply(chart: &mut ChartState, spec: &ChartSpec) -> Result<(), JsValue> {
    chart.replace_data(&spec.to_js_config()?)
}

/// Titled canvas that owns its chart. The chart is created from the first
/// `ChartSpec` and updated in place on later ones.
#[component]
pub fn ChartPanel(
    #[prop(into)] canvas_id: String,
    #[prop(into)] title: String,
    #[prop(into)] spec: Signal<Option<ChartSpec>>,
    zoom: RwSignal<Option<ZoomRequest>>,
    #[prop(optional)] raster_zoom: bool,
) -> impl IntoView {
    let chart = StoredValue::new_local(ChartState::new(canvas_id.clone()));

    Effect::new(move |_| {
        let Some(spec) = spec.get() else {
            return;
        };
        chart.update_value(|c| {
            if let Err(e) = apply(c, &spec) {
                log::error!("Chart update failed: {:?}", e);
            }
        });
    });

    let mode = if raster_zoom { ZoomMode::Raster } else { ZoomMode::Rebuild };
    let zoom_title = title.clone();
    let source_canvas_id = canvas_id.clone();
    let open_zoom = move |_| {
        zoom.set(Some(ZoomRequest {
            title: zoom_title.clone(),
            source_canvas_id: source_canvas_id.clone(),
            spec: spec.get_untracked(),
            mode,
        }))
    };

    view! {
        <div class="chart-panel">
            <div class="chart-panel__header">
                <h3 class="chart-panel__title">{title}</h3>
                <Button size=ButtonSize::Small appearance=ButtonAppearance::Subtle on_click=open_zoom>
                    "🔍 Ampliar"
                </Button>
            </div>
            <div class="chart-panel__canvas">
                <canvas id=canvas_id></canvas>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> ChartSpec {
        ChartSpec {
            config: json!({
                "type": "bubble",
                "data": {"datasets": [{"label": "Walmart", "data": [{"x": 10.0, "y": 20.0, "r": 8.0}]}]},
                "options": {"maintainAspectRatio": true, "scales": {"y": {"max": 60.0}}}
            }),
            tooltip_label: Some("return ctx.dataset.label;".into()),
        }
    }

    #[test]
    fn zoom_copy_fills_its_container() {
        let zoomed = spec().for_zoom();
        assert_eq!(zoomed.config["options"]["maintainAspectRatio"], false);
        assert_eq!(zoomed.config["options"]["responsive"], true);
        assert_eq!(zoomed.config["options"]["scales"]["y"]["max"], 60.0);
        assert_eq!(zoomed.config["data"], spec().config["data"]);
        assert_eq!(zoomed.tooltip_label, spec().tooltip_label);
    }

    #[test]
    fn zoom_copy_is_independent_of_the_panel_chart() {
        let original = spec();
        let mut zoomed = original.for_zoom();
        zoomed.config["data"]["datasets"][0]["data"][0]["x"] = json!(99.0);
        zoomed.config["options"]["scales"]["y"]["max"] = json!(100.0);

        assert_eq!(original.config["data"]["datasets"][0]["data"][0]["x"], 10.0);
        assert_eq!(original.config["options"]["scales"]["y"]["max"], 60.0);
        assert_eq!(original.config["options"]["maintainAspectRatio"], true);
    }

    #[test]
    fn zoom_copy_adds_options_when_missing() {
        let bare = ChartSpec {
            config: json!({"type": "line", "data": {"datasets": []}}),
            tooltip_label: None,
        };
        let zoomed = bare.for_zoom();
        assert_eq!(zoomed.config["options"]["maintainAspectRatio"], false);
        assert!(bare.config.get("options").is_none());
    }
}
