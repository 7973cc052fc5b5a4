pub mod api_utils;
pub mod chart_panel;
pub mod chart_state;
pub mod error_banner;
pub mod export;
pub mod format;
pub mod modal;
pub mod request_sequencer;

/// Blocking browser alert; errors must not go unnoticed
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
