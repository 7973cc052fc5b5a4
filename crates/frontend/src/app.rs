use leptos::prelude::*;
use thaw::ConfigProvider;

use crate::dashboards::{BfComplianceDashboard, PositioningMatrixDashboard};

/// Path prefix under which the backend mounts the BF module
const BF_PATH: &str = "/cumplimiento-bf";

/// Which dashboard the page was loaded for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    PositioningMatrix,
    BfCompliance,
}

impl Page {
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(BF_PATH) {
            Page::BfCompliance
        } else {
            Page::PositioningMatrix
        }
    }
}

fn current_page() -> Page {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    Page::from_path(&path)
}

#[component]
pub fn App() -> impl IntoView {
    let page = current_page();
    log::info!("Mounting {:?}", page);

    view! {
        <ConfigProvider>
            {match page {
                Page::PositioningMatrix => view! { <PositioningMatrixDashboard /> }.into_any(),
                Page::BfCompliance => view! { <BfComplianceDashboard /> }.into_any(),
            }}
        </ConfigProvider>
    }
}
