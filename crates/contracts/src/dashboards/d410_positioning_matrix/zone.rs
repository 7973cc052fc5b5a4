use serde::{Deserialize, Serialize};

/// Real-income % split between the low and high brackets
pub const INCOME_THRESHOLD: f64 = 20.0;
/// ROI % split between the low and high brackets
pub const ROI_THRESHOLD: f64 = 40.0;

/// Profitability quadrant of the positioning matrix.
///
/// Brackets are half-open: `income < 20` is low and `income >= 20` is high,
/// `roi < 40` is low and `roi >= 40` is high. Values outside the chart range
/// are classified by the same rule. NaN counts as low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Low income, low ROI
    #[serde(rename = "Crítico")]
    Critical,
    /// Low income, high ROI
    #[serde(rename = "Eficiente")]
    Efficient,
    /// High income, low ROI
    #[serde(rename = "A Desarrollar")]
    ToDevelop,
    /// High income, high ROI
    #[serde(rename = "Ideal")]
    Ideal,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Critical, Zone::Efficient, Zone::ToDevelop, Zone::Ideal];

    pub fn classify(income_pct: f64, roi_pct: f64) -> Self {
        // `>=` is false for NaN, which puts it in the low bracket
        let high_income = income_pct >= INCOME_THRESHOLD;
        let high_roi = roi_pct >= ROI_THRESHOLD;
        match (high_income, high_roi) {
            (false, false) => Zone::Critical,
            (false, true) => Zone::Efficient,
            (true, false) => Zone::ToDevelop,
            (true, true) => Zone::Ideal,
        }
    }

    /// Display name as shown in tables and sent on the wire
    pub fn label(&self) -> &'static str {
        match self {
            Zone::Critical => "Crítico",
            Zone::Efficient => "Eficiente",
            Zone::ToDevelop => "A Desarrollar",
            Zone::Ideal => "Ideal",
        }
    }

    /// Row background colour
    pub fn background(&self) -> &'static str {
        match self {
            Zone::Critical => "#ffcccc",
            Zone::Efficient => "#cce5ff",
            Zone::ToDevelop => "#e6e6e6",
            Zone::Ideal => "#d4edda",
        }
    }

    pub fn text_color(&self) -> &'static str {
        match self {
            Zone::Critical => "#dc3545",
            Zone::Efficient => "#0056b3",
            Zone::ToDevelop => "#6c757d",
            Zone::Ideal => "#28a745",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Zone::Critical => "🔴",
            Zone::Efficient => "🔵",
            Zone::ToDevelop => "🟡",
            Zone::Ideal => "🟢",
        }
    }

    pub fn badge(&self) -> ZoneBadge {
        ZoneBadge {
            zona: *self,
            color_zona: self.background().to_string(),
            color_texto: self.text_color().to_string(),
            icono: self.icon().to_string(),
        }
    }
}

/// Zone plus its display attributes, flattened into every summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBadge {
    pub zona: Zone,
    /// Background colour
    pub color_zona: String,
    pub color_texto: String,
    pub icono: String,
}

impl ZoneBadge {
    pub fn for_point(income_pct: f64, roi_pct: f64) -> Self {
        Zone::classify(income_pct, roi_pct).badge()
    }
}
