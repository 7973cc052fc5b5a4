use contracts::dashboards::d411_bf_compliance::{
    BfComplianceRequest, BfPreset, BfProductType, ALL_BF_CATEGORIES, ALL_BF_CHANNELS,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Value of an enum as sent on the wire, e.g. `BfPreset::LastSevenDays` -> `"7"`
pub fn wire_value<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

pub fn from_wire<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(text.to_string())).ok()
}

pub const PRESETS: [(BfPreset, &str); 4] = [
    (BfPreset::Today, "Hoy"),
    (BfPreset::LastSevenDays, "Últimos 7 días"),
    (BfPreset::CurrentMonth, "Mes completo"),
    (BfPreset::Custom, "Personalizado"),
];

pub const PRODUCT_TYPES: [(BfProductType, &str); 4] = [
    (BfProductType::All, "Todos"),
    (BfProductType::Relevant, "Relevantes"),
    (BfProductType::New, "Nuevos"),
    (BfProductType::Clearance, "Remate"),
];

/// Form state of the filter bar
#[derive(Debug, Clone, PartialEq)]
pub struct BfFilterForm {
    pub preset: BfPreset,
    pub tipo: BfProductType,
    pub canal: String,
    pub categoria: String,
    /// `YYYY-MM-DD` from the date inputs
    pub desde: String,
    pub hasta: String,
}

impl Default for BfFilterForm {
    fn default() -> Self {
        Self {
            preset: BfPreset::CurrentMonth,
            tipo: BfProductType::All,
            canal: ALL_BF_CHANNELS.to_string(),
            categoria: ALL_BF_CATEGORIES.to_string(),
            desde: String::new(),
            hasta: String::new(),
        }
    }
}

impl BfFilterForm {
    /// Custom range text; a missing end date means a single day
    pub fn range_text(&self) -> String {
        match (self.desde.trim(), self.hasta.trim()) {
            ("", _) => String::new(),
            (from, "") => from.to_string(),
            (from, to) => format!("{} a {}", from, to),
        }
    }

    /// Client-side check before a custom range is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.preset == BfPreset::Custom && self.desde.trim().is_empty() {
            return Err("Selecciona la fecha inicial del rango personalizado".to_string());
        }
        Ok(())
    }

    pub fn to_request(&self) -> BfComplianceRequest {
        BfComplianceRequest {
            preset: self.preset,
            tipo: self.tipo,
            canal: self.canal.clone(),
            categoria: self.categoria.clone(),
            rango: if self.preset == BfPreset::Custom {
                self.range_text()
            } else {
                String::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_use_wire_names() {
        assert_eq!(wire_value(&BfPreset::LastSevenDays), "7");
        assert_eq!(wire_value(&BfProductType::Clearance), "remate");
        assert_eq!(from_wire::<BfPreset>("personalizado"), Some(BfPreset::Custom));
        assert_eq!(from_wire::<BfPreset>("30"), None);
    }

    #[test]
    fn custom_range_goes_into_request() {
        let form = BfFilterForm {
            preset: BfPreset::Custom,
            desde: "2024-11-01".into(),
            hasta: "2024-11-03".into(),
            ..Default::default()
        };
        assert_eq!(form.to_request().rango, "2024-11-01 a 2024-11-03");

        let single = BfFilterForm { hasta: String::new(), ..form.clone() };
        assert_eq!(single.to_request().rango, "2024-11-01");

        let month = BfFilterForm { preset: BfPreset::CurrentMonth, ..form };
        assert_eq!(month.to_request().rango, "");
    }

    #[test]
    fn custom_preset_needs_a_start_date() {
        let form = BfFilterForm { preset: BfPreset::Custom, ..Default::default() };
        assert!(form.validate().is_err());
        assert!(BfFilterForm::default().validate().is_ok());
    }
}
