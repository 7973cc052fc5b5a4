//! Display catalogue for sales channels and SKU classification labels.

/// Colour used for unknown channels and unclassified SKUs
pub const FALLBACK_COLOR: &str = "#6c757d";

/// Label given to SKUs without a classification
pub const UNCLASSIFIED: &str = "Sin Clasificar";

/// (channel, abbreviation, colour)
const CHANNELS: &[(&str, &str, &str)] = &[
    ("Mercado Libre", "ML", "#FFE135"),
    ("Walmart", "WM", "#0071CE"),
    ("Liverpool", "LV", "#E4002B"),
    ("Shein", "SH", "#FF6B35"),
    ("CrediTienda", "CT", "#00A650"),
    ("Yuhu", "YH", "#9B59B6"),
    ("Aliexpress", "AE", "#E62129"),
    ("Coppel", "CP", "#003DA5"),
    ("TikTok Shop", "TT", "#25F4EE"),
    ("Temu", "TM", "#FF6C00"),
];

/// (label, colour) in ranking order
const CLASSIFICATIONS: &[(&str, &str)] = &[
    ("Estrellas", "#FFD700"),
    ("Prometedores", "#28a745"),
    ("Potenciales", "#17a2b8"),
    ("Revision", "#ffc107"),
    ("Remover", "#dc3545"),
    (UNCLASSIFIED, FALLBACK_COLOR),
];

/// Rank of labels outside the known list
const UNKNOWN_RANK: usize = 999;

fn find_channel(canal: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    CHANNELS.iter().find(|(name, _, _)| *name == canal)
}

/// Short tag used in chart labels ("ML - Audio"); unknown channels use their
/// first two letters upper-cased
pub fn abbreviation(canal: &str) -> String {
    match find_channel(canal) {
        Some((_, abbrev, _)) => abbrev.to_string(),
        None => canal.chars().take(2).collect::<String>().to_uppercase(),
    }
}

pub fn color(canal: &str) -> &'static str {
    find_channel(canal)
        .map(|(_, _, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Blank or missing labels become "Sin Clasificar"
pub fn normalize_classification(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => UNCLASSIFIED.to_string(),
    }
}

pub fn classification_color(label: &str) -> &'static str {
    CLASSIFICATIONS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Sort key: Estrellas first, Sin Clasificar last among the known labels
pub fn classification_rank(label: &str) -> usize {
    CLASSIFICATIONS
        .iter()
        .position(|(name, _)| *name == label)
        .map(|i| i + 1)
        .unwrap_or(UNKNOWN_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_channels_use_catalogue() {
        assert_eq!(abbreviation("Mercado Libre"), "ML");
        assert_eq!(color("TikTok Shop"), "#25F4EE");
    }

    #[test]
    fn unknown_channels_fall_back() {
        assert_eq!(abbreviation("Amazon"), "AM");
        assert_eq!(abbreviation("ñu"), "ÑU");
        assert_eq!(abbreviation("X"), "X");
        assert_eq!(color("Amazon"), FALLBACK_COLOR);
    }

    #[test]
    fn classification_ranking() {
        assert_eq!(classification_rank("Estrellas"), 1);
        assert_eq!(classification_rank(UNCLASSIFIED), 6);
        assert_eq!(classification_rank("Otra"), UNKNOWN_RANK);
        assert_eq!(classification_color("Remover"), "#dc3545");
        assert_eq!(classification_color("Otra"), FALLBACK_COLOR);
    }

    #[test]
    fn blank_classification_is_unclassified() {
        assert_eq!(normalize_classification(None), UNCLASSIFIED);
        assert_eq!(normalize_classification(Some("  ")), UNCLASSIFIED);
        assert_eq!(normalize_classification(Some("Estrellas")), "Estrellas");
    }
}
