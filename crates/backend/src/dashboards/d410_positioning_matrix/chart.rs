//! Chart.js dataset construction for the three matrices.

use contracts::dashboards::d410_positioning_matrix::{ChartDataset, ChartPoint, PointStyle};

const BUBBLE_MIN: f64 = 12.0;
const BUBBLE_MAX: f64 = 28.0;
const MARKER_MIN: f64 = 8.0;
const MARKER_MAX: f64 = 20.0;
const BORDER_WIDTH: u32 = 2;

/// Smallest and largest value; (0, 0) for an empty input
pub fn sales_range<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut iter = values.into_iter();
    let Some(first) = iter.next() else {
        return (0.0, 0.0);
    };
    iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Bubble radius on a logarithmic scale between 12 and 28 px.
///
/// Sales spread over several orders of magnitude between channels; the log
/// keeps the smallest channel visible. Equal sales or a non-positive minimum
/// give the midpoint.
pub fn bubble_radius(ventas: f64, min: f64, max: f64) -> f64 {
    if max > min && min > 0.0 {
        let log_min = (min + 1.0).ln();
        let log_max = (max + 1.0).ln();
        let share = ((ventas.max(0.0) + 1.0).ln() - log_min) / (log_max - log_min);
        BUBBLE_MIN + share * (BUBBLE_MAX - BUBBLE_MIN)
    } else {
        (BUBBLE_MIN + BUBBLE_MAX) / 2.0
    }
}

/// Marker size on a linear scale between 8 and 20 px
pub fn marker_size(ventas: f64, min: f64, max: f64) -> f64 {
    if max > min {
        MARKER_MIN + (ventas - min) / (max - min) * (MARKER_MAX - MARKER_MIN)
    } else {
        (MARKER_MIN + MARKER_MAX) / 2.0
    }
}

fn base_dataset(label: String, point: ChartPoint, color: &str) -> ChartDataset {
    ChartDataset {
        label,
        data: vec![point],
        background_color: color.to_string(),
        border_color: color.to_string(),
        border_width: BORDER_WIDTH,
        point_style: None,
        point_radius: None,
        point_hover_radius: None,
        sku: None,
        canal: None,
        descripcion: None,
        clasificacion: None,
        ventas: None,
        ingreso_real: None,
    }
}

/// One bubble per channel
pub fn channel_dataset(canal: &str, x: f64, y: f64, radius: f64, color: &str) -> ChartDataset {
    base_dataset(
        canal.to_string(),
        ChartPoint { x, y, r: Some(radius) },
        color,
    )
}

/// One rotated-cross marker per (channel, category)
pub fn category_dataset(label: String, x: f64, y: f64, size: f64, color: &str) -> ChartDataset {
    ChartDataset {
        point_style: Some(PointStyle::CrossRot),
        point_radius: Some(size),
        point_hover_radius: Some(size + 3.0),
        ..base_dataset(label, ChartPoint { x, y, r: None }, color)
    }
}

/// Tooltip payload carried by a SKU dataset
#[derive(Debug, Clone)]
pub struct SkuTooltip {
    pub sku: String,
    pub canal: String,
    pub descripcion: String,
    pub clasificacion: String,
    pub ventas: f64,
    pub ingreso_real: f64,
}

/// One cross marker per (SKU, channel)
pub fn sku_dataset(
    label: String,
    x: f64,
    y: f64,
    radius: f64,
    color: &str,
    tooltip: SkuTooltip,
) -> ChartDataset {
    ChartDataset {
        point_style: Some(PointStyle::Cross),
        point_radius: Some(radius),
        sku: Some(tooltip.sku),
        canal: Some(tooltip.canal),
        descripcion: Some(tooltip.descripcion),
        clasificacion: Some(tooltip.clasificacion),
        ventas: Some(tooltip.ventas),
        ingreso_real: Some(tooltip.ingreso_real),
        ..base_dataset(label, ChartPoint { x, y, r: Some(radius) }, color)
    }
}

/// Order datasets smallest first so large bubbles do not hide small ones
pub fn sort_small_first(datasets: &mut [ChartDataset]) {
    datasets.sort_by(|a, b| size_of(a).total_cmp(&size_of(b)));
}

fn size_of(ds: &ChartDataset) -> f64 {
    ds.point_radius
        .or_else(|| ds.data.first().and_then(|p| p.r))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_radius_spans_log_range() {
        assert_eq!(bubble_radius(10.0, 10.0, 1_000_000.0), BUBBLE_MIN);
        assert!((bubble_radius(1_000_000.0, 10.0, 1_000_000.0) - BUBBLE_MAX).abs() < 1e-9);
        let mid = bubble_radius(1000.0, 10.0, 1_000_000.0);
        assert!(mid > BUBBLE_MIN && mid < BUBBLE_MAX);
        // log scale puts 1000 well above the linear position
        assert!(mid > 15.0);
    }

    #[test]
    fn degenerate_ranges_use_midpoint() {
        assert_eq!(bubble_radius(5.0, 5.0, 5.0), 20.0);
        assert_eq!(bubble_radius(5.0, 0.0, 50.0), 20.0);
        assert_eq!(marker_size(5.0, 5.0, 5.0), 14.0);
    }

    #[test]
    fn marker_size_is_linear() {
        assert_eq!(marker_size(0.0, 0.0, 100.0), 8.0);
        assert_eq!(marker_size(50.0, 0.0, 100.0), 14.0);
        assert_eq!(marker_size(100.0, 0.0, 100.0), 20.0);
    }

    #[test]
    fn range_of_values() {
        assert_eq!(sales_range(Vec::new()), (0.0, 0.0));
        assert_eq!(sales_range(vec![3.0, -1.0, 7.0]), (-1.0, 7.0));
    }

    #[test]
    fn datasets_sort_smallest_first() {
        let mut ds = vec![
            channel_dataset("Walmart", 10.0, 20.0, 28.0, "#0071CE"),
            category_dataset("WM - Audio".into(), 1.0, 2.0, 9.0, "#0071CE"),
            channel_dataset("Shein", 10.0, 20.0, 12.0, "#FF6B35"),
        ];
        sort_small_first(&mut ds);
        let labels: Vec<_> = ds.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["WM - Audio", "Shein", "Walmart"]);
    }

    #[test]
    fn category_marker_has_hover_growth() {
        let ds = category_dataset("ML - Audio".into(), 1.0, 2.0, 10.0, "#FFE135");
        assert_eq!(ds.point_hover_radius, Some(13.0));
        assert_eq!(ds.point_style, Some(PointStyle::CrossRot));
        assert_eq!(ds.data[0].r, None);
    }
}
