use chrono::{Duration, NaiveDate};
use contracts::dashboards::d411_bf_compliance::BfPreset;
use contracts::shared::YearMonth;

use crate::shared::data::warehouse::DateRange;
use crate::shared::error::DashboardError;

/// Separators accepted between the two dates of a custom range
const RANGE_SEPARATORS: [&str; 4] = [" a ", " to ", " al ", " - "];

/// Resolved reporting period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfPeriod {
    pub range: DateRange,
    pub label: String,
}

fn display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn parse_date(text: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
        DashboardError::validation(format!(
            "Fecha inválida: '{}'. Use el formato YYYY-MM-DD",
            text.trim()
        ))
    })
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD <sep> YYYY-MM-DD`; the end date is inclusive
pub fn parse_custom_range(text: &str) -> Result<BfPeriod, DashboardError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DashboardError::validation(
            "El periodo personalizado requiere un rango de fechas",
        ));
    }

    let split = RANGE_SEPARATORS
        .iter()
        .find_map(|sep| text.split_once(sep));

    let (start, last) = match split {
        Some((a, b)) => (parse_date(a)?, parse_date(b)?),
        None => {
            let day = parse_date(text)?;
            (day, day)
        }
    };
    if last < start {
        return Err(DashboardError::validation(format!(
            "Rango inválido: {} es posterior a {}",
            start, last
        )));
    }

    let label = if start == last {
        format!("Personalizado ({})", display(start))
    } else {
        format!("Personalizado ({} - {})", display(start), display(last))
    };
    Ok(BfPeriod {
        range: DateRange::new(start, last + Duration::days(1)),
        label,
    })
}

/// Resolve a preset against `today`. Ranges are half-open.
pub fn resolve(preset: BfPreset, rango: &str, today: NaiveDate) -> Result<BfPeriod, DashboardError> {
    let tomorrow = today + Duration::days(1);
    let period = match preset {
        BfPreset::Today => BfPeriod {
            range: DateRange::new(today, tomorrow),
            label: format!("Hoy ({})", display(today)),
        },
        BfPreset::LastSevenDays => BfPeriod {
            range: DateRange::new(today - Duration::days(7), tomorrow),
            label: "Últimos 7 días".to_string(),
        },
        BfPreset::CurrentMonth => {
            let month = YearMonth::from_date(today);
            BfPeriod {
                range: DateRange::new(month.first_day(), month.end_exclusive()),
                label: format!("Mes completo de {}", month.name_es().to_lowercase()),
            }
        }
        BfPreset::Custom => parse_custom_range(rango)?,
    };
    Ok(period)
}
