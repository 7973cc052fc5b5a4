use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const MONTH_SHORT_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Calendar month, carried on the wire as the integer `YYYYMM` (e.g. `202410`).
///
/// Deserialization accepts both `202410` and `"202410"` and rejects anything
/// that is not six digits with a month in `01..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth", into = "u32")]
pub struct YearMonth {
    /// Always the first day of the month
    first_day: NaiveDate,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYearMonth {
    Number(i64),
    Text(String),
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = String;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        let parsed = match raw {
            RawYearMonth::Number(n) => YearMonth::from_yyyymm(n),
            RawYearMonth::Text(s) => YearMonth::parse(&s),
        };
        parsed.map_err(|e| e.to_string())
    }
}

impl From<YearMonth> for u32 {
    fn from(value: YearMonth) -> Self {
        value.as_yyyymm()
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("Mes inválido: {:02}. Debe estar entre 01 y 12", month);
        }
        if !(1900..=9999).contains(&year) {
            anyhow::bail!("Año inválido: {}", year);
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| anyhow::anyhow!("Fecha inválida: {}-{:02}", year, month))?;
        Ok(Self { first_day })
    }

    /// Build from the integer form `YYYYMM`
    pub fn from_yyyymm(value: i64) -> anyhow::Result<Self> {
        if !(100_000..=999_999).contains(&value) {
            anyhow::bail!(
                "Formato de mes inválido: {}. Debe ser YYYYMM (ej: 202410)",
                value
            );
        }
        Self::new((value / 100) as i32, (value % 100) as u32)
    }

    /// Parse the textual form `YYYYMM`
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let trimmed = text.trim();
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!(
                "Formato de mes inválido: {}. Debe ser YYYYMM (ej: 202410)",
                trimmed
            );
        }
        let value: i64 = trimmed.parse()?;
        Self::from_yyyymm(value)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn as_yyyymm(&self) -> u32 {
        self.year() as u32 * 100 + self.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following month (exclusive upper bound of this month)
    pub fn end_exclusive(&self) -> NaiveDate {
        // Only the last representable month has no successor
        self.first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Move by `delta` months (negative goes back). `None` on calendar overflow.
    pub fn checked_shift(&self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.first_day.checked_add_months(months)?
        } else {
            self.first_day.checked_sub_months(months)?
        };
        Some(Self { first_day: shifted })
    }

    /// Spanish month name, e.g. "Octubre"
    pub fn name_es(&self) -> &'static str {
        MONTH_NAMES_ES[self.month0()]
    }

    /// Spanish three-letter label, e.g. "Oct"
    pub fn short_label_es(&self) -> &'static str {
        MONTH_SHORT_ES[self.month0()]
    }

    fn month0(&self) -> usize {
        (self.month() - 1) as usize
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
