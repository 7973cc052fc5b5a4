use chrono::{Duration, NaiveDate, Utc};

/// Source of the business date used for "current month" and same-day windows
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall clock shifted to the business timezone
    System { utc_offset_hours: i32 },
    /// Pinned date (tests, reproducible reports)
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System { utc_offset_hours } => {
                (Utc::now() + Duration::hours(*utc_offset_hours as i64)).date_naive()
            }
            Clock::Fixed(date) => *date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        assert_eq!(Clock::Fixed(date).today(), date);
    }
}
