//! Number formatting for tables and cards (es-MX style: `$1,234.56`).

fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// `$1,234.56`; negative values as `-$1,234.56`
pub fn money(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

pub fn integer(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(value.unsigned_abs()))
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_and_rounds() {
        assert_eq!(money(1234567.891), "$1,234,567.89");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(-950.5), "-$950.50");
        assert_eq!(money(f64::NAN), "$0.00");
    }

    #[test]
    fn integers_and_percents() {
        assert_eq!(integer(18), "18");
        assert_eq!(integer(-1234), "-1,234");
        assert_eq!(percent(33.333), "33.33%");
    }
}
