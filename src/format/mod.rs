//! pt-BR display formatting for dashboard values.
//!
//! Currency is always BRL with `.` thousands grouping and `,` decimals
//! (`R$ 24.587,00`). Dates use the `dd/mm/yyyy` order the dashboard shows.

use chrono::{DateTime, TimeZone};

/// Format a value as Brazilian reais, e.g. `R$ 1.997,00`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}R$ {},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Format an integer count with `.` grouping, e.g. `12.345`.
pub fn format_integer(value: u64) -> String {
    group_thousands(value)
}

/// Format a percentage with one decimal and a comma, e.g. `7,2%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value).replace('.', ",")
}

/// Growth badge text: the magnitude with an arrow for the direction.
pub fn format_growth(value: f64) -> String {
    let arrow = if value >= 0.0 { "↑" } else { "↓" };
    format!("{arrow} {}", format_percent(value.abs()))
}

/// Date and time as `dd/mm/yyyy, HH:MM`.
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d/%m/%Y, %H:%M").to_string()
}

/// Date only as `dd/mm/yyyy`.
pub fn format_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d/%m/%Y").to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn currency_groups_and_pads_cents() {
        assert_eq!(format_currency(24587.0), "R$ 24.587,00");
        assert_eq!(format_currency(97.0), "R$ 97,00");
        assert_eq!(format_currency(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(0.5), "R$ 0,50");
    }

    #[test]
    fn currency_negative_values() {
        assert_eq!(format_currency(-1.0), "-R$ 1,00");
        assert_eq!(format_currency(-0.001), "R$ 0,00");
    }

    #[test]
    fn integer_grouping() {
        assert_eq!(format_integer(0), "0");
        assert_eq!(format_integer(999), "999");
        assert_eq!(format_integer(1000), "1.000");
        assert_eq!(format_integer(5234), "5.234");
        assert_eq!(format_integer(1_000_000), "1.000.000");
    }

    #[test]
    fn percent_uses_comma() {
        assert_eq!(format_percent(7.2), "7,2%");
        assert_eq!(format_percent(12.0), "12,0%");
        assert_eq!(format_growth(-3.0), "↓ 3,0%");
        assert_eq!(format_growth(15.0), "↑ 15,0%");
    }

    #[test]
    fn dates_are_day_first() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_datetime(&dt), "07/03/2026, 09:05");
        assert_eq!(format_date(&dt), "07/03/2026");
    }
}
