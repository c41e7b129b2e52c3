use chrono::{Datelike, NaiveDate};
use cruscotto_types::{Cycle, quarter_of};

/// Parse a provider date token into a calendar date.
///
/// Accepted forms: `YYYY-MM-DD`, `YYYYMMDD`, `YYYYMM` and `YYYYQn`. Month and
/// quarter tokens resolve to the first day of the period's first month.
/// Anything else yields `None`.
#[must_use]
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    let t = token.trim();
    if !t.is_ascii() {
        return None;
    }
    let all_digits = t.bytes().all(|b| b.is_ascii_digit());
    match t.len() {
        10 => NaiveDate::parse_from_str(t, "%Y-%m-%d").ok(),
        8 if all_digits => NaiveDate::parse_from_str(t, "%Y%m%d").ok(),
        6 if all_digits => {
            let year: i32 = t[..4].parse().ok()?;
            let month: u32 = t[4..].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        }
        6 if matches!(t.as_bytes()[4], b'Q' | b'q') => {
            let year: i32 = t[..4].parse().ok()?;
            let quarter: u32 = t[5..].parse().ok()?;
            if !(1..=4).contains(&quarter) {
                return None;
            }
            NaiveDate::from_ymd_opt(year, 3 * (quarter - 1) + 1, 1)
        }
        _ => None,
    }
}

/// Render `date` as the period token a provider expects for `cycle`.
///
/// Inverse of [`parse_date_token`] for period starts: daily dates become
/// `YYYYMMDD`, monthly `YYYYMM`, quarterly `YYYYQn`.
#[must_use]
pub fn period_token(date: NaiveDate, cycle: Cycle) -> String {
    match cycle {
        Cycle::Daily => date.format("%Y%m%d").to_string(),
        Cycle::Monthly => date.format("%Y%m").to_string(),
        Cycle::Quarterly => format!("{}Q{}", date.year(), quarter_of(date) + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn all_token_forms() {
        assert_eq!(parse_date_token("2024-03-15"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date_token("20240315"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date_token("202403"), Some(d(2024, 3, 1)));
        assert_eq!(parse_date_token("2024Q1"), Some(d(2024, 1, 1)));
        assert_eq!(parse_date_token("2024Q2"), Some(d(2024, 4, 1)));
        assert_eq!(parse_date_token("2024Q3"), Some(d(2024, 7, 1)));
        assert_eq!(parse_date_token("2024Q4"), Some(d(2024, 10, 1)));
        assert_eq!(parse_date_token(" 2024-01-02 "), Some(d(2024, 1, 2)));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "2024", "2024Q5", "2024Q0", "202413", "2024-02-30", "abcdefgh", "2024년1월"] {
            assert_eq!(parse_date_token(bad), None, "{bad}");
        }
    }

    #[test]
    fn period_tokens_round_trip() {
        for (date, cycle) in [
            (d(2024, 1, 31), Cycle::Daily),
            (d(2024, 11, 1), Cycle::Monthly),
            (d(2023, 7, 1), Cycle::Quarterly),
        ] {
            assert_eq!(parse_date_token(&period_token(date, cycle)), Some(date));
        }
        assert_eq!(period_token(d(2024, 5, 20), Cycle::Quarterly), "2024Q2");
    }
}
