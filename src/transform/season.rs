//! Season bucketing for event start dates.

use std::fmt;

use serde::Serialize;

use crate::error::TransformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Display order used for grouped bars.
    pub const ORDER: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }

    pub fn from_name(name: &str) -> Option<Season> {
        Season::ORDER.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season start dates as (month, day), in calendar order. Each season runs
/// until the next start; dates before the first start belong to the last.
pub const SEASON_STARTS: [(u32, u32, Season); 4] = [
    (3, 20, Season::Spring),
    (6, 21, Season::Summer),
    (9, 22, Season::Autumn),
    (12, 21, Season::Winter),
];

/// Days per month, February counted as 29.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Classify a (month, day) pair. Out-of-range input is an error.
pub fn classify(month: u32, day: u32) -> Result<Season, TransformError> {
    validate(month, day).map_err(|reason| TransformError::InvalidDate {
        value: format!("{month:02}-{day:02}"),
        reason,
    })?;
    let season = SEASON_STARTS
        .iter()
        .rev()
        .find(|&&(m, d, _)| (month, day) >= (m, d))
        .map(|&(_, _, s)| s)
        .unwrap_or(SEASON_STARTS[SEASON_STARTS.len() - 1].2);
    Ok(season)
}

fn validate(month: u32, day: u32) -> Result<(), String> {
    if !(1..=12).contains(&month) {
        return Err(format!("month {month} outside 1..=12"));
    }
    let max_day = DAYS_IN_MONTH[(month - 1) as usize];
    if !(1..=max_day).contains(&day) {
        return Err(format!("day {day} outside 1..={max_day} for month {month}"));
    }
    Ok(())
}

/// Parse the month-first prefix of a date string: `MM-DD...` or `MM/DD...`.
pub fn parse_month_day(date: &str) -> Result<(u32, u32), TransformError> {
    let invalid = |reason: &str| TransformError::InvalidDate {
        value: date.to_string(),
        reason: reason.to_string(),
    };

    let bytes = date.trim().as_bytes();
    if bytes.len() < 5 {
        return Err(invalid("expected at least 5 characters (MM-DD)"));
    }
    let two_digits = |hi: u8, lo: u8| -> Option<u32> {
        (hi.is_ascii_digit() && lo.is_ascii_digit())
            .then(|| u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
    };
    let month = two_digits(bytes[0], bytes[1]).ok_or_else(|| invalid("month is not two digits"))?;
    if bytes[2] != b'-' && bytes[2] != b'/' {
        return Err(invalid("expected '-' or '/' after the month"));
    }
    let day = two_digits(bytes[3], bytes[4]).ok_or_else(|| invalid("day is not two digits"))?;
    if bytes.len() > 5 && bytes[5].is_ascii_digit() {
        return Err(invalid("day has more than two digits"));
    }
    validate(month, day).map_err(|reason| invalid(&reason))?;
    Ok((month, day))
}

/// Season of a month-first date string.
pub fn season_of(date: &str) -> Result<Season, TransformError> {
    let (month, day) = parse_month_day(date)?;
    classify(month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let cases = [
            ((1, 1), Season::Winter),
            ((3, 19), Season::Winter),
            ((3, 20), Season::Spring),
            ((6, 20), Season::Spring),
            ((6, 21), Season::Summer),
            ((9, 21), Season::Summer),
            ((9, 22), Season::Autumn),
            ((12, 20), Season::Autumn),
            ((12, 21), Season::Winter),
            ((12, 31), Season::Winter),
        ];
        for ((m, d), expected) in cases {
            assert_eq!(classify(m, d).unwrap(), expected, "{m:02}-{d:02}");
        }
    }

    #[test]
    fn test_year_is_partitioned_without_gaps() {
        let mut previous = None;
        let mut changes = 0;
        let mut seen = std::collections::BTreeSet::new();
        for (m, &days) in DAYS_IN_MONTH.iter().enumerate() {
            for d in 1..=days {
                let s = classify(m as u32 + 1, d).unwrap();
                seen.insert(s);
                if previous.is_some_and(|p| p != s) {
                    changes += 1;
                }
                previous = Some(s);
            }
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(changes, 4);
    }

    #[test]
    fn test_out_of_range_is_error() {
        assert!(classify(0, 10).is_err());
        assert!(classify(13, 1).is_err());
        assert!(classify(4, 31).is_err());
        assert!(classify(2, 30).is_err());
        assert!(classify(2, 29).is_ok());
    }

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_month_day("03-20-1976 14:00").unwrap(), (3, 20));
        assert_eq!(parse_month_day("12/21/2001").unwrap(), (12, 21));
        assert_eq!(parse_month_day("06-21").unwrap(), (6, 21));
    }

    #[test]
    fn test_malformed_dates_are_errors() {
        for bad in ["", "3-20", "1976-03-20", "03.20.1976", "ab-cd", "03-200", "13-01", "02-30"] {
            let err = season_of(bad).unwrap_err();
            assert!(
                matches!(err, TransformError::InvalidDate { ref value, .. } if value == bad),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_season_of() {
        assert_eq!(season_of("09-22-1990 00:00").unwrap(), Season::Autumn);
        assert_eq!(season_of("03-19-1990 23:00").unwrap(), Season::Winter);
    }
}
