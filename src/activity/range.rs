use crate::error::{ActivityError, Result};
use chrono::{Duration, NaiveDate};
use std::fmt;

const ISO_DATE: &str = "%Y-%m-%d";

/// Inclusive calendar date range used for every search qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// The 365 days leading up to and including `today`.
    pub fn rolling_year(today: NaiveDate) -> Self {
        Self {
            from: today - Duration::days(365),
            to: today,
        }
    }

    /// Use the caller's dates only when both are given; otherwise fall back
    /// to the rolling year.
    pub fn resolve(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<Self> {
        match (from, to) {
            (Some(from), Some(to)) => {
                let range = Self {
                    from: parse_date(from)?,
                    to: parse_date(to)?,
                };
                if range.from > range.to {
                    return Err(ActivityError::InvalidRange {
                        from: range.from.to_string(),
                        to: range.to.to_string(),
                    });
                }
                Ok(range)
            }
            _ => Ok(Self::rolling_year(today)),
        }
    }

    /// The `from..to` form GitHub search qualifiers expect.
    pub fn qualifier(&self) -> String {
        format!(
            "{}..{}",
            self.from.format(ISO_DATE),
            self.to.format(ISO_DATE)
        )
    }

    /// `{prefix}_{from}_{to}`, the stem shared by both output files.
    pub fn file_stem(&self, prefix: &str) -> String {
        format!(
            "{prefix}_{}_{}",
            self.from.format(ISO_DATE),
            self.to.format(ISO_DATE)
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.from.format(ISO_DATE),
            self.to.format(ISO_DATE)
        )
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE).map_err(|source| {
        ActivityError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}
