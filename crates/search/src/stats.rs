//! Lower time bound for the statistics endpoint.

use crate::error::{Error, ErrorKind, Result};
use crate::query::QueryParams;
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::UtcDateTime;

/// Granularity of the statistics buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}
impl TimeUnit {
    pub const ALL: [TimeUnit; 5] = [Self::Hours, Self::Days, Self::Weeks, Self::Months, Self::Years];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Nominal length of one unit. Months and years are fixed at 30 and 365
    /// days.
    pub fn seconds(&self) -> i64 {
        match self {
            Self::Hours => 3_600,
            Self::Days => 86_400,
            Self::Weeks => 7 * 86_400,
            Self::Months => 30 * 86_400,
            Self::Years => 365 * 86_400,
        }
    }

    /// Bucket label of `at` at this granularity.
    fn label(&self, at: UtcDateTime) -> String {
        let (year, month, day, hour) = (at.year(), u8::from(at.month()), at.day(), at.hour());
        match self {
            Self::Years => format!("{year}"),
            // ISO week-numbering year, which differs from the calendar year
            // around New Year.
            Self::Weeks => {
                let (iso_year, week, _) = at.to_iso_week_date();
                format!("{iso_year}-W{week:02}")
            },
            Self::Months => format!("{year}-{month:02}"),
            Self::Days => format!("{year}-{month:02}-{day:02}"),
            Self::Hours => format!("{year}-{month:02}-{day:02}T{hour:02}"),
        }
    }
}
impl FromStr for TimeUnit {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| exn::Exn::from(ErrorKind::InvalidWindow(format!("unknown unit {s:?}"))))
    }
}
impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The last `n` buckets of `unit`, ending now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsWindow {
    n: u32,
    unit: TimeUnit,
    from: String,
}
impl StatsWindow {
    pub fn new(n: u32, unit: TimeUnit) -> Result<Self> {
        Self::ending_at(n, unit, UtcDateTime::now())
    }

    /// Window of `n` units ending at `now`.
    ///
    /// ```
    /// use magview_search::{StatsWindow, TimeUnit};
    /// use time::macros::utc_datetime;
    ///
    /// let window = StatsWindow::ending_at(3, TimeUnit::Days, utc_datetime!(2024-05-10 12:00)).unwrap();
    /// assert_eq!(window.from(), "2024-05-07");
    /// ```
    pub fn ending_at(n: u32, unit: TimeUnit, now: UtcDateTime) -> Result<Self> {
        if n == 0 {
            exn::bail!(ErrorKind::InvalidWindow("n must be positive".to_string()));
        }
        let start = now.unix_timestamp() - i64::from(n) * unit.seconds();
        let start = UtcDateTime::from_unix_timestamp(start)
            .or_raise(|| ErrorKind::InvalidWindow(format!("{n} {unit} before {} is out of range", now.unix_timestamp())))?;
        Ok(Self {
            n,
            unit,
            from: unit.label(start),
        })
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Formatted lower bound sent as the `from` parameter.
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new().with("from", Some(&self.from)).with("n", Some(self.n))
    }
}
