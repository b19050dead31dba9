//! Calendar month filters used by the dashboard and the transaction listing.

use std::{fmt::Display, ops::Range, str::FromStr};

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};

use crate::{
    Error,
    timezone::{local_today, start_of_local_day},
};

/// The query string value that turns the month filter off.
pub const ALL_MONTHS: &str = "all";

/// Selects the transactions of one calendar month, or of all time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// Every transaction regardless of date.
    All,
    /// The transactions dated within a calendar month in the local timezone.
    Month {
        /// The calendar year.
        year: i32,
        /// The month of `year`.
        month: Month,
    },
}

/// The `?month=` query parameter shared by the pages and endpoints that
/// filter by month.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MonthQuery {
    /// A month as `YYYY-MM`, or "all".
    pub month: Option<String>,
}

impl MonthFilter {
    /// The month containing `date`.
    pub fn containing(date: Date) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Resolve a month query value against the current month in `canonical_timezone`.
    ///
    /// A missing or blank value selects the current month.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidMonth] if `value` is neither "all" nor a `YYYY-MM` month,
    /// - or [Error::InvalidTimezoneError] if the timezone is not a canonical timezone name.
    pub fn from_query(value: Option<&str>, canonical_timezone: &str) -> Result<Self, Error> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::containing(local_today(canonical_timezone)?)),
            Some(value) => value.parse(),
        }
    }

    /// The instants covered by the month in `canonical_timezone`, or `None`
    /// for [MonthFilter::All].
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not a canonical timezone name.
    pub fn date_range(
        &self,
        canonical_timezone: &str,
    ) -> Result<Option<Range<OffsetDateTime>>, Error> {
        let Self::Month { year, month } = *self else {
            return Ok(None);
        };

        let (next_year, next_month) = match month {
            Month::December => (year + 1, Month::January),
            month => (year, month.next()),
        };

        let start = start_of_local_day(first_day(year, month)?, canonical_timezone)?;
        let end = start_of_local_day(first_day(next_year, next_month)?, canonical_timezone)?;

        Ok(Some(start..end))
    }

    /// A heading for the month, e.g. "October 2025".
    pub fn label(&self) -> String {
        match self {
            Self::All => "All time".to_owned(),
            Self::Month { year, month } => format!("{month} {year}"),
        }
    }

    /// The filter for the month before this one, `None` for [MonthFilter::All].
    pub fn previous(&self) -> Option<Self> {
        match *self {
            Self::All => None,
            Self::Month {
                year,
                month: Month::January,
            } => Some(Self::Month {
                year: year - 1,
                month: Month::December,
            }),
            Self::Month { year, month } => Some(Self::Month {
                year,
                month: month.previous(),
            }),
        }
    }

    /// The filter for the month after this one, `None` for [MonthFilter::All].
    pub fn next(&self) -> Option<Self> {
        match *self {
            Self::All => None,
            Self::Month {
                year,
                month: Month::December,
            } => Some(Self::Month {
                year: year + 1,
                month: Month::January,
            }),
            Self::Month { year, month } => Some(Self::Month {
                year,
                month: month.next(),
            }),
        }
    }
}

fn first_day(year: i32, month: Month) -> Result<Date, Error> {
    Date::from_calendar_date(year, month, 1)
        .map_err(|_| Error::InvalidMonth(format!("{year:04}-{:02}", month as u8)))
}

/// Formats the filter the way it is written in query strings.
impl Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_MONTHS),
            Self::Month { year, month } => write!(f, "{year:04}-{:02}", *month as u8),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL_MONTHS) {
            return Ok(Self::All);
        }

        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::Month { year, month })
    }
}
