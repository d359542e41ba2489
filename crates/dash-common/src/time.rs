//! CF-convention time coordinate handling for climate data.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Cumulative days before each month in a 365-day year.
const NOLEAP_CUMULATIVE_DAYS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days in each month of a 365-day year.
const NOLEAP_MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar systems recognized in CF `calendar` attributes.
///
/// Reanalysis products commonly encode time under `noleap` (fixed 365-day
/// years, no February 29) rather than the civil calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfCalendar {
    /// Proleptic Gregorian / "standard" calendar.
    Standard,
    /// Fixed 365-day calendar ("noleap" / "365_day").
    Noleap,
}

impl CfCalendar {
    /// Interpret a CF `calendar` attribute. A missing attribute means the
    /// standard calendar per the conventions.
    pub fn from_attribute(calendar: Option<&str>) -> Result<Self, TimeParseError> {
        match calendar {
            None => Ok(CfCalendar::Standard),
            Some(name) => match name.trim().to_ascii_lowercase().as_str() {
                "standard" | "gregorian" | "proleptic_gregorian" => Ok(CfCalendar::Standard),
                "noleap" | "365_day" => Ok(CfCalendar::Noleap),
                other => Err(TimeParseError::UnsupportedCalendar(other.to_string())),
            },
        }
    }

    /// Absolute seconds of a calendar date under this calendar.
    ///
    /// Origins differ between calendars (Unix epoch for standard, year 0 for
    /// noleap); only differences within one calendar are meaningful.
    fn absolute_seconds(&self, date: &CalendarDate) -> Result<f64, TimeParseError> {
        let day_seconds =
            f64::from(date.hour) * 3600.0 + f64::from(date.minute) * 60.0 + date.second;
        match self {
            CfCalendar::Standard => {
                let nd = NaiveDate::from_ymd_opt(date.year, date.month, date.day)
                    .ok_or_else(|| TimeParseError::InvalidEpoch(date.to_string()))?;
                let midnight = nd
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| TimeParseError::InvalidEpoch(date.to_string()))?;
                Ok(midnight.and_utc().timestamp() as f64 + day_seconds)
            }
            CfCalendar::Noleap => {
                if date.month < 1 || date.month > 12 {
                    return Err(TimeParseError::InvalidEpoch(date.to_string()));
                }
                let month_len = NOLEAP_MONTH_DAYS[(date.month - 1) as usize];
                if date.day < 1 || date.day > month_len {
                    return Err(TimeParseError::InvalidEpoch(date.to_string()));
                }
                let days = i64::from(date.year) * 365
                    + NOLEAP_CUMULATIVE_DAYS[(date.month - 1) as usize]
                    + i64::from(date.day) - 1;
                Ok(days as f64 * 86_400.0 + day_seconds)
            }
        }
    }

    /// Calendar year containing the given absolute second count.
    fn year_of(&self, absolute_seconds: f64) -> i32 {
        match self {
            CfCalendar::Standard => {
                let secs = absolute_seconds.clamp(-8.0e15, 8.0e15) as i64;
                match DateTime::<Utc>::from_timestamp(secs, 0) {
                    Some(dt) => dt.year(),
                    // Unreachable for real axes; approximate for degenerate values.
                    None => (secs / 31_556_952) as i32 + 1970,
                }
            }
            CfCalendar::Noleap => {
                let days = (absolute_seconds / 86_400.0).floor() as i64;
                days.div_euclid(365) as i32
            }
        }
    }
}

/// Unit of a CF time coordinate (`<unit> since <epoch>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Seconds,
}

impl TimeUnit {
    fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Seconds => 1.0,
        }
    }
}

/// A calendar date/time as written in a CF epoch string.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second as u32
        )
    }
}

/// A decoded time coordinate: numeric values plus their CF encoding.
///
/// Built from a coordinate array and its `units`/`calendar` attributes.
/// Supports the lookups the dashboard needs: the calendar-year extent of the
/// data and nearest-match selection against a January 1 target.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    values: Vec<f64>,
    unit_seconds: f64,
    epoch_seconds: f64,
    calendar: CfCalendar,
}

impl TimeAxis {
    /// Decode a time coordinate from its values and CF attributes.
    ///
    /// # Arguments
    /// * `values` - Raw coordinate values in storage order
    /// * `units` - CF units string, e.g. `"days since 1900-01-01"`
    /// * `calendar` - CF calendar attribute, if present
    pub fn new(
        values: Vec<f64>,
        units: &str,
        calendar: Option<&str>,
    ) -> Result<Self, TimeParseError> {
        let (unit, epoch) = parse_units(units)?;
        let calendar = CfCalendar::from_attribute(calendar)?;
        let epoch_seconds = calendar.absolute_seconds(&epoch)?;
        Ok(Self {
            values,
            unit_seconds: unit.seconds(),
            epoch_seconds,
            calendar,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn calendar(&self) -> CfCalendar {
        self.calendar
    }

    /// Calendar year of the value at `index`.
    pub fn year_of_index(&self, index: usize) -> Option<i32> {
        self.values.get(index).map(|v| self.year_of_value(*v))
    }

    /// Minimum and maximum calendar year present in the coordinate.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.values.iter().map(|v| self.year_of_value(*v));
        let first = years.next()?;
        let (mut min, mut max) = (first, first);
        for y in years {
            min = min.min(y);
            max = max.max(y);
        }
        Some((min, max))
    }

    /// Index of the value nearest to January 1 of the requested year.
    ///
    /// Pure nearest-neighbor: a year outside the available range resolves to
    /// the closest boundary value rather than an error. Ties go to the
    /// earlier index. Returns `None` only for an empty coordinate.
    pub fn nearest_index_to_year_start(&self, year: i32) -> Option<usize> {
        let target = self.year_start_value(year);
        self.nearest_index(target)
    }

    /// Index of the value nearest to `target` (in coordinate units).
    pub fn nearest_index(&self, target: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, v) in self.values.iter().enumerate() {
            let dist = (v - target).abs();
            match best {
                Some((_, d)) if dist >= d => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Coordinate value corresponding to January 1, 00:00 of `year`.
    pub fn year_start_value(&self, year: i32) -> f64 {
        // Years beyond chrono's range clamp; nearest-match resolves such
        // requests to a boundary value either way.
        let year = year.clamp(-260_000, 260_000);
        let jan1 = CalendarDate {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0.0,
        };
        match self.calendar.absolute_seconds(&jan1) {
            Ok(abs) => (abs - self.epoch_seconds) / self.unit_seconds,
            // Jan 1 of a clamped year is always valid.
            Err(_) => 0.0,
        }
    }

    fn year_of_value(&self, value: f64) -> i32 {
        self.calendar
            .year_of(self.epoch_seconds + value * self.unit_seconds)
    }
}

/// Parse a CF units string of the form `<unit> since <epoch>`.
fn parse_units(units: &str) -> Result<(TimeUnit, CalendarDate), TimeParseError> {
    let mut parts = units.split_whitespace();
    let unit_word = parts
        .next()
        .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
    let unit = match unit_word.to_ascii_lowercase().as_str() {
        "days" | "day" | "d" => TimeUnit::Days,
        "hours" | "hour" | "hrs" | "h" => TimeUnit::Hours,
        "seconds" | "second" | "secs" | "s" => TimeUnit::Seconds,
        _ => return Err(TimeParseError::InvalidUnits(units.to_string())),
    };
    match parts.next() {
        Some(word) if word.eq_ignore_ascii_case("since") => {}
        _ => return Err(TimeParseError::InvalidUnits(units.to_string())),
    }
    let epoch_str: Vec<&str> = parts.collect();
    if epoch_str.is_empty() {
        return Err(TimeParseError::InvalidUnits(units.to_string()));
    }
    let epoch = parse_epoch(&epoch_str.join(" "))?;
    Ok((unit, epoch))
}

/// Parse an epoch timestamp: `YYYY-MM-DD`, optionally followed by
/// `HH:MM:SS[.fff]` separated by a space or `T`. Trailing `Z`/UTC markers
/// are tolerated.
fn parse_epoch(s: &str) -> Result<CalendarDate, TimeParseError> {
    let cleaned = s
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim()
        .replace('T', " ");
    let mut fields = cleaned.split_whitespace();
    let date_part = fields
        .next()
        .ok_or_else(|| TimeParseError::InvalidEpoch(s.to_string()))?;
    let time_part = fields.next();

    let (negative, date_digits) = match date_part.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, date_part),
    };
    let date_fields: Vec<&str> = date_digits.split('-').collect();
    if date_fields.len() != 3 {
        return Err(TimeParseError::InvalidEpoch(s.to_string()));
    }
    let mut year: i32 = date_fields[0]
        .parse()
        .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?;
    if negative {
        year = -year;
    }
    let month: u32 = date_fields[1]
        .parse()
        .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?;
    let day: u32 = date_fields[2]
        .parse()
        .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?;

    let (hour, minute, second) = match time_part {
        None => (0, 0, 0.0),
        Some(t) => {
            let hms: Vec<&str> = t.split(':').collect();
            if hms.is_empty() || hms.len() > 3 {
                return Err(TimeParseError::InvalidEpoch(s.to_string()));
            }
            let hour: u32 = hms[0]
                .parse()
                .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?;
            let minute: u32 = match hms.get(1) {
                Some(m) => m
                    .parse()
                    .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?,
                None => 0,
            };
            let second: f64 = match hms.get(2) {
                Some(sec) => sec
                    .parse()
                    .map_err(|_| TimeParseError::InvalidEpoch(s.to_string()))?,
                None => 0.0,
            };
            if hour > 23 || minute > 59 || !(0.0..60.0).contains(&second) {
                return Err(TimeParseError::InvalidEpoch(s.to_string()));
            }
            (hour, minute, second)
        }
    };

    Ok(CalendarDate {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("invalid time units: {0}")]
    InvalidUnits(String),

    #[error("invalid epoch timestamp: {0}")]
    InvalidEpoch(String),

    #[error("unsupported calendar: {0}")]
    UnsupportedCalendar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noleap_axis(values: Vec<f64>) -> TimeAxis {
        TimeAxis::new(values, "days since 1900-01-01", Some("noleap")).unwrap()
    }

    #[test]
    fn test_parse_units_date_only() {
        let (unit, epoch) = parse_units("days since 1900-01-01").unwrap();
        assert_eq!(unit, TimeUnit::Days);
        assert_eq!(epoch.year, 1900);
        assert_eq!(epoch.month, 1);
        assert_eq!(epoch.day, 1);
        assert_eq!(epoch.hour, 0);
    }

    #[test]
    fn test_parse_units_with_time() {
        let (unit, epoch) = parse_units("hours since 1940-01-01T06:30:00Z").unwrap();
        assert_eq!(unit, TimeUnit::Hours);
        assert_eq!(epoch.hour, 6);
        assert_eq!(epoch.minute, 30);
    }

    #[test]
    fn test_parse_units_rejects_unknown_unit() {
        assert!(matches!(
            parse_units("fortnights since 1900-01-01"),
            Err(TimeParseError::InvalidUnits(_))
        ));
    }

    #[test]
    fn test_parse_units_rejects_missing_since() {
        assert!(parse_units("days 1900-01-01").is_err());
        assert!(parse_units("days since").is_err());
    }

    #[test]
    fn test_calendar_attribute() {
        assert_eq!(
            CfCalendar::from_attribute(None).unwrap(),
            CfCalendar::Standard
        );
        assert_eq!(
            CfCalendar::from_attribute(Some("noleap")).unwrap(),
            CfCalendar::Noleap
        );
        assert_eq!(
            CfCalendar::from_attribute(Some("365_day")).unwrap(),
            CfCalendar::Noleap
        );
        assert!(CfCalendar::from_attribute(Some("360_day")).is_err());
    }

    #[test]
    fn test_noleap_year_arithmetic() {
        // 40 noleap years after the 1900 epoch.
        let axis = noleap_axis(vec![40.0 * 365.0]);
        assert_eq!(axis.year_of_index(0), Some(1940));
        assert_eq!(axis.year_start_value(1940), 14_600.0);
    }

    #[test]
    fn test_standard_calendar_counts_leap_days() {
        // 1940 is a leap year: Jan 1 1941 is 366 days = 8784 hours later.
        let axis = TimeAxis::new(vec![0.0], "hours since 1940-01-01 00:00:00", None).unwrap();
        assert_eq!(axis.year_start_value(1941), 8_784.0);
    }

    #[test]
    fn test_year_bounds_unsorted() {
        let axis = noleap_axis(vec![365.0 * 50.0, 365.0 * 40.0, 365.0 * 45.0]);
        assert_eq!(axis.year_bounds(), Some((1940, 1950)));
    }

    #[test]
    fn test_year_bounds_empty() {
        let axis = noleap_axis(vec![]);
        assert_eq!(axis.year_bounds(), None);
        assert_eq!(axis.nearest_index_to_year_start(1950), None);
    }

    #[test]
    fn test_nearest_match_mid_year_samples() {
        // Annual means timestamped mid-year: Jan 1 targets still resolve to
        // the sample of the requested year.
        let values: Vec<f64> = (0..5).map(|k| (1940 - 1900 + k) as f64 * 365.0 + 182.0).collect();
        let axis = noleap_axis(values);
        assert_eq!(axis.nearest_index_to_year_start(1942), Some(2));
    }

    #[test]
    fn test_nearest_clamps_to_boundaries() {
        // 1940..=2023 annual samples.
        let values: Vec<f64> = (0..84).map(|k| (40 + k) as f64 * 365.0).collect();
        let axis = noleap_axis(values);
        assert_eq!(axis.nearest_index_to_year_start(2050), Some(83));
        assert_eq!(axis.nearest_index_to_year_start(1800), Some(0));
        assert_eq!(axis.year_of_index(83), Some(2023));
        assert_eq!(axis.year_of_index(0), Some(1940));
    }

    #[test]
    fn test_nearest_tie_prefers_earlier_index() {
        let axis = noleap_axis(vec![10.0, 30.0]);
        // Target 20 is equidistant.
        assert_eq!(axis.nearest_index(20.0), Some(0));
    }

    #[test]
    fn test_far_future_year_saturates() {
        let values: Vec<f64> = (0..84).map(|k| (40 + k) as f64 * 365.0).collect();
        let axis = noleap_axis(values);
        assert_eq!(axis.nearest_index_to_year_start(i32::MAX), Some(83));
        assert_eq!(axis.nearest_index_to_year_start(i32::MIN), Some(0));
    }
}
