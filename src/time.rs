//! # Calendar and time-system conversions
//!
//! Calendar dates ↔ Julian Days across the Julian/Gregorian reform, day-of-week and
//! day-of-year, local civil time ↔ universal time with an explicit date carry, and
//! universal time ↔ Greenwich/local sidereal time.
//!
//! ## Calendars
//!
//! Dates before 1582 October 15 are read in the Julian calendar, later dates in the
//! Gregorian calendar. 1582 October 4 is immediately followed by 1582 October 15; the
//! ten dropped days are rejected by [`CalendarDate::new`].
//!
//! ## Interop
//!
//! [`JulianDay::to_epoch`] and [`JulianDay::from_epoch`] bridge to `hifitime`, treating the
//! Julian Day as a UTC count.
use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::almagest_errors::{ensure_finite, AlmagestError};
use crate::angle::{sexagesimal_to_decimal, wrap_hours, Sexagesimal};
use crate::constants::{
    Degree, Hours, DAYS_PER_CENTURY, DEGREES_PER_HOUR, GREGORIAN_REFORM_JD, J2000,
    SIDEREAL_AMBIGUITY_HOURS, SIDEREAL_RATE, SOLAR_RATE,
};

/// Earliest supported year (Julian Day 0 falls on -4712 January 1.5).
pub const MIN_YEAR: i32 = -4712;

// -------------------------------------------------------------------------------------------------
// Calendar dates
// -------------------------------------------------------------------------------------------------

/// A date in the Julian (before 1582-10-15) or Gregorian calendar.
///
/// `day` carries the time of day as a fraction: `15.25` is 06:00 on the 15th.
/// Astronomical year numbering is used, so 1 BC is year 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(i32, u32, f64)", into = "(i32, u32, f64)")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: f64,
}

impl CalendarDate {
    /// Build a validated calendar date.
    ///
    /// Errors
    /// ------
    /// * `NonFiniteInput` if `day` is NaN or infinite.
    /// * `InvalidDate` if the year precedes [`MIN_YEAR`], the month is outside 1..=12, the
    ///   day is outside `[1, days_in_month + 1)`, or the date falls in the ten days
    ///   dropped by the Gregorian reform.
    pub fn new(year: i32, month: u32, day: f64) -> Result<Self, AlmagestError> {
        ensure_finite(day, "day")?;
        if year < MIN_YEAR {
            return Err(AlmagestError::InvalidDate(format!(
                "year {year} precedes {MIN_YEAR}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(AlmagestError::InvalidDate(format!(
                "month {month} outside 1..=12"
            )));
        }
        let last = days_in_month(year, month) as f64;
        if day < 1.0 || day >= last + 1.0 {
            return Err(AlmagestError::InvalidDate(format!(
                "day {day} outside 1..={last} for {year}-{month:02}"
            )));
        }
        if year == 1582 && month == 10 && (5.0..15.0).contains(&day.floor()) {
            return Err(AlmagestError::InvalidDate(format!(
                "1582-10-{:02} was dropped by the Gregorian reform",
                day.floor()
            )));
        }
        Ok(CalendarDate { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of the month including the fractional time of day.
    pub fn day(&self) -> f64 {
        self.day
    }

    /// Integral day of the month.
    pub fn whole_day(&self) -> u32 {
        self.day.floor() as u32
    }

    /// Time of day carried by the fractional day, in hours.
    pub fn hours(&self) -> Hours {
        (self.day - self.day.floor()) * 24.0
    }

    /// Same date at 0h.
    pub fn date_only(&self) -> CalendarDate {
        CalendarDate {
            day: self.day.floor(),
            ..*self
        }
    }

    /// True on and after 1582 October 15.
    pub fn is_gregorian(&self) -> bool {
        (self.year, self.month, self.day.floor() as u32) >= (1582, 10, 15)
    }

    pub fn to_julian_day(&self) -> JulianDay {
        JulianDay(calendar_to_jd(self.year, self.month, self.day))
    }

    /// Day of the week, from the Julian Day of the date at 0h.
    pub fn day_of_week(&self) -> Weekday {
        let jd0 = self.date_only().to_julian_day().value();
        let index = ((jd0 + 1.5).rem_euclid(7.0)).floor() as u32;
        Weekday::from_index(index)
    }

    /// Ordinal day in the year, 1 for January 1.
    pub fn day_of_year(&self) -> u32 {
        let jan0 = calendar_to_jd(self.year, 1, 0.0);
        (self.date_only().to_julian_day().value() - jan0).round() as u32
    }
}

impl TryFrom<(i32, u32, f64)> for CalendarDate {
    type Error = AlmagestError;

    fn try_from((year, month, day): (i32, u32, f64)) -> Result<Self, Self::Error> {
        CalendarDate::new(year, month, day)
    }
}

impl From<CalendarDate> for (i32, u32, f64) {
    fn from(d: CalendarDate) -> Self {
        (d.year, d.month, d.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:09.6}", self.year, self.month, self.day)
    }
}

/// Leap-year rule of the calendar in force for `year` (Julian up to 1582).
pub fn is_leap_year(year: i32) -> bool {
    if year <= 1582 {
        year.rem_euclid(4) == 0
    } else {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }
}

/// Number of days in `month` of `year`, `0` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Civil calendar → Julian Day, without validation.
///
/// January and February count as months 13 and 14 of the previous year; the
/// centuries correction `B` applies from 1582 October 15 onwards.
pub(crate) fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month < 3 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };

    let b = if (year, month, day.floor() as i64) >= (1582, 10, 15) {
        let a = (y / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}

/// Julian Day → civil calendar, without validation.
fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let z = (jd + 0.5).floor();
    let f = jd + 0.5 - z;

    let a = if z > GREGORIAN_REFORM_JD {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    } else {
        z
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 13.5 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.5 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}

/// Gregorian Easter Sunday of `year`.
///
/// Errors
/// ------
/// * `InvalidDate` for years before 1583, where the Gregorian computus does not apply.
pub fn easter_date(year: i32) -> Result<CalendarDate, AlmagestError> {
    if year < 1583 {
        return Err(AlmagestError::InvalidDate(format!(
            "Gregorian Easter is undefined for {year}"
        )));
    }
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    CalendarDate::new(year, month as u32, day as f64)
}

/// Days of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    fn from_index(index: u32) -> Self {
        match index % 7 {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// -------------------------------------------------------------------------------------------------
// Julian Days
// -------------------------------------------------------------------------------------------------

/// A Julian Day number with its fraction, on the UT scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(f64);

impl JulianDay {
    /// Wrap a raw Julian Day.
    ///
    /// Errors
    /// ------
    /// * `NonFiniteInput` for NaN or infinities.
    /// * `InvalidDate` for values before -4712 January 1.0.
    pub fn new(value: f64) -> Result<Self, AlmagestError> {
        ensure_finite(value, "julian day")?;
        if value < -0.5 {
            return Err(AlmagestError::InvalidDate(format!(
                "julian day {value} precedes -4712-01-01"
            )));
        }
        Ok(JulianDay(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_calendar_date(self) -> CalendarDate {
        let (year, month, day) = jd_to_calendar(self.0);
        CalendarDate { year, month, day }
    }

    /// Julian Day at 0h UT of the same civil date.
    pub fn midnight(self) -> JulianDay {
        JulianDay((self.0 - 0.5).floor() + 0.5)
    }

    /// Universal time of day, in hours.
    pub fn ut_hours(self) -> Hours {
        (self.0 - self.midnight().0) * 24.0
    }

    /// Julian centuries elapsed since the Julian Day `epoch`.
    pub fn centuries_since(self, epoch: f64) -> f64 {
        (self.0 - epoch) / DAYS_PER_CENTURY
    }

    pub fn add_days(self, days: f64) -> JulianDay {
        JulianDay(self.0 + days)
    }

    /// Convert to a `hifitime` epoch, reading the day count as UTC.
    pub fn to_epoch(self) -> Epoch {
        Epoch::from_jde_utc(self.0)
    }

    /// Build from a `hifitime` epoch expressed in UTC.
    pub fn from_epoch(epoch: &Epoch) -> Result<Self, AlmagestError> {
        JulianDay::new(epoch.to_jde_utc_days())
    }
}

impl From<CalendarDate> for JulianDay {
    fn from(date: CalendarDate) -> Self {
        date.to_julian_day()
    }
}

impl From<&CalendarDate> for JulianDay {
    fn from(date: &CalendarDate) -> Self {
        date.to_julian_day()
    }
}

impl fmt::Display for JulianDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

// -------------------------------------------------------------------------------------------------
// Time of day
// -------------------------------------------------------------------------------------------------

/// A whole calendar date with a time of day in `[0, 24)` hours.
///
/// Every conversion that can cross midnight (local ↔ universal time, event times)
/// returns a `DatedTime`, so the date carry is never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedTime {
    pub date: CalendarDate,
    pub hours: Hours,
}

impl DatedTime {
    /// Pair a date with a time of day.
    ///
    /// Any fractional day carried by `date` is dropped in favour of `hours`.
    ///
    /// Errors
    /// ------
    /// * `NonFiniteInput` / `InvalidDate` when `hours` is outside `[0, 24)`.
    pub fn new(date: CalendarDate, hours: Hours) -> Result<Self, AlmagestError> {
        ensure_finite(hours, "hours")?;
        if !(0.0..24.0).contains(&hours) {
            return Err(AlmagestError::InvalidDate(format!(
                "time of day {hours} h outside [0, 24)"
            )));
        }
        Ok(DatedTime {
            date: date.date_only(),
            hours,
        })
    }

    /// Build from civil components.
    pub fn from_hms(
        year: i32,
        month: u32,
        day: u32,
        hours: f64,
        minutes: f64,
        seconds: f64,
    ) -> Result<Self, AlmagestError> {
        let date = CalendarDate::new(year, month, day as f64)?;
        DatedTime::new(date, hms_to_hours(hours, minutes, seconds)?)
    }

    /// Split a Julian Day into its civil date and time of day.
    pub fn from_julian_day(jd: JulianDay) -> Self {
        let mut midnight = jd.midnight();
        let mut hours = (jd.value() - midnight.value()) * 24.0;
        if hours >= 24.0 {
            midnight = midnight.add_days(1.0);
            hours = 0.0;
        }
        DatedTime {
            date: midnight.to_calendar_date(),
            hours,
        }
    }

    pub fn to_julian_day(&self) -> JulianDay {
        JulianDay(self.date.date_only().to_julian_day().value() + self.hours / 24.0)
    }

    /// Shift by a signed number of hours, carrying whole days into the date.
    pub fn add_hours(&self, delta: Hours) -> DatedTime {
        let raw = self.hours + delta;
        let carry = (raw / 24.0).floor();
        let hours = wrap_hours(raw);
        let jd0 = self.date.date_only().to_julian_day().add_days(carry);
        DatedTime {
            date: jd0.to_calendar_date(),
            hours,
        }
    }

    /// Time of day as hours, minutes and seconds.
    ///
    /// Errors
    /// ------
    /// * `NonFiniteInput` if the hours are not finite.
    pub fn hms(&self) -> Result<Sexagesimal, AlmagestError> {
        hours_to_hms(self.hours)
    }
}

impl fmt::Display for DatedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.hms().map_err(|_| fmt::Error)?.round_seconds(2);
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:05.2}",
            self.date.year(),
            self.date.month(),
            self.date.whole_day(),
            t.units,
            t.minutes,
            t.seconds
        )
    }
}

/// Hours, minutes and seconds to decimal hours (sign taken from `hours`).
pub fn hms_to_hours(hours: f64, minutes: f64, seconds: f64) -> Result<Hours, AlmagestError> {
    sexagesimal_to_decimal(hours, minutes, seconds)
}

/// Decimal hours to hours, minutes and seconds.
pub fn hours_to_hms(hours: Hours) -> Result<Sexagesimal, AlmagestError> {
    Sexagesimal::from_decimal(hours)
}

// -------------------------------------------------------------------------------------------------
// Time zones
// -------------------------------------------------------------------------------------------------

/// Offset of local civil time from UT, east positive, with a daylight-saving flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeZoneSpec {
    pub utc_offset_hours: f64,
    pub daylight_saving: bool,
}

impl TimeZoneSpec {
    /// Errors
    /// ------
    /// * `InvalidTimeZone` when the offset is not finite or lies outside ±14 h.
    pub fn new(utc_offset_hours: f64, daylight_saving: bool) -> Result<Self, AlmagestError> {
        if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > 14.0 {
            return Err(AlmagestError::InvalidTimeZone(format!(
                "UTC offset {utc_offset_hours} h outside ±14 h"
            )));
        }
        Ok(TimeZoneSpec {
            utc_offset_hours,
            daylight_saving,
        })
    }

    pub fn utc() -> Self {
        TimeZoneSpec {
            utc_offset_hours: 0.0,
            daylight_saving: false,
        }
    }

    /// Zone offset plus one hour when daylight saving is in force.
    pub fn total_offset_hours(&self) -> Hours {
        self.utc_offset_hours + if self.daylight_saving { 1.0 } else { 0.0 }
    }
}

impl Default for TimeZoneSpec {
    fn default() -> Self {
        Self::utc()
    }
}

/// Local civil time → universal time.
///
/// The returned [`DatedTime`] carries the Greenwich date, which may differ from the
/// local date by one day.
///
/// # Examples
///
/// ```rust
/// use almagest::time::{local_to_universal, DatedTime, TimeZoneSpec};
///
/// let local = DatedTime::from_hms(2013, 7, 1, 3.0, 37.0, 0.0).unwrap();
/// let zone = TimeZoneSpec::new(4.0, true).unwrap();
/// let ut = local_to_universal(&local, &zone);
/// assert_eq!(ut.date.whole_day(), 30);
/// assert!((ut.hours - 22.616667).abs() < 1e-6);
/// ```
pub fn local_to_universal(local: &DatedTime, zone: &TimeZoneSpec) -> DatedTime {
    local.add_hours(-zone.total_offset_hours())
}

/// Universal time → local civil time, carrying the date when needed.
pub fn universal_to_local(ut: &DatedTime, zone: &TimeZoneSpec) -> DatedTime {
    ut.add_hours(zone.total_offset_hours())
}

// -------------------------------------------------------------------------------------------------
// Sidereal time
// -------------------------------------------------------------------------------------------------

/// Greenwich sidereal time at 0h UT of the date containing `jd`.
fn sidereal_time_at_midnight(jd: JulianDay) -> Hours {
    let c = jd.midnight().centuries_since(J2000);
    wrap_hours(6.697374558 + 2400.051336 * c + 0.000025862 * c * c)
}

/// Universal time → Greenwich mean sidereal time (hours).
pub fn ut_to_gst(ut: &DatedTime) -> Hours {
    let t0 = sidereal_time_at_midnight(ut.date.to_julian_day());
    wrap_hours(t0 + ut.hours * SIDEREAL_RATE)
}

/// Result of a GST → UT conversion.
///
/// A sidereal day is 3m56s shorter than a solar day, so GST values reached in the first
/// `0.065574 h` of UT recur at the end of the same date; `ambiguous` flags that case and
/// `ut` holds the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiderealConversion {
    pub ut: DatedTime,
    pub ambiguous: bool,
}

/// Greenwich sidereal time on `date` → universal time.
pub fn gst_to_ut(gst: Hours, date: &CalendarDate) -> Result<SiderealConversion, AlmagestError> {
    ensure_finite(gst, "sidereal time")?;
    let date = date.date_only();
    let t0 = sidereal_time_at_midnight(date.to_julian_day());
    let ut = wrap_hours(gst - t0) * SOLAR_RATE;
    Ok(SiderealConversion {
        ut: DatedTime { date, hours: ut },
        ambiguous: ut < SIDEREAL_AMBIGUITY_HOURS,
    })
}

/// Greenwich → local sidereal time for an east-positive `longitude` in degrees.
pub fn gst_to_lst(gst: Hours, longitude: Degree) -> Result<Hours, AlmagestError> {
    ensure_finite(gst, "sidereal time")?;
    ensure_finite(longitude, "longitude")?;
    Ok(wrap_hours(gst + longitude / DEGREES_PER_HOUR))
}

/// Local → Greenwich sidereal time for an east-positive `longitude` in degrees.
pub fn lst_to_gst(lst: Hours, longitude: Degree) -> Result<Hours, AlmagestError> {
    ensure_finite(lst, "sidereal time")?;
    ensure_finite(longitude, "longitude")?;
    Ok(wrap_hours(lst - longitude / DEGREES_PER_HOUR))
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::TimeScale;

    #[test]
    fn test_calendar_to_julian_day() {
        let jd = CalendarDate::new(2009, 6, 19.75).unwrap().to_julian_day();
        assert_relative_eq!(jd.value(), 2455002.25);

        assert_eq!(CalendarDate::new(2000, 1, 1.5).unwrap().to_julian_day().value(), J2000);
        assert_eq!(
            CalendarDate::new(1582, 10, 4.0).unwrap().to_julian_day().value(),
            2299159.5
        );
        assert_eq!(
            CalendarDate::new(1582, 10, 15.0).unwrap().to_julian_day().value(),
            2299160.5
        );
        assert_eq!(
            CalendarDate::new(-4712, 1, 1.5).unwrap().to_julian_day().value(),
            0.0
        );
    }

    #[test]
    fn test_julian_day_to_calendar() {
        let date = JulianDay::new(2455002.25).unwrap().to_calendar_date();
        assert_eq!((date.year(), date.month()), (2009, 6));
        assert_relative_eq!(date.day(), 19.75);

        let date = JulianDay::new(2299160.5).unwrap().to_calendar_date();
        assert_eq!((date.year(), date.month(), date.day()), (1582, 10, 15.0));
        let date = JulianDay::new(2299159.5).unwrap().to_calendar_date();
        assert_eq!((date.year(), date.month(), date.day()), (1582, 10, 4.0));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(matches!(
            CalendarDate::new(1582, 10, 10.0),
            Err(AlmagestError::InvalidDate(_))
        ));
        assert!(CalendarDate::new(2023, 2, 29.0).is_err());
        assert!(CalendarDate::new(2024, 2, 29.5).is_ok());
        assert!(CalendarDate::new(1900, 2, 29.0).is_err());
        assert!(CalendarDate::new(1500, 2, 29.0).is_ok());
        assert!(CalendarDate::new(2024, 13, 1.0).is_err());
        assert!(CalendarDate::new(2024, 4, 31.0).is_err());
        assert!(CalendarDate::new(2024, 4, 0.5).is_err());
        assert!(CalendarDate::new(-5000, 1, 1.0).is_err());
        assert_eq!(
            CalendarDate::new(2024, 1, f64::NAN),
            Err(AlmagestError::NonFiniteInput("day"))
        );
    }

    #[test]
    fn test_day_of_week_and_year() {
        // 2009-06-19 was a Friday
        let d = CalendarDate::new(2009, 6, 19.0).unwrap();
        assert_eq!(d.day_of_week(), Weekday::Friday);
        assert_eq!(CalendarDate::new(1582, 10, 15.0).unwrap().day_of_week(), Weekday::Friday);
        assert_eq!(CalendarDate::new(1582, 10, 4.0).unwrap().day_of_week(), Weekday::Thursday);

        assert_eq!(CalendarDate::new(2009, 11, 1.0).unwrap().day_of_year(), 305);
        assert_eq!(CalendarDate::new(2024, 12, 31.0).unwrap().day_of_year(), 366);
        assert_eq!(CalendarDate::new(2023, 1, 1.9).unwrap().day_of_year(), 1);
    }

    #[test]
    fn test_easter() {
        let e = easter_date(2003).unwrap();
        assert_eq!((e.month(), e.whole_day()), (4, 20));
        let e = easter_date(2024).unwrap();
        assert_eq!((e.month(), e.whole_day()), (3, 31));
        assert!(easter_date(1500).is_err());
    }

    #[test]
    fn test_hms() {
        assert_relative_eq!(hms_to_hours(18.0, 31.0, 27.0).unwrap(), 18.524166666666666);
        let t = hours_to_hms(10.141944).unwrap().round_seconds(2);
        assert_eq!((t.units, t.minutes), (10, 8));
        assert_relative_eq!(t.seconds, 31.0, epsilon = 1e-6);
    }

    #[test]
    fn test_local_universal_carry() {
        let local = DatedTime::from_hms(2013, 7, 1, 3.0, 37.0, 0.0).unwrap();
        let zone = TimeZoneSpec::new(4.0, true).unwrap();
        let ut = local_to_universal(&local, &zone);
        assert_eq!(
            (ut.date.year(), ut.date.month(), ut.date.whole_day()),
            (2013, 6, 30)
        );
        assert_relative_eq!(ut.hours, 22.616666666666667, epsilon = 1e-9);

        let back = universal_to_local(&ut, &zone);
        assert_eq!(back.date, local.date);
        assert_relative_eq!(back.hours, local.hours, epsilon = 1e-9);

        // crossing a year boundary forwards
        let ut = DatedTime::from_hms(2012, 12, 31, 23.0, 0.0, 0.0).unwrap();
        let zone = TimeZoneSpec::new(-5.0, false).unwrap();
        let local = universal_to_local(&ut, &TimeZoneSpec::new(5.0, false).unwrap());
        assert_eq!((local.date.year(), local.date.month(), local.date.whole_day()), (2013, 1, 1));
        assert_relative_eq!(local.hours, 4.0, epsilon = 1e-12);
        assert!(TimeZoneSpec::new(15.0, false).is_err());
        assert_eq!(zone.total_offset_hours(), -5.0);
    }

    #[test]
    fn test_ut_to_gst() {
        // 1980-04-22 14:36:51.67 UT → GST 4h40m5.23s
        let ut = DatedTime::from_hms(1980, 4, 22, 14.0, 36.0, 51.67).unwrap();
        let gst = ut_to_gst(&ut);
        assert_relative_eq!(gst, 4.668119327, epsilon = 1e-6);

        let conv = gst_to_ut(gst, &ut.date).unwrap();
        assert!(!conv.ambiguous);
        assert_relative_eq!(conv.ut.hours, ut.hours, epsilon = 1e-6);
    }

    #[test]
    fn test_gst_ambiguity() {
        let ut = DatedTime::from_hms(2024, 3, 20, 0.0, 1.0, 0.0).unwrap();
        let gst = ut_to_gst(&ut);
        let conv = gst_to_ut(gst, &ut.date).unwrap();
        assert!(conv.ambiguous);
        assert_relative_eq!(conv.ut.hours, ut.hours, epsilon = 1e-6);
    }

    #[test]
    fn test_gst_lst() {
        let lst = gst_to_lst(4.668119, -64.0).unwrap();
        assert_relative_eq!(lst, 0.4014523, epsilon = 1e-6);
        assert_relative_eq!(lst_to_gst(lst, -64.0).unwrap(), 4.668119, epsilon = 1e-12);
        assert!(gst_to_lst(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_hifitime_interop() {
        let epoch = Epoch::from_gregorian(2021, 1, 1, 0, 0, 0, 0, TimeScale::UTC);
        let jd = JulianDay::from_epoch(&epoch).unwrap();
        assert_relative_eq!(jd.value(), 2459215.5, epsilon = 1e-9);
        let date = jd.to_calendar_date();
        assert_eq!((date.year(), date.month(), date.day()), (2021, 1, 1.0));
        assert_relative_eq!(
            jd.to_epoch().to_jde_utc_days(),
            2459215.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dated_time_from_julian_day() {
        let t = DatedTime::from_julian_day(JulianDay::new(2455002.25).unwrap());
        assert_eq!(t.date.whole_day(), 19);
        assert_relative_eq!(t.hours, 18.0, epsilon = 1e-9);
        assert_relative_eq!(t.to_julian_day().value(), 2455002.25, epsilon = 1e-9);
        assert_eq!(t.to_string(), "2009-06-19 18:00:00.00");
    }

    #[test]
    fn test_dated_time_hms() {
        let date = CalendarDate::new(2009, 6, 19.0).unwrap();
        let t = DatedTime::new(date, 18.5125).unwrap().hms().unwrap();
        assert_eq!((t.units, t.minutes), (18, 30));
        assert_relative_eq!(t.seconds, 45.0, epsilon = 1e-8);

        // fields are public, so a NaN can reach hms without validation
        let broken = DatedTime { date, hours: f64::NAN };
        assert!(matches!(broken.hms(), Err(AlmagestError::NonFiniteInput(_))));
    }

    #[test]
    fn test_serde_validates_dates() {
        let d: CalendarDate = serde_json::from_str("[2003, 7, 27.5]").unwrap();
        assert_eq!(d, CalendarDate::new(2003, 7, 27.5).unwrap());
        assert!(serde_json::from_str::<CalendarDate>("[1582, 10, 10.0]").is_err());
    }
}
