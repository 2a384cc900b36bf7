//! Simulation time model.
//!
//! # Design
//!
//! Two notions of time coexist:
//!
//! - [`Tick`] — the monotonically increasing step counter of the engine.  It
//!   orders updates and drives the route cursor; it never depends on the
//!   wall clock.
//! - [`Timestamp`] — wall-clock seconds since the Unix epoch (UTC), stamped
//!   on every update and written to the event log as
//!   `YYYY-MM-DD HH:MM:SS`.
//!
//! Wall time is read through the [`Clock`] trait so tests can pin it with
//! [`FixedClock`].  Calendar conversion uses the days-from-civil algorithm
//! directly; no datetime library is needed for second-precision UTC.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Timestamp ─────────────────────────────────────────────────────────────────

/// Wall-clock time with second precision, as Unix seconds.
///
/// Always UTC, never local time: `Display` and the `timestamp` column of the
/// event log show the UTC calendar date and time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current system time, truncated to whole seconds.
    ///
    /// A system clock set before 1970 yields `Timestamp(0)`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Timestamp(secs)
    }

    /// Build from calendar components (UTC).  No range checking beyond what
    /// the arithmetic needs; use [`FromStr`] for validated input.
    pub fn from_ymd_hms(year: i64, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let days = days_from_civil(year, month, day);
        Timestamp(days * 86_400 + hour as i64 * 3_600 + min as i64 * 60 + sec as i64)
    }

    /// Break into `(year, month, day, hour, minute, second)` (UTC).
    pub fn to_ymd_hms(self) -> (i64, u32, u32, u32, u32, u32) {
        let days = self.0.div_euclid(86_400);
        let secs = self.0.rem_euclid(86_400) as u32;
        let (y, m, d) = civil_from_days(days);
        (y, m, d, secs / 3_600, (secs % 3_600) / 60, secs % 60)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, mo, d, h, mi, s) = self.to_ymd_hms();
        write!(f, "{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}")
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    /// Parse `YYYY-MM-DD HH:MM:SS`.
    fn from_str(s: &str) -> CoreResult<Self> {
        let bad = || CoreError::InvalidTimestamp(s.to_owned());

        let (date, time) = s.trim().split_once(' ').ok_or_else(bad)?;
        let mut date_parts = date.splitn(3, '-');
        let mut time_parts = time.splitn(3, ':');

        let year: i64 = next_field(&mut date_parts).ok_or_else(bad)?;
        let month: u32 = next_field(&mut date_parts).ok_or_else(bad)?;
        let day: u32 = next_field(&mut date_parts).ok_or_else(bad)?;
        let hour: u32 = next_field(&mut time_parts).ok_or_else(bad)?;
        let min: u32 = next_field(&mut time_parts).ok_or_else(bad)?;
        let sec: u32 = next_field(&mut time_parts).ok_or_else(bad)?;

        if !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || min > 59
            || sec > 59
        {
            return Err(bad());
        }
        Ok(Timestamp::from_ymd_hms(year, month, day, hour, min, sec))
    }
}

fn next_field<'a, T: FromStr>(parts: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    parts.next()?.parse().ok()
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

// ── Clocks ────────────────────────────────────────────────────────────────────

/// Source of wall-clock timestamps for emitted updates.
pub trait Clock {
    fn now(&mut self) -> Timestamp;
}

/// Reads the operating-system clock.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&mut self) -> Timestamp {
        Timestamp::now()
    }
}

/// Deterministic clock: starts at a fixed instant and advances by
/// `step_secs` on every read.
#[derive(Copy, Clone, Debug)]
pub struct FixedClock {
    next:      Timestamp,
    step_secs: i64,
}

impl FixedClock {
    /// Clock that always reports `at`.
    pub fn new(at: Timestamp) -> Self {
        Self { next: at, step_secs: 0 }
    }

    /// Clock that reports `start`, `start + step`, `start + 2·step`, …
    pub fn stepping(start: Timestamp, step_secs: i64) -> Self {
        Self { next: start, step_secs }
    }
}

impl Clock for FixedClock {
    fn now(&mut self) -> Timestamp {
        let now = self.next;
        self.next = Timestamp(now.0 + self.step_secs);
        now
    }
}
