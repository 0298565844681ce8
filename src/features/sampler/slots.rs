//! Turning sampled points into timestamps.
//!
//! A point's day index selects a weekday of the coming Sunday-to-Saturday week and
//! its fraction is spent proportionally across that day's allowed intervals.

use super::lhs::{LatinHypercube, BELOW_ONE};
use crate::core::ScheduleError;
use crate::features::schedule::{DayProfile, WeekSchedule};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use log::debug;
use rand::Rng;

const NANOS_PER_MINUTE: i64 = 60_000_000_000;

/// One abstract draw: a weekday and a position within that day's allowed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Sunday = 0
    pub day_index: usize,
    /// Position in `[0, 1)` of the day's allowed minutes, not the 24h clock
    pub fraction: f64,
}

impl SamplePoint {
    /// Map a unit-square point onto (day, fraction)
    pub fn from_unit(point: [f64; 2]) -> Self {
        let day_index = ((point[0].clamp(0.0, BELOW_ONE) * 7.0).floor() as usize).min(6);
        SamplePoint {
            day_index,
            fraction: point[1].clamp(0.0, BELOW_ONE),
        }
    }
}

/// A concrete reminder time
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot {
    pub point: SamplePoint,
    pub timestamp: DateTime<Tz>,
}

/// Days from `today` to `day_index` in the coming Sunday-to-Saturday week.
///
/// Always in `1..=13`; a matching weekday lands exactly 7 days out.
pub fn date_offset_days(today: NaiveDate, day_index: usize) -> i64 {
    let current = today.weekday().num_days_from_sunday() as i64;
    (7 - current) + (day_index % 7) as i64
}

pub fn resolve_date(today: NaiveDate, day_index: usize) -> NaiveDate {
    today + Duration::days(date_offset_days(today, day_index))
}

/// Wall-clock time `fraction` of the way through the day's allowed minutes.
///
/// A budget that lands exactly on a seam resolves to the start of the next
/// interval; anything past the final interval clamps to its end.
pub fn resolve_time(profile: &DayProfile, fraction: f64) -> Result<NaiveTime, ScheduleError> {
    let intervals = profile.intervals();
    let Some((last, leading)) = intervals.split_last() else {
        return Err(ScheduleError::NoAvailabilityForDay {
            weekday: profile.weekday(),
        });
    };

    let total = profile.total_minutes() as i64 * NANOS_PER_MINUTE;
    let mut budget = ((fraction.clamp(0.0, 1.0) * total as f64).round() as i64).min(total);

    for interval in leading {
        let span = interval.duration() as i64 * NANOS_PER_MINUTE;
        if budget < span {
            return Ok(at_offset(interval.start, budget));
        }
        budget -= span;
    }

    let span = last.duration() as i64 * NANOS_PER_MINUTE;
    Ok(at_offset(last.start, budget.min(span)))
}

fn at_offset(start_minute: u32, nanos: i64) -> NaiveTime {
    NaiveTime::MIN + Duration::minutes(start_minute as i64) + Duration::nanoseconds(nanos)
}

/// Attach `tz` to a wall-clock time.
///
/// Ambiguous times take the earlier instant. Times inside a DST gap are read with
/// the offset in force before the gap, which moves them forward by the gap length.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, ScheduleError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let before_gap = tz
                .from_local_datetime(&(naive - Duration::hours(3)))
                .earliest()
                .ok_or_else(|| ScheduleError::NonexistentLocalTime {
                    local: naive.to_string(),
                    timezone: tz.name().to_string(),
                })?;
            let offset = before_gap.offset().fix().local_minus_utc() as i64;
            let utc = naive - Duration::seconds(offset);
            Ok(tz.from_utc_datetime(&utc))
        }
    }
}

/// Draws reminder slots from a fixed week schedule
#[derive(Debug, Clone)]
pub struct SlotSampler {
    schedule: WeekSchedule,
    timezone: Tz,
    hypercube: LatinHypercube<2>,
}

impl SlotSampler {
    pub fn new(schedule: WeekSchedule, timezone: Tz) -> Self {
        SlotSampler {
            schedule,
            timezone,
            hypercube: LatinHypercube::new(),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Stratified draw of `n` points
    pub fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<SamplePoint> {
        self.hypercube
            .sample(n, rng)
            .into_iter()
            .map(SamplePoint::from_unit)
            .collect()
    }

    /// Resolve one point relative to `now`
    pub fn resolve(
        &self,
        point: SamplePoint,
        now: &DateTime<Tz>,
    ) -> Result<ResolvedSlot, ScheduleError> {
        let profile = self.schedule.day(point.day_index);
        let time = resolve_time(profile, point.fraction)?;
        let date = resolve_date(now.date_naive(), point.day_index);
        let timestamp = localize(&self.timezone, date.and_time(time))?;
        Ok(ResolvedSlot { point, timestamp })
    }

    /// Draw and resolve `n` slots. Always returns exactly `n` results; a failed
    /// slot does not stop the others.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        now: &DateTime<Tz>,
        rng: &mut R,
    ) -> Vec<Result<ResolvedSlot, ScheduleError>> {
        let points = self.draw(n, rng);
        debug!("Sampled {} points: {:?}", points.len(), points);

        points
            .into_iter()
            .map(|point| {
                let slot = self.resolve(point, now);
                match &slot {
                    Ok(s) => debug!("Resolved {:?} to {}", point, s.timestamp.to_rfc3339()),
                    Err(e) => debug!("Could not resolve {:?}: {}", point, e),
                }
                slot
            })
            .collect()
    }

    /// `generate` with the thread RNG and the current time in the configured zone
    pub fn generate_now(&self, n: usize) -> Vec<Result<ResolvedSlot, ScheduleError>> {
        let now = Utc::now().with_timezone(&self.timezone);
        self.generate(n, &now, &mut rand::rng())
    }
}
