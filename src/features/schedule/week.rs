//! Day profiles and the week they make up.
//!
//! Weekdays are indexed Sunday = 0 .. Saturday = 6, matching
//! `chrono::Weekday::num_days_from_sunday` which the date resolver uses.

use crate::core::ScheduleError;
use chrono::Weekday;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Sunday-first weekday order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Minutes since midnight for a wall-clock time
pub const fn hm(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Half-open span of minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// Allowed intervals for one weekday
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayProfile {
    weekday: u8,
    intervals: Vec<Interval>,
}

impl DayProfile {
    /// Build from a flat boundary list: start, end, start, end, ...
    ///
    /// An odd-length list is rejected rather than dropping the trailing boundary.
    pub fn from_boundaries(weekday: u8, boundaries: &[u32]) -> Result<Self, ScheduleError> {
        if boundaries.len() % 2 != 0 {
            return Err(ScheduleError::malformed(
                weekday,
                format!(
                    "odd number of boundaries ({}); every start needs an end",
                    boundaries.len()
                ),
            ));
        }

        let pairs: Vec<(u32, u32)> = boundaries
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        Self::from_intervals(weekday, &pairs)
    }

    /// Build from `(start_minute, end_minute)` pairs
    pub fn from_intervals(weekday: u8, pairs: &[(u32, u32)]) -> Result<Self, ScheduleError> {
        if weekday > 6 {
            return Err(ScheduleError::malformed(
                weekday,
                "weekday index must be 0-6 (Sunday = 0)",
            ));
        }

        let mut intervals: Vec<Interval> = Vec::with_capacity(pairs.len());
        for &(start, end) in pairs {
            if start >= MINUTES_PER_DAY || end >= MINUTES_PER_DAY {
                return Err(ScheduleError::malformed(
                    weekday,
                    format!("interval {start}-{end} falls outside 0-{MINUTES_PER_DAY}"),
                ));
            }
            if start >= end {
                return Err(ScheduleError::malformed(
                    weekday,
                    format!("interval {start}-{end} does not start before it ends"),
                ));
            }
            if let Some(prev) = intervals.last() {
                if start <= prev.end {
                    return Err(ScheduleError::malformed(
                        weekday,
                        format!(
                            "interval {start}-{end} overlaps or precedes {}-{}",
                            prev.start, prev.end
                        ),
                    ));
                }
            }
            intervals.push(Interval { start, end });
        }

        Ok(DayProfile { weekday, intervals })
    }

    /// A day with no allowed time
    pub fn empty(weekday: u8) -> Result<Self, ScheduleError> {
        Self::from_intervals(weekday, &[])
    }

    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    pub fn chrono_weekday(&self) -> Weekday {
        WEEKDAYS[self.weekday as usize]
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn total_minutes(&self) -> u32 {
        self.intervals.iter().map(Interval::duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Seven day profiles, Sunday first. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    days: Vec<DayProfile>,
}

impl WeekSchedule {
    pub fn new(days: Vec<DayProfile>) -> Result<Self, ScheduleError> {
        if days.len() != 7 {
            return Err(ScheduleError::malformed(
                days.len().min(u8::MAX as usize) as u8,
                format!("a week needs exactly 7 day profiles, got {}", days.len()),
            ));
        }
        for (index, day) in days.iter().enumerate() {
            if day.weekday as usize != index {
                return Err(ScheduleError::malformed(
                    day.weekday,
                    format!("profile listed at position {index}"),
                ));
            }
        }
        Ok(WeekSchedule { days })
    }

    /// Build from seven flat boundary lists in minutes, Sunday first
    pub fn from_boundary_table(table: &[&[u32]]) -> Result<Self, ScheduleError> {
        let days = table
            .iter()
            .enumerate()
            .map(|(index, bounds)| DayProfile::from_boundaries(index as u8, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }

    /// The built-in week: mornings and evenings on weekdays, long days otherwise
    pub fn default_week() -> Self {
        let table: [&[u32]; 7] = [
            &[hm(6, 30), hm(20, 30)],
            &[hm(5, 0), hm(8, 0), hm(16, 15), hm(20, 30)],
            &[hm(5, 0), hm(8, 0), hm(16, 15), hm(17, 0), hm(19, 0), hm(20, 30)],
            &[hm(5, 0), hm(8, 0), hm(16, 15), hm(20, 30)],
            &[hm(5, 0), hm(8, 0), hm(16, 15), hm(20, 30)],
            &[hm(5, 0), hm(20, 30)],
            &[hm(6, 30), hm(20, 30)],
        ];
        let days = table
            .iter()
            .enumerate()
            .map(|(index, bounds)| DayProfile {
                weekday: index as u8,
                intervals: bounds
                    .chunks_exact(2)
                    .map(|pair| Interval {
                        start: pair[0],
                        end: pair[1],
                    })
                    .collect(),
            })
            .collect();
        WeekSchedule { days }
    }

    /// Profile for `day_index` (Sunday = 0); indexes wrap modulo 7
    pub fn day(&self, day_index: usize) -> &DayProfile {
        &self.days[day_index % 7]
    }

    pub fn days(&self) -> &[DayProfile] {
        &self.days
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::default_week()
    }
}
