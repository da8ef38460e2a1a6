//! The date-set algebra.
//!
//! A [`DateSet`] is an immutable set of civil dates grouped by year. Every
//! operator works on each year bucket independently and returns a new set;
//! the receiver is never modified. Ordinal arguments are 1-based and may be
//! negative to count from the end of a bucket (`-1` is the last element).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use jiff::civil::{Date, Weekday};
use jiff::Span;

/// Calendar unit for relative shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
}

impl TimeUnit {
    fn span(self, amount: i64) -> Result<Span, jiff::Error> {
        match self {
            Self::Days => Span::new().try_days(amount),
            Self::Weeks => Span::new().try_weeks(amount),
            Self::Months => Span::new().try_months(amount),
        }
    }
}

/// Position-wise comparison used by [`DateSet::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CompareOp {
    Equals,
    Lesser,
    Greater,
}

impl CompareOp {
    pub fn holds(self, left: Date, right: Date) -> bool {
        match self {
            Self::Equals => left == right,
            Self::Lesser => left < right,
            Self::Greater => left > right,
        }
    }
}

/// An immutable set of dates grouped by year.
///
/// Buckets are strictly ascending and never empty. Cloning is cheap: the
/// year map is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSet {
    by_year: Arc<BTreeMap<i16, Vec<Date>>>,
    week_start: Weekday,
    full_weeks: bool,
    approximate: bool,
}

impl DateSet {
    /// Build a set from arbitrary dates: sorted, deduplicated and grouped.
    pub fn new(
        week_start: Weekday,
        full_weeks: bool,
        dates: impl IntoIterator<Item = Date>,
    ) -> Self {
        let mut by_year: BTreeMap<i16, Vec<Date>> = BTreeMap::new();
        for date in dates {
            by_year.entry(date.year()).or_default().push(date);
        }
        for bucket in by_year.values_mut() {
            bucket.sort_unstable();
            bucket.dedup();
        }
        Self {
            by_year: Arc::new(by_year),
            week_start,
            full_weeks,
            approximate: false,
        }
    }

    pub fn empty(week_start: Weekday, full_weeks: bool) -> Self {
        Self::new(week_start, full_weeks, [])
    }

    // --- Accessors ---

    /// All dates in ascending order.
    pub fn dates(&self) -> Vec<Date> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Date> + '_ {
        self.by_year.values().flatten().copied()
    }

    /// Years that have at least one date, ascending.
    pub fn years(&self) -> impl Iterator<Item = i16> + '_ {
        self.by_year.keys().copied()
    }

    /// The bucket for one year.
    pub fn year(&self, year: i16) -> Option<&[Date]> {
        self.by_year.get(&year).map(Vec::as_slice)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.year(date.year())
            .is_some_and(|bucket| bucket.binary_search(&date).is_ok())
    }

    pub fn len(&self) -> usize {
        self.by_year.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn full_weeks(&self) -> bool {
        self.full_weeks
    }

    /// Whether the expression that produced this set was marked `aprox`.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }

    pub fn with_approximate(&self, approximate: bool) -> Self {
        Self {
            approximate,
            ..self.clone()
        }
    }

    // --- Selection ---

    /// Keep the dates at the given positions of each year.
    pub fn at(&self, days: &[i32]) -> Self {
        if days.is_empty() {
            return self.clone();
        }
        self.map_buckets(|bucket| pick(bucket, days).copied().collect())
    }

    /// Keep the listed weekdays, and of each weekday only the given
    /// occurrences (all of them when `days` is empty).
    pub fn at_weekdays(&self, weekdays: &[Weekday], days: &[i32]) -> Self {
        if weekdays.is_empty() {
            return self.clone();
        }
        self.map_buckets(|bucket| {
            let mut out = Vec::new();
            for &weekday in weekdays {
                let group: Vec<Date> = bucket
                    .iter()
                    .copied()
                    .filter(|d| d.weekday() == weekday)
                    .collect();
                if days.is_empty() {
                    out.extend(group);
                } else {
                    out.extend(pick(&group, days).copied());
                }
            }
            out
        })
    }

    /// Keep every day of the selected weeks. A week starts at the first
    /// date of the bucket and at every date falling on `week_start`.
    pub fn at_week(&self, weeks: &[i32]) -> Self {
        if weeks.is_empty() {
            return self.clone();
        }
        self.map_buckets(|bucket| {
            let split = self.split_weeks(bucket);
            pick(&split, weeks).flat_map(|w| w.iter().copied()).collect()
        })
    }

    /// Keep the selected Saturday/Sunday pairs.
    pub fn at_weekend(&self, weekends: &[i32]) -> Self {
        if weekends.is_empty() {
            return self.clone();
        }
        self.map_buckets(|bucket| {
            let pairs = weekend_pairs(bucket);
            pick(&pairs, weekends).flat_map(|&(sat, sun)| [sat, sun]).collect()
        })
    }

    /// Keep the selected 15-date chunks.
    pub fn at_fortnight(&self, fortnights: &[i32]) -> Self {
        if fortnights.is_empty() {
            return self.clone();
        }
        self.map_buckets(|bucket| {
            let chunks: Vec<&[Date]> = bucket.chunks(15).collect();
            pick(&chunks, fortnights)
                .flat_map(|c| c.iter().copied())
                .collect()
        })
    }

    // --- Ranging ---

    /// Every day from the first date of each year up to the last date of
    /// `until` in the same year, or in the next year when that one would
    /// lie before the start.
    pub fn to(&self, until: &DateSet) -> Self {
        let mut out = Vec::new();
        for (&year, bucket) in self.by_year.iter() {
            let Some(&from) = bucket.first() else {
                continue;
            };
            let Some(mut target) = until.last_of(year) else {
                continue;
            };
            if from > target {
                let Some(next) = year.checked_add(1).and_then(|y| until.last_of(y)) else {
                    continue;
                };
                target = next;
            }
            let mut day = from;
            while day <= target {
                out.push(day);
                match day.tomorrow() {
                    Ok(next) => day = next,
                    Err(_) => break,
                }
            }
        }
        self.derive(out)
    }

    /// Set union.
    pub fn and(&self, other: &DateSet) -> Self {
        self.derive(self.iter().chain(other.iter()))
    }

    // --- Shifting ---

    pub fn before(&self, amount: i32, unit: TimeUnit) -> Self {
        self.shift_all(-i64::from(amount), unit)
    }

    pub fn after(&self, amount: i32, unit: TimeUnit) -> Self {
        self.shift_all(i64::from(amount), unit)
    }

    /// Move each date to the `weeks`-th `weekday` before it. A date that
    /// already falls on `weekday` counts as the zeroth occurrence.
    pub fn before_weekday(&self, weekday: Weekday, weeks: i32) -> Self {
        self.derive(self.iter().filter_map(|d| {
            let add = days_until(d.weekday(), weekday);
            shift(d, add, TimeUnit::Days).and_then(|d| shift(d, -i64::from(weeks), TimeUnit::Weeks))
        }))
    }

    /// Move each date to the `weeks`-th `weekday` after it. Only `weeks == 0`
    /// can land on the date itself.
    pub fn after_weekday(&self, weekday: Weekday, weeks: i32) -> Self {
        self.derive(self.iter().filter_map(|d| {
            let add = days_until(d.weekday(), weekday);
            let weeks = if add == 0 {
                i64::from(weeks)
            } else {
                i64::from(weeks) - 1
            };
            shift(d, add, TimeUnit::Days).and_then(|d| shift(d, weeks, TimeUnit::Weeks))
        }))
    }

    pub fn before_weekend(&self, weekends: i32) -> Self {
        self.before_weekday(Weekday::Saturday, weekends).with_sundays()
    }

    pub fn after_weekend(&self, weekends: i32) -> Self {
        self.after_weekday(Weekday::Saturday, weekends).with_sundays()
    }

    // --- Snapping ---

    /// Snap each date to the closest `weekday`, preferring the earlier one
    /// on a tie.
    pub fn near(&self, weekday: Weekday) -> Self {
        self.derive(self.iter().filter_map(|d| {
            let add = days_until(d.weekday(), weekday);
            if add == 0 {
                return Some(d);
            }
            if add < 7 - add {
                shift(d, add, TimeUnit::Days)
            } else {
                shift(d, add - 7, TimeUnit::Days)
            }
        }))
    }

    /// Snap each date to the closest weekend, measured as the sum of the
    /// distances to its Saturday and Sunday. Ties go to the earlier weekend.
    pub fn near_weekend(&self) -> Self {
        self.derive(self.iter().flat_map(|d| {
            let saturday = match d.weekday() {
                Weekday::Saturday => Some(d),
                Weekday::Sunday => d.yesterday().ok(),
                wd => {
                    let add = days_until(wd, Weekday::Saturday);
                    // next weekend: add + (add + 1); previous: (7 - add) + (6 - add)
                    if 2 * add + 1 < 13 - 2 * add {
                        shift(d, add, TimeUnit::Days)
                    } else {
                        shift(d, add - 7, TimeUnit::Days)
                    }
                }
            };
            saturday.into_iter().flat_map(weekend_of)
        }))
    }

    // --- Conditional ---

    /// For each year of the receiver, take `on_true`'s bucket when every
    /// date of the receiver relates to the date at the same position of
    /// `other` by `op` (both buckets of equal, non-zero size), otherwise
    /// `on_false`'s bucket.
    pub fn compare(
        &self,
        other: &DateSet,
        op: CompareOp,
        on_true: &DateSet,
        on_false: &DateSet,
    ) -> Self {
        let mut out = Vec::new();
        for (&year, left) in self.by_year.iter() {
            let holds = match other.year(year) {
                Some(right) => {
                    !left.is_empty()
                        && left.len() == right.len()
                        && left.iter().zip(right).all(|(&l, &r)| op.holds(l, r))
                }
                None => false,
            };
            let branch = if holds { on_true } else { on_false };
            if let Some(bucket) = branch.year(year) {
                out.extend_from_slice(bucket);
            }
        }
        self.derive(out)
    }

    // --- Internals ---

    fn derive(&self, dates: impl IntoIterator<Item = Date>) -> Self {
        Self::new(self.week_start, self.full_weeks, dates)
    }

    fn map_buckets(&self, mut f: impl FnMut(&[Date]) -> Vec<Date>) -> Self {
        let dates: Vec<Date> = self.by_year.values().flat_map(|b| f(b)).collect();
        self.derive(dates)
    }

    fn shift_all(&self, amount: i64, unit: TimeUnit) -> Self {
        self.derive(self.iter().filter_map(|d| shift(d, amount, unit)))
    }

    fn with_sundays(&self) -> Self {
        self.derive(self.iter().flat_map(weekend_of))
    }

    fn last_of(&self, year: i16) -> Option<Date> {
        self.year(year).and_then(|b| b.last()).copied()
    }

    fn split_weeks<'b>(&self, bucket: &'b [Date]) -> Vec<&'b [Date]> {
        let mut weeks = Vec::new();
        let mut start = 0;
        for (i, d) in bucket.iter().enumerate() {
            if i > start && d.weekday() == self.week_start {
                weeks.push(&bucket[start..i]);
                start = i;
            }
        }
        if start < bucket.len() {
            weeks.push(&bucket[start..]);
        }
        if self.full_weeks {
            weeks.retain(|w| w.len() == 7);
        }
        weeks
    }
}

/// Resolve 1-based, possibly negative, indices against `items`.
fn pick<'a, T>(items: &'a [T], indices: &[i32]) -> impl Iterator<Item = &'a T> + 'a {
    let len = items.len() as i64;
    let positions: BTreeSet<usize> = indices
        .iter()
        .filter_map(|&k| {
            let k = i64::from(k);
            let k = if k < 0 { len + k + 1 } else { k };
            (1..=len).contains(&k).then(|| (k - 1) as usize)
        })
        .collect();
    positions.into_iter().map(move |i| &items[i])
}

/// Adjacent (Saturday, Sunday) pairs, stepping a week at a time from the
/// first Saturday of the bucket.
fn weekend_pairs(bucket: &[Date]) -> Vec<(Date, Date)> {
    let Some(first) = bucket.iter().position(|d| d.weekday() == Weekday::Saturday) else {
        return Vec::new();
    };
    bucket[first..]
        .iter()
        .step_by(7)
        .zip(bucket[first + 1..].iter().step_by(7))
        .filter(|(sat, sun)| {
            sat.weekday() == Weekday::Saturday && sun.weekday() == Weekday::Sunday
        })
        .map(|(&sat, &sun)| (sat, sun))
        .collect()
}

fn weekend_of(saturday: Date) -> impl Iterator<Item = Date> {
    std::iter::once(saturday).chain(saturday.tomorrow().ok())
}

/// Days from `from` forward to the next `to`, in `0..7`.
fn days_until(from: Weekday, to: Weekday) -> i64 {
    i64::from(to.to_monday_one_offset() - from.to_monday_one_offset()).rem_euclid(7)
}

fn shift(date: Date, amount: i64, unit: TimeUnit) -> Option<Date> {
    unit.span(amount)
        .and_then(|span| date.checked_add(span))
        .ok()
}

impl fmt::Display for DateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, date) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{date}")?;
        }
        Ok(())
    }
}

impl IntoIterator for DateSet {
    type Item = Date;
    type IntoIter = std::vec::IntoIter<Date>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates().into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DateSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let dates: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("dates", &dates)?;
        map.serialize_entry("approximate", &self.approximate)?;
        map.end()
    }
}
