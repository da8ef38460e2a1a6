//! Named calendar anchors: the twelve months and the movable feasts that
//! hang off Easter Sunday.

use jiff::civil::{Date, Weekday};
use jiff::Span;

use crate::dateset::DateSet;
use crate::easter::easter_date;

/// Month name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// 1-based month number.
    pub fn number(self) -> i8 {
        match self {
            Self::January => 1,
            Self::February => 2,
            Self::March => 3,
            Self::April => 4,
            Self::May => 5,
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
        }
    }

    pub fn from_number(n: i8) -> Option<Self> {
        match n {
            1..=12 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }
}

/// A named anchor that resolves to the same dates every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnchorKind {
    /// Every day of the month.
    Month(Month),
    /// Easter Sunday and the six days after it.
    EasterOctave,
    /// Palm Sunday through Easter Sunday.
    HolyWeek,
    AshWednesday,
    /// The Saturday before Ash Wednesday through Shrove Tuesday.
    Carnival,
    CorpusChristi,
    Ascension,
    /// Pentecost Sunday and Whit Monday.
    Pentecost,
}

impl AnchorKind {
    /// Offset from Easter Sunday to the pivot and number of days the pivot
    /// expands to. `None` for months.
    fn easter_offset(self) -> Option<(i64, i64)> {
        match self {
            Self::Month(_) => None,
            Self::EasterOctave => Some((0, 7)),
            Self::HolyWeek => Some((-7, 8)),
            Self::AshWednesday => Some((-46, 1)),
            Self::Carnival => Some((-50, 4)),
            Self::CorpusChristi => Some((60, 1)),
            Self::Ascension => Some((39, 1)),
            Self::Pentecost => Some((49, 2)),
        }
    }

    /// The single date an Easter-relative anchor is computed from. Months
    /// have no pivot.
    pub fn pivot_date(self, year: i16) -> Option<Date> {
        let (offset, _) = self.easter_offset()?;
        let easter = easter_date(year)?;
        easter.checked_add(Span::new().days(offset)).ok()
    }

    /// Days covered by the anchor, starting at `pivot`.
    pub fn expand(self, pivot: Date) -> Vec<Date> {
        let len = match self {
            Self::Month(_) => i64::from(pivot.days_in_month() - pivot.day() + 1),
            other => other.easter_offset().map_or(1, |(_, len)| len),
        };
        let mut out = Vec::new();
        let mut day = pivot;
        for _ in 0..len {
            out.push(day);
            match day.tomorrow() {
                Ok(next) => day = next,
                Err(_) => break,
            }
        }
        out
    }

    /// Every date the anchor covers in `year`.
    pub fn dates_in(self, year: i16) -> Vec<Date> {
        let pivot = match self {
            Self::Month(m) => Date::new(year, m.number(), 1).ok(),
            other => other.pivot_date(year),
        };
        pivot.map(|p| self.expand(p)).unwrap_or_default()
    }

    /// Resolve the anchor over `years` consecutive years from `first_year`.
    /// Years outside the supported calendar range are skipped.
    pub fn resolve(
        self,
        first_year: i16,
        years: u16,
        full_weeks: bool,
        week_start: Weekday,
    ) -> DateSet {
        let first = i32::from(first_year);
        let dates = (first..first + i32::from(years))
            .filter_map(|y| i16::try_from(y).ok())
            .flat_map(|y| self.dates_in(y));
        DateSet::new(week_start, full_weeks, dates)
    }
}

impl From<Month> for AnchorKind {
    fn from(month: Month) -> Self {
        Self::Month(month)
    }
}
