//! fechas: recurring dates written in plain Spanish.
//!
//! Expressions such as `"tercer fin de semana de agosto"` or
//! `"viernes después del corpus"` are evaluated over a range of years and
//! produce a [`DateSet`] of concrete calendar dates.
//!
//! # Examples
//!
//! ```
//! use jiff::civil::date;
//!
//! let dates = fechas::parse(
//!     "es-ES",
//!     "Europe/Madrid",
//!     true,
//!     Some(2024),
//!     2,
//!     "viernes después del corpus",
//! )
//! .unwrap();
//! assert_eq!(dates.dates(), vec![date(2024, 5, 31), date(2025, 6, 20)]);
//! ```
//!
//! Programs can bind names and branch on a comparison:
//!
//! ```
//! use fechas::{Options, Program};
//!
//! let program: Program = "def navidad: 25 de diciembre; primer lunes después de navidad"
//!     .parse()
//!     .unwrap();
//! let dates = program
//!     .evaluate(&Options::default().first_year(2024).years(1))
//!     .unwrap();
//! assert_eq!(dates.to_string(), "2024-12-30");
//! ```

pub mod anchor;
pub mod ast;
pub mod dateset;
pub mod display;
pub mod easter;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod locale;
pub mod parser;

pub use anchor::{AnchorKind, Month};
pub use ast::Program;
pub use dateset::{CompareOp, DateSet, TimeUnit};
pub use error::{ExprError, Span};
pub use locale::Locale;

use jiff::civil::Weekday;
use jiff::tz::TimeZone;
use jiff::Zoned;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tracing::debug;

use crate::eval::{Context, Interpreter};

/// Evaluation settings.
///
/// With the `serde` feature this can be loaded from any serde format;
/// missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// `language[-REGION]` tag; decides the first day of the week.
    pub locale: String,
    /// IANA zone used to find the current year when `first_year` is unset.
    pub zone: String,
    /// Drop partial weeks when counting weeks.
    pub full_weeks: bool,
    pub first_year: Option<i16>,
    /// Number of consecutive years to evaluate.
    pub years: u16,
    /// Overrides the locale's first day of the week.
    #[cfg_attr(feature = "serde", serde(with = "weekday_serde"))]
    pub week_start: Option<Weekday>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            locale: "es-ES".into(),
            zone: "UTC".into(),
            full_weeks: true,
            first_year: None,
            years: 1,
            week_start: None,
        }
    }
}

impl Options {
    pub fn new(locale: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            zone: zone.into(),
            ..Self::default()
        }
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    pub fn full_weeks(mut self, full_weeks: bool) -> Self {
        self.full_weeks = full_weeks;
        self
    }

    pub fn first_year(mut self, year: i16) -> Self {
        self.first_year = Some(year);
        self
    }

    pub fn years(mut self, years: u16) -> Self {
        self.years = years;
        self
    }

    pub fn week_start(mut self, weekday: Weekday) -> Self {
        self.week_start = Some(weekday);
        self
    }

    /// Resolve locale, week start and first year. The zone is only looked
    /// up when no first year is set.
    pub fn context(&self) -> Result<Context, ExprError> {
        let locale: Locale = self.locale.parse()?;
        let first_year = match self.first_year {
            Some(year) => year,
            None => current_year(&self.zone)?,
        };
        Ok(Context {
            first_year,
            years: self.years,
            full_weeks: self.full_weeks,
            week_start: self.week_start.unwrap_or_else(|| locale.week_start()),
        })
    }
}

fn resolve_tz(name: &str) -> Result<TimeZone, ExprError> {
    if name.eq_ignore_ascii_case("utc") {
        return Ok(TimeZone::UTC);
    }
    if name.eq_ignore_ascii_case("system") {
        return Ok(TimeZone::system());
    }
    TimeZone::get(name).map_err(|e| ExprError::time_zone(name, e))
}

fn current_year(zone: &str) -> Result<i16, ExprError> {
    let tz = resolve_tz(zone)?;
    Ok(Zoned::now().with_time_zone(tz).year())
}

// --- Facade ---

/// Evaluate `text` over `years` years starting at `first_year` (the current
/// year in `zone` when absent).
pub fn parse(
    locale: &str,
    zone: &str,
    full_weeks: bool,
    first_year: Option<i16>,
    years: u16,
    text: &str,
) -> Result<DateSet, ExprError> {
    let options = Options {
        locale: locale.into(),
        zone: zone.into(),
        full_weeks,
        first_year,
        years,
        week_start: None,
    };
    evaluate(text, &options)
}

/// Evaluate `text` with the given options.
#[tracing::instrument(
    level = "debug",
    skip(options),
    fields(locale = %options.locale, years = options.years)
)]
pub fn evaluate(text: &str, options: &Options) -> Result<DateSet, ExprError> {
    let program = parser::parse(text)?;
    let ctx = options.context()?;
    let result = Interpreter::new(ctx, text).run(&program)?;
    debug!(
        first_year = ctx.first_year,
        dates = result.len(),
        approximate = result.is_approximate(),
        "evaluated expression"
    );
    Ok(result)
}

/// Check whether `text` is a well-formed expression.
pub fn validate(text: &str) -> bool {
    parser::parse(text).is_ok()
}

// --- Program convenience methods ---

impl Program {
    /// Parse an expression without evaluating it.
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        parser::parse(input)
    }

    pub fn validate(input: &str) -> bool {
        validate(input)
    }

    /// Evaluate this program. Errors carry no source text since a parsed
    /// program does not keep it.
    pub fn evaluate(&self, options: &Options) -> Result<DateSet, ExprError> {
        let ctx = options.context()?;
        Interpreter::new(ctx, "").run(self)
    }
}

impl FromStr for Program {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Program {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Program {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Deserialize from the expression string
        let s = String::deserialize(deserializer)?;
        Program::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Weekday names accepted in configuration, English or Spanish.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match lexer::fold(s.trim()).as_str() {
        "monday" | "mon" | "lunes" => Some(Weekday::Monday),
        "tuesday" | "tue" | "martes" => Some(Weekday::Tuesday),
        "wednesday" | "wed" | "miercoles" => Some(Weekday::Wednesday),
        "thursday" | "thu" | "jueves" => Some(Weekday::Thursday),
        "friday" | "fri" | "viernes" => Some(Weekday::Friday),
        "saturday" | "sat" | "sabado" => Some(Weekday::Saturday),
        "sunday" | "sun" | "domingo" => Some(Weekday::Sunday),
        _ => None,
    }
}

#[cfg(feature = "serde")]
mod weekday_serde {
    use jiff::civil::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        weekday: &Option<Weekday>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match weekday {
            Some(wd) => serializer.serialize_some(&format!("{wd:?}").to_lowercase()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Weekday>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                super::parse_weekday(&s)
                    .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {s}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_context_uses_locale_week_start() {
        let ctx = Options::new("en-US", "UTC").first_year(2024).context().unwrap();
        assert_eq!(ctx.week_start, Weekday::Sunday);
        let ctx = Options::default()
            .first_year(2024)
            .week_start(Weekday::Sunday)
            .context()
            .unwrap();
        assert_eq!(ctx.week_start, Weekday::Sunday);
    }

    #[test]
    fn first_year_defaults_to_current_year() {
        let ctx = Options::default().context().unwrap();
        assert_eq!(ctx.first_year, Zoned::now().with_time_zone(TimeZone::UTC).year());
    }

    #[test]
    fn zone_is_only_resolved_when_needed() {
        let options = Options::new("es-ES", "Not/AZone");
        assert!(matches!(
            options.context(),
            Err(ExprError::InvalidTimeZone { .. })
        ));
        assert!(options.first_year(2024).context().is_ok());
    }

    #[test]
    fn invalid_locale_is_reported() {
        let err = parse("??", "UTC", true, Some(2024), 1, "enero").unwrap_err();
        assert!(matches!(err, ExprError::InvalidLocale { .. }));
        assert!(!err.is_parse_failure());
    }

    #[test]
    fn parse_weekday_names() {
        assert_eq!(parse_weekday("Miércoles"), Some(Weekday::Wednesday));
        assert_eq!(parse_weekday("sun"), Some(Weekday::Sunday));
        assert_eq!(parse_weekday("someday"), None);
    }
}
