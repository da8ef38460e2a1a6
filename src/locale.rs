//! Locale handling. Only the first day of the week is locale sensitive.

use std::fmt;
use std::str::FromStr;

use icu_calendar::types::Weekday as IcuWeekday;
use icu_calendar::week::{WeekInformation, WeekPreferences};
use jiff::civil::Weekday;
use tracing::warn;

use crate::error::ExprError;

/// A BCP-47 tag such as `es-ES`, `en_US` or `en-US-u-fw-mon`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    inner: icu_locale::Locale,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Result<Self, ExprError> {
        let tag = match region {
            Some(r) => format!("{language}-{r}"),
            None => language.to_string(),
        };
        tag.parse()
    }

    pub fn language(&self) -> &str {
        self.inner.id.language.as_str()
    }

    pub fn region(&self) -> Option<&str> {
        self.inner.id.region.as_ref().map(|r| r.as_str())
    }

    /// First day of the week from CLDR week data. A `-u-fw-` extension
    /// overrides the region default.
    pub fn week_start(&self) -> Weekday {
        match WeekInformation::try_new(WeekPreferences::from(&self.inner)) {
            Ok(info) => to_jiff(info.first_weekday),
            Err(e) => {
                warn!(locale = %self.inner, error = %e, "no week data, using Monday");
                Weekday::Monday
            }
        }
    }
}

fn to_jiff(weekday: IcuWeekday) -> Weekday {
    match weekday {
        IcuWeekday::Monday => Weekday::Monday,
        IcuWeekday::Tuesday => Weekday::Tuesday,
        IcuWeekday::Wednesday => Weekday::Wednesday,
        IcuWeekday::Thursday => Weekday::Thursday,
        IcuWeekday::Friday => Weekday::Friday,
        IcuWeekday::Saturday => Weekday::Saturday,
        IcuWeekday::Sunday => Weekday::Sunday,
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            inner: icu_locale::locale!("es-ES"),
        }
    }
}

impl FromStr for Locale {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // POSIX-style `en_US` is common in configuration files
        let tag = s.trim().replace('_', "-");
        let inner = icu_locale::Locale::try_from_str(&tag).map_err(|_| ExprError::locale(s))?;
        Ok(Self { inner })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dash_and_underscore_tags() {
        let es: Locale = "es-ES".parse().unwrap();
        assert_eq!(es.language(), "es");
        assert_eq!(es.region(), Some("ES"));

        let us: Locale = "en_us".parse().unwrap();
        assert_eq!(us.to_string(), "en-US");
    }

    #[test]
    fn script_subtag_is_kept_apart_from_region() {
        let tw: Locale = "zh-Hant-TW".parse().unwrap();
        assert_eq!(tw.region(), Some("TW"));
        assert_eq!(tw.week_start(), Weekday::Sunday);
    }

    #[test]
    fn week_start_by_region() {
        let start = |tag: &str| tag.parse::<Locale>().unwrap().week_start();
        assert_eq!(start("es-ES"), Weekday::Monday);
        assert_eq!(start("en-US"), Weekday::Sunday);
        assert_eq!(start("pt-BR"), Weekday::Sunday);
        assert_eq!(start("ar-EG"), Weekday::Saturday);
        assert_eq!(start("dv-MV"), Weekday::Friday);
        assert_eq!(start("fr"), Weekday::Monday);
    }

    #[test]
    fn first_day_extension_overrides_region() {
        let start = |tag: &str| tag.parse::<Locale>().unwrap().week_start();
        assert_eq!(start("en-US-u-fw-mon"), Weekday::Monday);
        assert_eq!(start("es-ES-u-fw-sun"), Weekday::Sunday);
    }

    #[test]
    fn default_is_spain() {
        let locale = Locale::default();
        assert_eq!(locale.to_string(), "es-ES");
        assert_eq!(locale.week_start(), Weekday::Monday);
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!("".parse::<Locale>().is_err());
        assert!("español".parse::<Locale>().is_err());
        assert!("1-ES".parse::<Locale>().is_err());
        assert!(matches!(
            "es-".parse::<Locale>(),
            Err(ExprError::InvalidLocale { .. })
        ));
    }
}
