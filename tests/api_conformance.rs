//! API surface check: every public entry point is called once with the
//! types it is expected to return. Missing methods fail to compile.

use fechas::{DateSet, ExprError, Locale, Options, Program};
use jiff::civil::{date, Weekday};

fn options() -> Options {
    Options::new("es-ES", "Europe/Paris").first_year(2024).years(3)
}

#[test]
fn facade_parse() {
    let result: Result<DateSet, ExprError> = fechas::parse(
        "es-ES",
        "Europe/Paris",
        true,
        Some(2024),
        3,
        "uno de enero",
    );
    assert_eq!(result.unwrap().len(), 3);
}

#[test]
fn facade_parse_without_first_year_uses_zone() {
    let result = fechas::parse("es-ES", "UTC", true, None, 1, "enero").unwrap();
    assert_eq!(result.len(), 31);
}

#[test]
fn facade_evaluate() {
    let result = fechas::evaluate("uno de enero", &options()).unwrap();
    assert_eq!(result.dates()[0], date(2024, 1, 1));
}

#[test]
fn facade_validate() {
    assert!(fechas::validate("tercer fin de semana de agosto"));
    assert!(fechas::validate("navidad"));
    assert!(!fechas::validate("del 3 al 4 de julio"));
}

#[test]
fn static_program_parse() {
    let program: Result<Program, ExprError> = Program::parse("uno de enero");
    assert!(program.is_ok());
    let from_str: Program = "uno de enero".parse().unwrap();
    assert_eq!(program.unwrap(), from_str);
}

#[test]
fn static_program_validate() {
    assert!(Program::validate("uno de enero"));
    assert!(!Program::validate("de enero"));
}

#[test]
fn instance_evaluate() {
    let program = Program::parse("penultimo miercoles de marzo").unwrap();
    let result: DateSet = program.evaluate(&options()).unwrap();
    assert_eq!(
        result.dates(),
        vec![date(2024, 3, 20), date(2025, 3, 19), date(2026, 3, 18)]
    );
}

#[test]
fn instance_to_string() {
    let program = Program::parse("Tercer fin de semana de Agosto").unwrap();
    let result: String = program.to_string();
    assert_eq!(result, "tercer fin de semana de agosto");
}

#[test]
fn dateset_accessors() {
    let result = fechas::evaluate("aprox primera quincena de febrero", &options()).unwrap();
    assert!(result.is_approximate());
    assert!(!result.is_empty());
    assert_eq!(result.len(), 45);
    assert_eq!(result.years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
    assert_eq!(result.year(2025).map(<[_]>::len), Some(15));
    assert!(result.contains(date(2026, 2, 15)));
    assert!(!result.contains(date(2026, 2, 16)));
    assert_eq!(result.week_start(), Weekday::Monday);
    assert!(result.full_weeks());
    assert_eq!(result.iter().count(), result.into_iter().count());
}

#[test]
fn dateset_display() {
    let result = fechas::evaluate("jueves proximo al 14 de julio", &options()).unwrap();
    assert_eq!(result.to_string(), "2024-07-11, 2025-07-17, 2026-07-16");
}

#[test]
fn error_display_rich() {
    let err = fechas::evaluate("primer lunes de navidad", &options()).unwrap_err();
    assert!(err.is_parse_failure());
    assert_eq!(err.fragment(), Some("navidad"));
    let rich = err.display_rich();
    assert!(rich.contains("primer lunes de navidad"));
    assert!(rich.contains("^^^^^^^"));
}

#[test]
fn locale_week_start() {
    let locale: Locale = "es-ES".parse().unwrap();
    assert_eq!(locale.week_start(), Weekday::Monday);
    let locale: Locale = "en-US".parse().unwrap();
    assert_eq!(locale.week_start(), Weekday::Sunday);
}

#[test]
fn week_start_override() {
    let opts = options().years(1).week_start(Weekday::Sunday);
    let result = fechas::evaluate("ultima semana de febrero", &opts).unwrap();
    assert_eq!(result.dates()[0], date(2024, 2, 18));
}

#[test]
fn partial_weeks_count_when_not_full() {
    let opts = options().years(1).full_weeks(false);
    let result = fechas::evaluate("ultima semana de febrero", &opts).unwrap();
    assert_eq!(
        result.dates(),
        vec![date(2024, 2, 26), date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29)]
    );
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::*;

    #[test]
    fn options_from_json_fills_defaults() {
        let json = r#"{"locale": "en-GB", "first_year": 2030, "week_start": "domingo"}"#;
        let opts: Options = serde_json::from_str(json).unwrap();
        assert_eq!(opts.locale, "en-GB");
        assert_eq!(opts.first_year, Some(2030));
        assert_eq!(opts.week_start, Some(Weekday::Sunday));
        assert_eq!(opts.years, 1);
        assert!(opts.full_weeks);
    }

    #[test]
    fn options_reject_unknown_weekday() {
        let result: Result<Options, _> = serde_json::from_str(r#"{"week_start": "someday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn options_json_roundtrip() {
        let opts = options().week_start(Weekday::Saturday);
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains(r#""week_start":"saturday""#));
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn program_serializes_as_canonical_text() {
        let program = Program::parse("viernes después del corpus").unwrap();
        let json = serde_json::to_string(&program).unwrap();
        assert_eq!(json, r#""viernes despues de corpus christi""#);
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn program_rejects_invalid_text() {
        let result: Result<Program, _> = serde_json::from_str(r#""del 3 al 4 de julio""#);
        assert!(result.is_err());
    }

    #[test]
    fn dateset_serializes_dates_and_flag() {
        let result = fechas::evaluate("uno de enero", &options().years(1)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "dates": ["2024-01-01"], "approximate": false })
        );
    }
}
