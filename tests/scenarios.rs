//! Scenario runner: every case in tests/scenarios.json becomes its own test
//! through the functions generated by build.rs.

use fechas::{ExprError, Options};
use jiff::civil::Date;
use serde_json::Value;

static SCENARIOS: &str = include_str!("scenarios.json");

fn scenarios() -> Value {
    serde_json::from_str(SCENARIOS).expect("tests/scenarios.json is invalid JSON")
}

fn case<'a>(section: &'a Value, index: usize) -> &'a Value {
    &section["tests"]
        .as_array()
        .expect("section missing 'tests' array")[index]
}

/// Defaults overlaid with the per-case settings.
fn options(root: &Value, case: &Value) -> Options {
    let defaults = &root["defaults"];
    let field = |key: &str| -> &Value {
        match case.get(key) {
            Some(v) => v,
            None => &defaults[key],
        }
    };
    Options {
        locale: field("locale").as_str().unwrap().to_string(),
        zone: field("zone").as_str().unwrap().to_string(),
        full_weeks: field("full_weeks").as_bool().unwrap(),
        first_year: field("first_year").as_i64().map(|y| y as i16),
        years: field("years").as_u64().unwrap() as u16,
        week_start: None,
    }
}

fn parse_date(s: &str) -> Date {
    s.parse()
        .unwrap_or_else(|e| panic!("bad date '{s}' in scenarios: {e}"))
}

fn run_eval(section: &str, index: usize) {
    let root = scenarios();
    let case = case(&root["eval"][section], index);
    let input = case["input"].as_str().unwrap();
    let options = options(&root, case);

    let result = fechas::evaluate(input, &options)
        .unwrap_or_else(|e| panic!("'{input}' failed:\n{}", e.display_rich()));
    let dates = result.dates();

    if let Some(expected) = case["dates"].as_array() {
        let expected: Vec<Date> = expected
            .iter()
            .map(|d| parse_date(d.as_str().unwrap()))
            .collect();
        assert_eq!(dates, expected, "dates for '{input}'");
    }
    if let Some(count) = case["count"].as_u64() {
        assert_eq!(dates.len() as u64, count, "count for '{input}'");
    }
    if let Some(first) = case["first"].as_str() {
        assert_eq!(dates.first(), Some(&parse_date(first)), "first date for '{input}'");
    }
    if let Some(last) = case["last"].as_str() {
        assert_eq!(dates.last(), Some(&parse_date(last)), "last date for '{input}'");
    }
    if let Some(approximate) = case["approximate"].as_bool() {
        assert_eq!(result.is_approximate(), approximate, "approximate for '{input}'");
    }

    // The canonical form must evaluate to the same dates.
    let canonical = fechas::Program::parse(input).unwrap().to_string();
    let again = fechas::evaluate(&canonical, &options)
        .unwrap_or_else(|e| panic!("canonical '{canonical}' failed: {e}"));
    assert_eq!(again.dates(), dates, "canonical '{canonical}' of '{input}'");
}

fn run_error(index: usize) {
    let root = scenarios();
    let case = case(&root["errors"], index);
    let input = case["input"].as_str().unwrap();
    let options = options(&root, case);

    let err = match fechas::evaluate(input, &options) {
        Ok(dates) => panic!("'{input}' should fail, got [{dates}]"),
        Err(e) => e,
    };
    let kind = case["kind"].as_str().unwrap();
    let matched = match kind {
        "lex" => matches!(err, ExprError::Lex { .. }),
        "parse" => matches!(err, ExprError::Parse { .. }),
        "unbound" => matches!(err, ExprError::UnboundIdentifier { .. }),
        "locale" => matches!(err, ExprError::InvalidLocale { .. }),
        "zone" => matches!(err, ExprError::InvalidTimeZone { .. }),
        other => panic!("unknown error kind '{other}'"),
    };
    assert!(matched, "'{input}': expected {kind} error, got {err:?}");
    assert_eq!(
        err.is_parse_failure(),
        matches!(kind, "lex" | "parse" | "unbound"),
        "'{input}': {err}"
    );
    if matches!(kind, "lex" | "parse") {
        assert!(!fechas::validate(input), "'{input}' should not validate");
    }
}

include!(concat!(env!("OUT_DIR"), "/scenario_tests.rs"));
