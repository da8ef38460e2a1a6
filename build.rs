//! Turns every case in tests/scenarios.json into its own `#[test]`, written
//! to `$OUT_DIR/scenario_tests.rs` and included by tests/scenarios.rs.
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;

fn main() {
    let path = Path::new("tests/scenarios.json");
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(path).expect("failed to read tests/scenarios.json");
    let scenarios: Value =
        serde_json::from_str(&text).expect("invalid JSON in tests/scenarios.json");

    let mut out = String::new();
    let sections = scenarios["eval"]
        .as_object()
        .expect("'eval' must be an object of sections");
    for (section, body) in sections {
        for (i, case) in cases(body).enumerate() {
            let name = format!("eval_{}_{}", ident(section), case_ident(case, i));
            test_fn(&mut out, &name, &format!("run_eval({section:?}, {i})"));
        }
    }
    for (i, case) in cases(&scenarios["errors"]).enumerate() {
        let name = format!("error_{}", case_ident(case, i));
        test_fn(&mut out, &name, &format!("run_error({i})"));
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest = Path::new(&out_dir).join("scenario_tests.rs");
    fs::write(&dest, out).expect("failed to write scenario tests");
}

fn cases(section: &Value) -> impl Iterator<Item = &Value> {
    section["tests"]
        .as_array()
        .expect("section missing 'tests' array")
        .iter()
}

fn case_ident(case: &Value, index: usize) -> String {
    match case["name"].as_str() {
        Some(name) => ident(name),
        None => format!("case_{index}"),
    }
}

/// Lowercase ASCII words joined by single underscores.
fn ident(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

fn test_fn(out: &mut String, name: &str, call: &str) {
    // writing to a String cannot fail
    let _ = writeln!(out, "#[test]\nfn {name}() {{ {call}; }}");
}
