//! Basic fechas API walkthrough: parse, evaluate, inspect, display.

use fechas::{Options, Program};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::new("es-ES", "Europe/Madrid")
        .first_year(2025)
        .years(3);

    // Parse an expression once, evaluate it against the options
    let program: Program = "viernes después del corpus".parse()?;
    println!("Parsed: {program}");
    let dates = program.evaluate(&options)?;
    println!("Dates: {dates}");

    // The one-shot facade
    let summer = fechas::evaluate("tercer fin de semana de agosto", &options)?;
    for year in summer.years() {
        println!("  {year}: {:?}", summer.year(year).unwrap_or_default());
    }

    // Definitions and per-year comparisons
    let text = "def carnaval_temprano: sabado de carnaval; \
                si carnaval_temprano es menor que primer sabado de marzo \
                entonces primer fin de semana de marzo \
                si no ultimo fin de semana de abril";
    let chosen = fechas::evaluate(text, &options)?;
    println!("\nConditional: {chosen}");

    // Errors point at the offending text
    if let Err(e) = fechas::evaluate("primer lunes de navidad", &options) {
        println!("\n{}", e.display_rich());
    }

    // Display roundtrips through parsing
    let roundtripped: Program = program.to_string().parse()?;
    assert_eq!(program.to_string(), roundtripped.to_string());
    println!("\nRoundtrip: {roundtripped}");

    Ok(())
}
