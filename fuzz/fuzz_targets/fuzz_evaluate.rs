#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let options = fechas::Options::default().first_year(2024).years(2);
        if let Ok(dates) = fechas::evaluate(s, &options) {
            let dates = dates.dates();
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "unsorted result");
        }
    }
});
