#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(program) = fechas::Program::parse(s) {
            let displayed = program.to_string();
            let reparsed = fechas::Program::parse(&displayed)
                .expect("display output must be parseable");
            let redisplayed = reparsed.to_string();
            assert_eq!(displayed, redisplayed, "roundtrip idempotency failed");
        }
    }
});
