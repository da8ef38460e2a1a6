use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fechas::{Options, Program};

fn options() -> Options {
    Options::new("es-ES", "UTC").first_year(2024).years(10)
}

// ---------------------------------------------------------------------------
// Parse benchmarks
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("simple", |b| {
        b.iter(|| Program::parse(black_box("tercer fin de semana de agosto")).unwrap());
    });

    group.bench_function("complex", |b| {
        b.iter(|| {
            Program::parse(black_box(
                "def resurreccion: domingo antes del lunes de pascua; \
                 si resurreccion es igual a segundo domingo de semana santa \
                 entonces 25 de diciembre y 1 de enero si no de 24 de diciembre a 6 de enero",
            ))
            .unwrap()
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Eval benchmarks
// ---------------------------------------------------------------------------

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let options = options();

    let cases = [
        ("day_of_month", "uno de enero"),
        ("ordinal_weekday", "3 y cuarto domingo de junio"),
        ("last_week", "ultima semana de febrero"),
        ("movable_feast", "viernes despues del corpus"),
        ("near_weekend", "fin de semana proximo al 14 de julio"),
        (
            "comparison",
            "si sabado de carnaval es igual a segundo sabado de febrero \
             entonces primer fin de semana de marzo si no ultimo fin de semana de abril",
        ),
        ("period", "de 24 de diciembre a 6 de enero"),
    ];

    for (name, text) in cases {
        let program = Program::parse(text).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| program.evaluate(black_box(&options)).unwrap());
        });
    }

    group.bench_function("parse_and_evaluate", |b| {
        b.iter(|| fechas::evaluate(black_box("penultimo miercoles de marzo"), &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_eval);
criterion_main!(benches);
