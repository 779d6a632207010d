use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parsimony::prelude::*;

fn operator(x: f64, op: String, y: f64) -> f64 {
    match op.as_str() {
        "+" => x + y,
        "-" => x - y,
        "*" => x * y,
        _ => x / y,
    }
}

fn calculator() -> Parser<f64> {
    letrec2(
        |_, element: &Parser<f64>| {
            element
                .delimit(&regex(r"[\*/]"), operator)
                .delimit(&regex(r"[\+\-]"), operator)
        },
        |expr: &Parser<f64>, _| real().or(&string("(").concat(expr).concat_left(&string(")"))),
    )
    .concat_left(&end())
}

fn bench_calculator(c: &mut Criterion) {
    let parser = calculator();
    let input = (0..200)
        .map(|i| format!("({} * 2 - 1.5e0) / 3", i))
        .collect::<Vec<_>>()
        .join(" + ");
    c.bench_function("calculator 200 terms", |b| {
        b.iter(|| parser.run_skipping(black_box(&input), " +"))
    });
}

fn bench_literals(c: &mut Criterion) {
    let numbers = number_literal()
        .delimit(&string(","), |a, _, b| a.wrapping_add(b))
        .concat_left(&end());
    let input = (0..500)
        .map(|i| match i % 4 {
            0 => format!("{}", i),
            1 => format!("0x{:X}", i),
            2 => format!("0{:o}", i),
            _ => format!("-0b{:b}", i),
        })
        .collect::<Vec<_>>()
        .join(",");
    c.bench_function("number literals 500", |b| {
        b.iter(|| numbers.run(black_box(&input)))
    });

    let strings = c_string_literal()
        .delimit(&string(","), |a, _, b| a + &b)
        .concat_left(&end());
    let input = vec![r#""a\tb\x41あ\101 plain text""#; 200].join(",");
    c.bench_function("c string literals 200", |b| {
        b.iter(|| strings.run(black_box(&input)))
    });
}

// ベンチマークグループの定義
criterion_group!(benches, bench_calculator, bench_literals);
criterion_main!(benches);
