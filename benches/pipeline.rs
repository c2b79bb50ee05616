//! Pipeline benchmarks: lex, parse and run

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use palmtree::{Config, Interpreter};

fn workload(lines: usize) -> String {
    let mut source = String::from("let scale = (v, k) => v * k + 1;\nlet acc mut = 0;\n");
    for i in 0..lines {
        source.push_str(&format!(
            "acc = acc + scale({}, 3) |> increment |> double;\n",
            i % 97
        ));
    }
    source.push_str("print(acc / 7, acc % 7);\n");
    source
}

fn bench_pipeline(c: &mut Criterion) {
    let source = workload(500);
    let tokens = palmtree::lexer::lex(&source).unwrap();
    let program = palmtree::parser::parse(&tokens).unwrap();

    c.bench_function("lex", |b| {
        b.iter(|| palmtree::lexer::lex(black_box(&source)).unwrap())
    });

    c.bench_function("parse", |b| {
        b.iter(|| palmtree::parser::parse(black_box(&tokens)).unwrap())
    });

    c.bench_function("run", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::with_config(&program, Config::default().quiet());
            interpreter.run().unwrap();
            interpreter.into_output()
        })
    });

    c.bench_function("end_to_end", |b| {
        b.iter(|| palmtree::run_with(black_box(&source), &Config::default().quiet()).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
