use criterion::{criterion_group, criterion_main, Criterion};
use parseworks::error::TracedError;
use parseworks::prelude::*;

struct NullHandler;

impl Handler for NullHandler {
    fn error(&mut self, _: TracedError) {}
}

fn build_input(escapes: bool) -> String {
    let mut input = String::from("\"");
    for i in 0..64 {
        input.push_str("abcdefgh12345678");
        if escapes && i % 4 == 0 {
            input.push_str("\\n");
        }
    }
    input.push('"');
    input
}

pub fn quoted_bench(c: &mut Criterion) {
    let plain = quoted().of(any_char());
    let escaped = quoted().of_escaped(
        any_char(),
        backslash_escape().lit_c('n', '\n').lit_c_self('\\'),
    );

    let plain_input = build_input(false);
    let escaped_input = build_input(true);

    let mut group = c.benchmark_group("quoted");
    group.bench_function("plain", |b| {
        b.iter(|| {
            let mut handler = NullHandler;
            parse_rule(&plain, &plain_input, &mut handler).unwrap();
        })
    });
    group.bench_function("escaped", |b| {
        b.iter(|| {
            let mut handler = NullHandler;
            parse_rule(&escaped, &escaped_input, &mut handler).unwrap();
        })
    });
}

criterion_group!(benches, quoted_bench);
criterion_main!(benches);
