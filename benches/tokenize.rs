//! Benchmarks for tokenizing and rendering math-annotated text.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mathtext::document::{Document, TokenizerOptions, tokenize};
use mathtext::editor::apply_edit;

fn statement(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("- Paso {i}: calcula $x_{i}^2 + \\frac{{1}}{{{i}}}$ y $y$"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_tokenize_short(c: &mut Criterion) {
    let text = "Calcula $x^2$ y $y^2$";
    let options = TokenizerOptions::default();
    c.bench_function("tokenize_short", |b| {
        b.iter(|| tokenize(black_box(text), &options))
    });
}

fn bench_parse_long(c: &mut Criterion) {
    let text = statement(500);
    c.bench_function("parse_500_lines", |b| {
        b.iter(|| Document::parse(black_box(&text)))
    });
}

fn bench_apply_edit_drifted(c: &mut Criterion) {
    let text = statement(500);
    let req = Document::parse(&text)
        .math_requests()
        .last()
        .expect("statement has math");
    let drifted = format!("Ejercicio:\n{text}");
    c.bench_function("apply_edit_search", |b| {
        b.iter(|| apply_edit(black_box(&drifted), &req, "$z$"))
    });
}

criterion_group!(
    benches,
    bench_tokenize_short,
    bench_parse_long,
    bench_apply_edit_drifted
);
criterion_main!(benches);
