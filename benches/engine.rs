use criterion::{black_box, criterion_group, criterion_main, Criterion};
use redraft::diff::{compute_word_diff, group_into_phrase_chunks};
use redraft::SpellChecker;

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "document", "editor",
    "review", "suggestion", "spelling", "change", "accept", "reject", "phrase", "sentence",
    "paragraph", "writing", "assistant", "draft", "version", "text",
];

fn checker() -> SpellChecker {
    let mut checker = SpellChecker::new();
    checker.load_dictionary(WORDS).unwrap();
    checker
}

fn bench_suggestions(c: &mut Criterion) {
    let checker = checker();
    c.bench_function("suggestions short word", |b| {
        b.iter(|| checker.get_suggestions(black_box("qick"), 3))
    });
    c.bench_function("suggestions long word", |b| {
        b.iter(|| checker.get_suggestions(black_box("sugestoin"), 3))
    });

    let text = "The qick brwn fox jumps ovr the lazy dgo. ".repeat(20);
    c.bench_function("check text", |b| b.iter(|| checker.check_text(black_box(&text))));
}

fn bench_diff(c: &mut Criterion) {
    let original = "The editor shows each suggestion as a phrase the writer can accept or reject. "
        .repeat(6);
    let revised = "The editor presents every suggestion as a phrase the author may accept or reject. "
        .repeat(6);

    c.bench_function("word diff", |b| {
        b.iter(|| compute_word_diff(black_box(&original), black_box(&revised)))
    });
    c.bench_function("word diff + phrase chunks", |b| {
        b.iter(|| group_into_phrase_chunks(&compute_word_diff(&original, &revised)))
    });
}

criterion_group!(benches, bench_suggestions, bench_diff);
criterion_main!(benches);
