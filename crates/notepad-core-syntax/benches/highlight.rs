use criterion::{Criterion, black_box, criterion_group, criterion_main};
use notepad_core::{Position, TagTable, TextBuffer};
use notepad_core_lang::LanguageId;
use notepad_core_syntax::{LexerRegistry, SyntaxHighlighter, map_spans};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate plausible Python-shaped source so the lexer exercises every scan path.
fn source_text(line_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut out = String::with_capacity(line_count * 48);
    for i in 0..line_count {
        match rng.gen_range(0..5) {
            0 => out.push_str(&format!("def handler_{i}(request, timeout=30):\n")),
            1 => out.push_str(&format!("    # dispatch branch {i}\n")),
            2 => out.push_str(&format!("    value_{i} = compute(base={i}, scale=0.5)\n")),
            3 => out.push_str(&format!("    return 'result {i}' if value_{i} else None\n")),
            _ => out.push_str(&format!("    items.append(\"entry-{i}\")\n")),
        }
    }
    out
}

fn bench_tokenize_and_map(c: &mut Criterion) {
    let registry = LexerRegistry::with_defaults();
    let language = LanguageId::new("python");
    let text = source_text(2_000);

    c.bench_function("tokenize_and_map/2k_lines", |b| {
        b.iter(|| {
            let tokens = registry.tokenize(black_box(&text), &language);
            black_box(map_spans(&tokens, Position::origin()));
        })
    });
}

fn bench_viewport_region_pass(c: &mut Criterion) {
    let text = source_text(50_000);
    let buffer = TextBuffer::new(&text);
    let mut tags = TagTable::new();
    let mut highlighter = SyntaxHighlighter::new(LexerRegistry::with_defaults());
    highlighter.set_language(LanguageId::new("python"));

    // A 40-line window well into the file, the shape of a real keystroke-driven pass.
    let start = buffer.line_range(25_000).map_or(0, |r| r.start);
    let end = buffer.line_range(25_040).map_or(start, |r| r.end);

    c.bench_function("region_pass/40_lines", |b| {
        b.iter(|| {
            black_box(highlighter.highlight(&buffer, &mut tags, black_box(start..end)));
        })
    });
}

fn bench_full_document_pass(c: &mut Criterion) {
    let text = source_text(2_000);
    let buffer = TextBuffer::new(&text);
    let mut tags = TagTable::new();
    let mut highlighter = SyntaxHighlighter::new(LexerRegistry::with_defaults())
        .with_region_ceiling(usize::MAX);
    highlighter.set_language(LanguageId::new("python"));

    c.bench_function("full_pass/2k_lines", |b| {
        b.iter(|| {
            black_box(highlighter.highlight_all(&buffer, &mut tags));
        })
    });
}

criterion_group!(
    benches,
    bench_tokenize_and_map,
    bench_viewport_region_pass,
    bench_full_document_pass
);
criterion_main!(benches);
