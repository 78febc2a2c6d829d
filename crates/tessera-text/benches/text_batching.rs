//! Benchmarks for decoding and batching, headless.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_core::math::vec2;
use tessera_render::{Color, Viewport};
use tessera_test_utils::MockRenderContext;
use tessera_text::{BlockFace, TextBatch, TextConfig, TextEngine, TextFrame, TextTarget, utf8};

/// Counts draws without touching a GPU.
#[derive(Default)]
struct NullTarget {
    quads: usize,
}

impl TextTarget for NullTarget {
    fn upload_atlas(&mut self, _pixels: &[u8], _width: u32, _height: u32) {}

    fn draw(&mut self, batch: &TextBatch) {
        self.quads += batch.glyph_count();
    }
}

fn engine() -> TextEngine {
    let mut engine = TextEngine::new(TextConfig::small(), Viewport::new(1920, 1080));
    engine
        .register_face(Box::new(BlockFace), 16.0, None)
        .expect("register block face");
    engine
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("utf8_decode");

    let ascii = "The quick brown fox jumps over the lazy dog. ".repeat(50);
    let mixed = "Grüße, 世界! 😀 ".repeat(100);
    for (name, text) in [("ascii", &ascii), ("mixed", &mixed)] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| black_box(utf8::char_count(text.as_bytes())));
        });
    }

    group.finish();
}

fn bench_add_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_string");

    for len in [16usize, 256, 4096] {
        let text: String = ('a'..='z').cycle().take(len).collect();
        let mut engine = engine();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            let mut target = NullTarget::default();
            b.iter(|| {
                engine.begin_frame(&mut target);
                engine.add_str(&mut target, text, vec2(0.0, 20.0), Color::WHITE, None);
                engine.end_frame(&mut target);
            });
            black_box(target.quads);
        });
    }

    group.finish();
}

fn bench_color_runs(c: &mut Criterion) {
    let mut engine = engine();
    let colors = [Color::WHITE, Color::RED, Color::BLACK];

    c.bench_function("color_runs_into_text_frame", |b| {
        let mock = Arc::new(MockRenderContext::new());
        let mut frame = TextFrame::new(mock.clone(), 1024, 2048);
        b.iter(|| {
            mock.clear_calls();
            engine.begin_frame(&mut frame);
            for (i, color) in colors.iter().cycle().take(64).enumerate() {
                let y = 20.0 + i as f32 * 18.0;
                engine.add_str(&mut frame, "status: ok", vec2(0.0, y), *color, None);
            }
            engine.end_frame(&mut frame);
            black_box(frame.draws().len());
        });
    });
}

criterion_group!(benches, bench_decode, bench_add_string, bench_color_runs);
criterion_main!(benches);
