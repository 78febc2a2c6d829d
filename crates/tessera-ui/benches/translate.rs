//! Command translation throughput on a mock context.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_render::{Color, Viewport};
use tessera_test_utils::MockRenderContext;
use tessera_text::{BlockFace, TextConfig};
use tessera_ui::{BorderWidths, BoundingBox, CommandTranslator, RenderCommand};

/// A list view: each row is a background, a border, a label and a clip.
fn rows(count: usize) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(count * 5);
    for i in 0..count {
        let bounds = BoundingBox::new(8.0, 8.0 + i as f32 * 24.0, 400.0, 22.0);
        let background = if i % 2 == 0 { Color::BLACK } else { Color::rgb(0.15, 0.15, 0.2) };
        commands.push(RenderCommand::scissor_start(bounds));
        commands.push(RenderCommand::rectangle(bounds, background));
        commands.push(RenderCommand::border(bounds, Color::WHITE, BorderWidths::uniform(1.0)));
        commands.push(RenderCommand::text(
            bounds,
            format!("Row {i}: all systems nominal"),
            16.0,
            Color::WHITE,
            None,
        ));
        commands.push(RenderCommand::scissor_end());
    }
    commands
}

fn bench_translate(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    for count in [10usize, 100, 1000] {
        let mock = Arc::new(MockRenderContext::new());
        let mut translator =
            CommandTranslator::new(mock.clone(), TextConfig::small(), Viewport::new(1920, 1080));
        translator
            .text_mut()
            .register_face(Box::new(BlockFace), 16.0, None)
            .expect("register block face");
        let commands = rows(count);

        group.throughput(Throughput::Elements(commands.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &commands, |b, commands| {
            b.iter(|| {
                mock.clear_calls();
                black_box(translator.translate(commands).len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_translate);
criterion_main!(benches);
