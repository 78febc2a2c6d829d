//! Render a small panel offscreen and report what was drawn.
//!
//! Run with: cargo run -p tessera-ui --example offscreen

use tessera_render::{Color, GraphicsContext, wgpu};
use tessera_text::{BlockFace, TextError};
use tessera_ui::{BorderWidths, BoundingBox, RenderCommand, UiRenderer, UiRendererConfig};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn panel() -> Vec<RenderCommand> {
    let panel = BoundingBox::new(20.0, 20.0, 280.0, 200.0);
    let title = BoundingBox::new(20.0, 20.0, 280.0, 32.0);
    let body = BoundingBox::new(28.0, 60.0, 264.0, 150.0);

    let mut commands = vec![
        RenderCommand::rectangle(panel, Color::from_hex(0x2b2d31)),
        RenderCommand::border(panel, Color::from_hex(0x5865f2), BorderWidths::uniform(2.0)),
        RenderCommand::rectangle(title, Color::from_hex(0x1e1f22)),
        RenderCommand::text(title, "  Tessera", 16.0, Color::WHITE, None),
        RenderCommand::scissor_start(body),
    ];
    for (i, line) in ["Glyphs are cached", "Batches follow colour", "Grüße, Ωμέγα"]
        .iter()
        .enumerate()
    {
        let row = BoundingBox::new(body.x, body.y + i as f32 * 24.0, body.width, 24.0);
        let color = if i % 2 == 0 { Color::WHITE } else { Color::from_hex(0xb5bac1) };
        commands.push(RenderCommand::text(row, *line, 16.0, color, None));
    }
    commands.push(RenderCommand::image(
        BoundingBox::new(body.x, body.y + 90.0, 48.0, 48.0),
        Color::from_hex(0x404249),
    ));
    commands.push(RenderCommand::scissor_end());
    commands
}

fn main() {
    tessera_core::logging::init();

    let context = match GraphicsContext::new_sync() {
        Ok(context) => context,
        Err(e) => {
            tracing::error!("No GPU available: {}", e);
            return;
        }
    };

    let mut ui = match UiRenderer::new(
        context.clone(),
        FORMAT,
        UiRendererConfig::default(),
        WIDTH,
        HEIGHT,
    ) {
        Ok(ui) => ui,
        Err(e) => {
            tracing::error!("Failed to create UI renderer: {}", e);
            return;
        }
    };

    match ui.text_mut().load_first(FONT_PATHS, 16.0) {
        Ok(font) => tracing::info!("Loaded {:?}", ui.text().get_font(font)),
        Err(TextError::NoFontFound { .. }) => {
            tracing::warn!("No system font found, using block glyphs");
            if let Err(e) = ui.text_mut().register_face(Box::new(BlockFace), 16.0, None) {
                tracing::error!("{}", e);
                return;
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    }

    let target = context.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let commands = panel();
    for frame in 0..3 {
        tessera_core::profiling::new_frame();
        ui.render(&commands, &view);
        tracing::info!("Frame {}: {} ops", frame, ui.last_frame().len());
    }

    let size = ui.measure_text("Glyphs are cached".as_bytes(), None);
    tracing::info!("\"Glyphs are cached\" measures {:.1}x{:.1}", size.x, size.y);
    ui.text().log_stats();
}
