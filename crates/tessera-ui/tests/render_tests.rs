//! Offscreen rendering against a real adapter.

use tessera_render::{Color, GraphicsContext, GraphicsError, wgpu};
use tessera_text::{BlockFace, TextConfig};
use tessera_ui::{BoundingBox, RenderCommand, UiRenderer, UiRendererConfig};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct Offscreen {
    context: std::sync::Arc<GraphicsContext>,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Offscreen {
    fn new() -> Option<Self> {
        let context = match GraphicsContext::new_sync() {
            Ok(context) => context,
            Err(e) => {
                eprintln!("GPU not available: {e}");
                return None;
            }
        };
        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Some(Self {
            context,
            texture,
            view,
        })
    }

    fn renderer(&self) -> UiRenderer {
        let config = UiRendererConfig {
            clear_color: Color::BLACK,
            text: TextConfig::small(),
        };
        let mut ui = UiRenderer::new(self.context.clone(), FORMAT, config, SIZE, SIZE).unwrap();
        ui.text_mut()
            .register_face(Box::new(BlockFace), 16.0, None)
            .unwrap();
        ui
    }

    /// RGBA bytes, tightly packed.
    fn read(&self) -> Vec<u8> {
        let device = self.context.device();
        let bytes_per_row = SIZE * 4;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size: (bytes_per_row * SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        self.context.queue().submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });
        rx.recv().unwrap().unwrap();

        let pixels = slice.get_mapped_range().to_vec();
        buffer.unmap();
        pixels
    }
}

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * SIZE + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

#[test]
#[ignore] // Requires GPU - run with: cargo test --test render_tests -- --ignored
fn test_rectangle_and_clear() {
    let Some(target) = Offscreen::new() else {
        return;
    };
    let mut ui = target.renderer();

    ui.render(
        &[RenderCommand::rectangle(
            BoundingBox::new(0.0, 0.0, 32.0, 64.0),
            Color::RED,
        )],
        &target.view,
    );

    let pixels = target.read();
    assert_eq!(pixel(&pixels, 10, 10), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 50, 10), [0, 0, 0, 255]);
}

#[test]
#[ignore] // Requires GPU
fn test_scissor_clips_and_resets() {
    let Some(target) = Offscreen::new() else {
        return;
    };
    let mut ui = target.renderer();
    let full = BoundingBox::new(0.0, 0.0, 64.0, 64.0);

    ui.render(
        &[
            RenderCommand::scissor_start(BoundingBox::new(0.0, 0.0, 64.0, 16.0)),
            RenderCommand::rectangle(full, Color::RED),
            RenderCommand::scissor_end(),
            RenderCommand::rectangle(BoundingBox::new(48.0, 48.0, 16.0, 16.0), Color::WHITE),
        ],
        &target.view,
    );

    let pixels = target.read();
    assert_eq!(pixel(&pixels, 5, 5), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 5, 30), [0, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 56, 56), [255, 255, 255, 255]);
}

#[test]
#[ignore] // Requires GPU
fn test_text_is_drawn_over_its_background() {
    let Some(target) = Offscreen::new() else {
        return;
    };
    let mut ui = target.renderer();
    let bounds = BoundingBox::new(0.0, 0.0, 64.0, 40.0);

    ui.render(
        &[
            RenderCommand::rectangle(bounds, Color::RED),
            RenderCommand::text(bounds, "A", 16.0, Color::WHITE, None),
        ],
        &target.view,
    );

    // baseline at 24.8, the block glyph spans x 1..7 and y 13.8..24.8
    let pixels = target.read();
    assert_eq!(pixel(&pixels, 4, 19), [255, 255, 255, 255]);
    assert_eq!(pixel(&pixels, 30, 19), [255, 0, 0, 255]);
    assert_eq!(ui.text_stats().frame_draw_calls, 1);
}

#[test]
#[ignore] // Requires GPU
fn test_oversized_atlas_is_rejected() {
    let Ok(context) = GraphicsContext::new_sync() else {
        return;
    };
    let limit = context.max_texture_dimension_2d();
    let config = UiRendererConfig {
        text: TextConfig::default().with_atlas_size(limit * 2),
        ..Default::default()
    };

    let result = UiRenderer::new(context, FORMAT, config, SIZE, SIZE);
    assert!(matches!(
        result,
        Err(GraphicsError::ResourceCreation { .. })
    ));
}
