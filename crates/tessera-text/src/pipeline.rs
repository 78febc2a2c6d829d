//! wgpu pipeline that replays a [`TextFrame`].

use std::ops::Range;

use tessera_render::{Color, GpuSampler, GraphicsContext, RenderContext, wgpu};

use crate::batch::TextVertex;
use crate::frame::TextFrame;

/// Samples single-channel coverage from the atlas and tints it with the
/// draw's colour uniform.
pub const TEXT_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

struct TextUniform {
    color: vec4<f32>,
}

@group(0) @binding(0) var atlas_texture: texture_2d<f32>;
@group(0) @binding(1) var atlas_sampler: sampler;
@group(0) @binding(2) var<uniform> text: TextUniform;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = textureSample(atlas_texture, atlas_sampler, in.uv).r;
    return vec4<f32>(text.color.rgb, text.color.a * coverage);
}
"#;

const COLOR_UNIFORM_SIZE: u64 = std::mem::size_of::<Color>() as u64;

struct FrameBinding {
    bind_group: wgpu::BindGroup,
    #[allow(dead_code)]
    atlas_view: wgpu::TextureView,
    generation: u64,
}

/// Fields are dropped top to bottom: bind group and atlas view, sampler,
/// layout, pipeline.
pub struct TextPipeline {
    binding: Option<FrameBinding>,
    sampler: GpuSampler,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl TextPipeline {
    pub fn new(context: &GraphicsContext, target_format: wgpu::TextureFormat) -> Self {
        let device = context.device();

        let shader = context.create_shader_module(&wgpu::ShaderModuleDescriptor {
            label: Some("Text Shader"),
            source: wgpu::ShaderSource::Wgsl(TEXT_SHADER.into()),
        });

        let sampler = context.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Text Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Text Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(COLOR_UNIFORM_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Text Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader.as_wgpu(),
                entry_point: Some("vs_main"),
                buffers: &[TextVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader.as_wgpu(),
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            binding: None,
            sampler,
            bind_group_layout,
            pipeline,
        }
    }

    /// (Re)build the bind group if `frame` replaced its colour buffer since
    /// the last call. Call before beginning the render pass.
    pub fn prepare(&mut self, context: &GraphicsContext, frame: &TextFrame) {
        if self
            .binding
            .as_ref()
            .is_some_and(|b| b.generation == frame.generation())
        {
            return;
        }

        tracing::trace!("Rebuilding text bind group (generation {})", frame.generation());
        let atlas_view = frame
            .atlas()
            .as_wgpu()
            .create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = context
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Text Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&atlas_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(self.sampler.as_wgpu()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: frame.uniform_buffer().as_wgpu(),
                            offset: 0,
                            size: wgpu::BufferSize::new(COLOR_UNIFORM_SIZE),
                        }),
                    },
                ],
            });

        self.binding = Some(FrameBinding {
            bind_group,
            atlas_view,
            generation: frame.generation(),
        });
    }

    /// Replay `frame.draws()[draws]`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass, frame: &TextFrame, draws: Range<usize>) {
        let Some(binding) = &self.binding else {
            tracing::error!("TextPipeline::draw called before prepare");
            return;
        };
        let Some(draws) = frame.draws().get(draws) else {
            return;
        };
        if draws.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, frame.vertex_buffer().as_wgpu().slice(..));
        pass.set_index_buffer(
            frame.index_buffer().as_wgpu().slice(..),
            wgpu::IndexFormat::Uint16,
        );
        for draw in draws {
            pass.set_bind_group(0, &binding.bind_group, &[draw.uniform_offset]);
            pass.draw_indexed(draw.indices.clone(), draw.base_vertex, 0..1);
        }
    }
}
