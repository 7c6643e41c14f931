// gpu/sobel.rs — GPU edge-magnitude filter.
//
// Mirrors the CPU reference in `crate::sobel`: same weight matrix, same
// boundary skip, same clamp semantics. The only permitted divergence is
// Rgba8Unorm quantization on store (≤ 1/255 per channel vs. the f32
// reference).
//
// Bindings: sampled input texture + write-only rgba8unorm storage
// texture. No uniforms — the shader takes its dimensions from
// `textureDimensions`, so one pipeline serves every frame size.

use crate::convert;
use crate::gpu::device::GpuDevice;
use crate::gpu::frame::GpuFrame;
use crate::image::{Image, Rgb, Rgba};
use crate::sobel::FilterError;

/// GPU edge-magnitude filter.
///
/// Create once per device; call [`run`](Self::run) each frame with a
/// host-owned source/destination frame pair, or use
/// [`process_frame`](Self::process_frame) for a one-call
/// upload→dispatch→readback of an interleaved RGBA8 plane.
pub struct GpuSobelFilter {
    pipeline: wgpu::ComputePipeline,
    bgl: wgpu::BindGroupLayout,
}

impl GpuSobelFilter {
    pub fn new(gpu: &GpuDevice) -> Self {
        let shader_template = include_str!("../shaders/sobel.wgsl");
        let shader_src = shader_template
            .replace("{{WG_X}}", &gpu.workgroup_size.x.to_string())
            .replace("{{WG_Y}}", &gpu.workgroup_size.y.to_string());

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("sobel.wgsl"),
                source: wgpu::ShaderSource::Wgsl(shader_src.into()),
            });

        let bgl = gpu
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("GpuSobel BGL"),
                entries: &[
                    // 0 — source frame (sampled)
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        },
                        count: None,
                    },
                    // 1 — destination frame (write-only storage)
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::StorageTexture {
                            access: wgpu::StorageTextureAccess::WriteOnly,
                            format: wgpu::TextureFormat::Rgba8Unorm,
                            view_dimension: wgpu::TextureViewDimension::D2,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("GpuSobel pipeline layout"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            });

        let pipeline = gpu
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("edge_magnitude"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: "edge_magnitude",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        GpuSobelFilter { pipeline, bgl }
    }

    /// Dispatch the kernel over a source/destination frame pair.
    ///
    /// One compute pass, ⌈W/wg_x⌉ × ⌈H/wg_y⌉ workgroups. Returns once the
    /// work is submitted; use [`GpuFrame::readback_rgba8`] (which drains
    /// the queue) to observe the result. The destination's first row and
    /// column are never written — they keep whatever the frame held.
    ///
    /// # Errors
    /// Returns [`FilterError::DimensionMismatch`] if the frames differ in
    /// size.
    pub fn run(
        &self,
        gpu: &GpuDevice,
        input: &GpuFrame,
        output: &GpuFrame,
    ) -> Result<(), FilterError> {
        if input.width != output.width || input.height != output.height {
            return Err(FilterError::DimensionMismatch {
                src: (input.width as usize, input.height as usize),
                dst: (output.width as usize, output.height as usize),
            });
        }

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("GpuSobel BG"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&output.view),
                },
            ],
        });

        let (wg_x, wg_y) = gpu.dispatch_size(input.width, input.height);
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuSobel dispatch"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("edge_magnitude"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(wg_x, wg_y, 1);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Filter one interleaved RGBA8 frame plane: upload, dispatch, read
    /// back. Allocates a fresh (zeroed) destination, so the returned
    /// plane's first row and column are transparent black.
    ///
    /// Streaming hosts that care about per-frame allocations should hold
    /// a [`GpuFrame`] pair and call [`run`](Self::run) directly.
    ///
    /// # Panics
    /// Panics if `frame.len() != width * height * 4`.
    pub fn process_frame(
        &self,
        gpu: &GpuDevice,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Vec<u8> {
        let input = GpuFrame::new(gpu, width, height);
        let output = GpuFrame::new(gpu, width, height);
        input.upload_rgba8(gpu, frame);
        self.run(gpu, &input, &output)
            .expect("frames allocated with identical dimensions");
        output.readback_rgba8(gpu)
    }

    /// Filter a float image through the GPU path. Quantizes to RGBA8 on
    /// the way in (as the host's video frames are) and back out; used by
    /// the CPU-parity tests.
    pub fn filter_image(&self, gpu: &GpuDevice, src: &Image<Rgb>) -> Image<Rgba> {
        let frame = convert::rgb_to_rgba8(src);
        let out = self.process_frame(gpu, &frame, src.width() as u32, src.height() as u32);
        convert::rgba8_to_rgba(&out, src.width(), src.height())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
