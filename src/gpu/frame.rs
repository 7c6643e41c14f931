// gpu/frame.rs — GPU frame textures and CPU↔GPU transfer.
//
// A `GpuFrame` is one video-resolution Rgba8Unorm texture. The host
// creates a source/destination pair once per negotiated resolution and
// reuses them frame after frame; only the pixel bytes move per frame.
//
// ROW ALIGNMENT
// wgpu requires `bytes_per_row` in buffer↔texture copies to be a
// multiple of 256. Frame planes are packed at width*4 bytes, which is
// rarely 256-aligned, so uploads stage through a row-padded buffer and
// readbacks strip the padding again. One CPU-side memcpy per direction
// per frame — bandwidth-bound, acceptable at streaming rates.

use wgpu::util::DeviceExt;

use crate::gpu::device::GpuDevice;

/// wgpu's required alignment for `bytes_per_row` in copy operations.
const COPY_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Bytes per pixel of the Rgba8Unorm frame format.
const BYTES_PER_PIXEL: u32 = 4;

/// One RGBA frame resident on the GPU as a 2D texture.
///
/// The texture carries every usage the filter needs — sampled input,
/// storage-written output, upload and readback — so the same type serves
/// both sides of the kernel. Shaders read it as normalized floats in
/// [0, 1]; stores are quantized to 8 bits per channel.
///
/// Freshly created textures are zero-initialized by wgpu, so an output
/// frame's never-written first row and column read back as transparent
/// black unless the host uploads its own contents first.
pub struct GpuFrame {
    pub texture: wgpu::Texture,
    /// Default full-texture view, bound to compute pipelines.
    pub view: wgpu::TextureView,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl GpuFrame {
    /// Allocate a zeroed frame texture of the given dimensions.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    pub fn new(gpu: &GpuDevice, width: u32, height: u32) -> Self {
        assert!(width >= 1 && height >= 1, "frame must be at least 1×1");
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("GpuFrame"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GpuFrame {
            texture,
            view,
            width,
            height,
        }
    }

    /// Upload an interleaved RGBA8 frame plane (packed rows, 4 bytes per
    /// pixel) into the texture.
    ///
    /// # Panics
    /// Panics if `frame.len() != width * height * 4`.
    pub fn upload_rgba8(&self, gpu: &GpuDevice, frame: &[u8]) {
        let packed_bytes_per_row = self.width * BYTES_PER_PIXEL;
        assert_eq!(
            frame.len(),
            (packed_bytes_per_row * self.height) as usize,
            "frame length ({}) must equal width * height * 4 ({})",
            frame.len(),
            packed_bytes_per_row * self.height,
        );

        // Stage rows at the 256-byte alignment wgpu demands.
        let aligned_bytes_per_row = align_to(packed_bytes_per_row, COPY_ALIGNMENT);
        let mut staging = vec![0u8; (aligned_bytes_per_row * self.height) as usize];
        for y in 0..self.height as usize {
            let src_start = y * packed_bytes_per_row as usize;
            let dst_start = y * aligned_bytes_per_row as usize;
            staging[dst_start..dst_start + packed_bytes_per_row as usize]
                .copy_from_slice(&frame[src_start..src_start + packed_bytes_per_row as usize]);
        }

        let staging_buf = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("GpuFrame::upload staging"),
                contents: &staging,
                usage: wgpu::BufferUsages::COPY_SRC,
            });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuFrame::upload"),
            });
        encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &staging_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(aligned_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Read the frame back to CPU memory as packed interleaved RGBA8.
    ///
    /// Synchronous: stalls until the GPU timeline has drained, so every
    /// previously submitted write to this frame is visible. Fine for
    /// per-frame streaming readback and tests; don't call it mid-encoder.
    pub fn readback_rgba8(&self, gpu: &GpuDevice) -> Vec<u8> {
        let packed_bytes_per_row = self.width * BYTES_PER_PIXEL;
        let aligned_bytes_per_row = align_to(packed_bytes_per_row, COPY_ALIGNMENT);
        let readback_size = (aligned_bytes_per_row * self.height) as u64;

        let readback_buf = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("GpuFrame::readback"),
            size: readback_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("GpuFrame::readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(aligned_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        gpu.queue.submit(std::iter::once(encoder.finish()));

        let buf_slice = readback_buf.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buf_slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).expect("readback channel closed");
        });
        gpu.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .expect("readback map callback never fired")
            .expect("readback map failed");

        // Strip the row alignment padding.
        let mapped = buf_slice.get_mapped_range();
        let mut out = vec![0u8; (packed_bytes_per_row * self.height) as usize];
        for y in 0..self.height as usize {
            let src_start = y * aligned_bytes_per_row as usize;
            let dst_start = y * packed_bytes_per_row as usize;
            out[dst_start..dst_start + packed_bytes_per_row as usize].copy_from_slice(
                &mapped[src_start..src_start + packed_bytes_per_row as usize],
            );
        }
        drop(mapped);
        readback_buf.unmap();

        out
    }
}

/// Round `value` up to the next multiple of `alignment`.
#[inline]
pub(crate) fn align_to(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) / alignment * alignment
}
