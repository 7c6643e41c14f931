// gpu/mod.rs — wgpu compute implementation of the edge-magnitude kernel.
//
// The CPU implementation in `crate::sobel` is the authoritative
// reference; the compute kernel here is validated against it
// pixel-for-pixel (within Rgba8Unorm quantization). The host owns the
// frames and the per-frame cadence; this layer owns the device, the
// frame textures and the dispatch.

pub mod device;
pub mod frame;
pub mod sobel;
