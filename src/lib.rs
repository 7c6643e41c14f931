// edgeline — streaming edge-magnitude filter.
//
// Computes a per-pixel directional edge-magnitude image (a Sobel-style
// vertical-gradient operator) over normalized float color frames. The CPU
// implementation in `sobel` is the authoritative reference; the wgpu
// compute kernel in `gpu` is validated against it pixel-for-pixel.
//
// The host pipeline owns the frames: it supplies a readable source image
// and a writable destination image of matching dimensions and gets the
// destination back once the kernel pass completes. Format negotiation,
// buffer allocation and frame scheduling stay on the host side.

pub mod convert;
pub mod gpu;
pub mod image;
pub mod sobel;
