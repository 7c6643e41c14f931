// convert.rs — Interleaved 8-bit frame bytes ↔ normalized float images.
//
// The streaming host hands the filter video frames as interleaved RGBA
// (or RGBx) bytes, one plane, 4 bytes per pixel, row-major. These
// conversions are the crate-side frame interface:
//   rgba8 bytes → Image<Rgb>    (alpha byte ignored; kernel input)
//   rgba8 bytes → Image<Rgba>   (alpha preserved; sentinel pre-fills)
//   Image<Rgba> → rgba8 bytes   (clamped + rounded; kernel output)
//
// u8 255 maps to 1.0 and back; values outside [0, 1] are clamped before
// quantization, matching the GPU path's Rgba8Unorm stores.

use crate::image::{Image, Rgb, Rgba};

/// Bytes per pixel in an interleaved RGBA frame plane.
pub const RGBA_BPP: usize = 4;

#[inline]
fn to_unit(b: u8) -> f32 {
    b as f32 / 255.0
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Interpret an interleaved RGBA8 frame plane as a normalized RGB image.
/// The alpha byte of each pixel is ignored.
///
/// # Panics
/// Panics if `frame.len() != width * height * 4` or the frame is empty.
pub fn rgba8_to_rgb(frame: &[u8], width: usize, height: usize) -> Image<Rgb> {
    assert_eq!(
        frame.len(),
        width * height * RGBA_BPP,
        "frame length ({}) must equal width * height * 4 ({})",
        frame.len(),
        width * height * RGBA_BPP,
    );
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) * RGBA_BPP;
            img.set(
                x,
                y,
                Rgb::new(to_unit(frame[i]), to_unit(frame[i + 1]), to_unit(frame[i + 2])),
            );
        }
    }
    img
}

/// Interpret an interleaved RGBA8 frame plane as a normalized RGBA image.
///
/// # Panics
/// Panics if `frame.len() != width * height * 4` or the frame is empty.
pub fn rgba8_to_rgba(frame: &[u8], width: usize, height: usize) -> Image<Rgba> {
    assert_eq!(
        frame.len(),
        width * height * RGBA_BPP,
        "frame length ({}) must equal width * height * 4 ({})",
        frame.len(),
        width * height * RGBA_BPP,
    );
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = (y * width + x) * RGBA_BPP;
            img.set(
                x,
                y,
                Rgba::new(
                    to_unit(frame[i]),
                    to_unit(frame[i + 1]),
                    to_unit(frame[i + 2]),
                    to_unit(frame[i + 3]),
                ),
            );
        }
    }
    img
}

/// Quantize a normalized RGB image to an interleaved RGBA8 frame plane
/// with every alpha byte set to 255. This is the upload format of the
/// GPU path's source frames.
pub fn rgb_to_rgba8(img: &Image<Rgb>) -> Vec<u8> {
    let mut frame = vec![0u8; img.width() * img.height() * RGBA_BPP];
    for (x, y, p) in img.pixels() {
        let i = (y * img.width() + x) * RGBA_BPP;
        frame[i] = to_byte(p.r());
        frame[i + 1] = to_byte(p.g());
        frame[i + 2] = to_byte(p.b());
        frame[i + 3] = 255;
    }
    frame
}

/// Quantize a normalized RGBA image to an interleaved RGBA8 frame plane.
/// Each channel is clamped to [0, 1], scaled to [0, 255] and rounded.
/// The output is compact: 4 bytes per pixel, no row padding.
pub fn rgba_to_rgba8(img: &Image<Rgba>) -> Vec<u8> {
    let mut frame = vec![0u8; img.width() * img.height() * RGBA_BPP];
    for (x, y, p) in img.pixels() {
        let i = (y * img.width() + x) * RGBA_BPP;
        frame[i] = to_byte(p.r());
        frame[i + 1] = to_byte(p.g());
        frame[i + 2] = to_byte(p.b());
        frame[i + 3] = to_byte(p.a());
    }
    frame
}
