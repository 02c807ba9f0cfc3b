//! Colour adjustments applied by the enhancement stage.
//!
//! Each adjustment blends the image with a "degenerate" reference and an
//! interpolation factor: 1.0 leaves the image untouched, values above 1.0
//! push pixels away from the reference.
//!
//! - brightness: reference is black
//! - contrast: reference is the mean luminance of the whole image
//! - saturation: reference is the per-pixel luminance (grayscale copy)

use image::{Rgb, RgbImage};

/// ITU-R 601-2 luma, fixed-point with rounding.
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// `reference + factor * (value - reference)`, clipped to `0..=255`.
fn blend_channel(reference: f32, value: u8, factor: f32) -> u8 {
    let out = reference + factor * (f32::from(value) - reference);
    if out <= 0.0 {
        0
    } else if out >= 255.0 {
        255
    } else {
        out as u8
    }
}

fn blend_pixel(reference: [f32; 3], pixel: &Rgb<u8>, factor: f32) -> Rgb<u8> {
    Rgb(std::array::from_fn(|c| blend_channel(reference[c], pixel.0[c], factor)))
}

#[must_use = "returns the adjusted image"]
pub fn brightness(image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        *pixel = blend_pixel([0.0; 3], pixel, factor);
    }
    out
}

#[must_use = "returns the adjusted image"]
pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luma(image);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        *pixel = blend_pixel([mean; 3], pixel, factor);
    }
    out
}

#[must_use = "returns the adjusted image"]
pub fn saturation(image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let gray = f32::from(luma(pixel));
        *pixel = blend_pixel([gray; 3], pixel, factor);
    }
    out
}

/// Mean luminance rounded to the nearest integer; 0 for an empty image.
fn mean_luma(image: &RgbImage) -> f32 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0.0;
    }
    let total: u64 = image.pixels().map(|p| u64::from(luma(p))).sum();
    (total as f64 / count as f64 + 0.5).floor() as f32
}

/// Detail-enhancing 3x3 kernel, normalised by its sum (6).
const DETAIL_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 10, -1], [0, -1, 0]];
const DETAIL_SCALE: i32 = 6;

/// Sharpen with the detail kernel. Border pixels are copied unchanged.
#[must_use = "returns the sharpened image"]
pub fn detail(image: &RgbImage) -> RgbImage {
    let (w, h) = image.dimensions();
    if w < 3 || h < 3 {
        return image.clone();
    }

    RgbImage::from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            return *image.get_pixel(x, y);
        }
        Rgb(std::array::from_fn(|c| {
            let mut acc = 0i32;
            for (ky, row) in DETAIL_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let px = image.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    acc += weight * i32::from(px.0[c]);
                }
            }
            // Round half away from zero before clamping.
            let scaled = (acc + DETAIL_SCALE / 2 * acc.signum()) / DETAIL_SCALE;
            scaled.clamp(0, 255) as u8
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_fn(4, 4, |_, _| Rgb([r, g, b]))
    }

    #[test]
    fn unit_factor_is_identity() {
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([(x * 40) as u8, (y * 70) as u8, 90]));
        assert_eq!(brightness(&img, 1.0), img);
        assert_eq!(contrast(&img, 1.0), img);
        assert_eq!(saturation(&img, 1.0), img);
    }

    #[test]
    fn brightness_scales_and_clips() {
        let out = brightness(&uniform(50, 100, 200), 2.0);
        assert_eq!(out.get_pixel(0, 0).0, [100, 200, 255]);
    }

    #[test]
    fn saturation_leaves_gray_untouched() {
        let img = uniform(128, 128, 128);
        assert_eq!(saturation(&img, 1.2), img);
    }

    #[test]
    fn detail_on_flat_image_is_identity() {
        let img = uniform(77, 150, 200);
        assert_eq!(detail(&img), img);
    }

    #[test]
    fn detail_accentuates_a_bright_center() {
        let mut img = uniform(100, 100, 100);
        img.put_pixel(2, 2, Rgb([130, 130, 130]));
        let out = detail(&img);
        assert!(out.get_pixel(2, 2).0[0] > 130);
        assert!(out.get_pixel(1, 2).0[0] < 100);
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn luma_of_primaries() {
        assert_eq!(luma(&Rgb([255, 255, 255])), 255);
        assert_eq!(luma(&Rgb([0, 0, 0])), 0);
        assert_eq!(luma(&Rgb([255, 0, 0])), 76);
    }
}
