use image::{DynamicImage, GrayImage, Luma};

use super::dithering::{apply_floyd_steinberg_dithering, apply_threshold};
use crate::cli::DitherMethod;

/// Convert a decoded image to 8-bit grayscale using ITU-R 601 luma weights
///
/// L = (299 * R + 587 * G + 114 * B) / 1000, rounded. Alpha is dropped.
pub fn convert_to_grayscale(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut grayscale = GrayImage::new(width, height);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let r = pixel[0] as u32;
        let g = pixel[1] as u32;
        let b = pixel[2] as u32;

        let gray = (299 * r + 587 * g + 114 * b + 500) / 1000;

        grayscale.put_pixel(x, y, Luma([gray as u8]));
    }

    grayscale
}

/// Reduce a grayscale image to black and white with the configured method
pub fn binarize(img: &GrayImage, method: DitherMethod, threshold: u8) -> GrayImage {
    match method {
        DitherMethod::FloydSteinberg => apply_floyd_steinberg_dithering(img),
        DitherMethod::None => apply_threshold(img, threshold),
    }
}
