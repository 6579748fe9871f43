use anyhow::Result;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{imageops, GrayImage, Luma};

use crate::cli::{BackgroundColor, ResampleFilter, ResizeMode};

impl ResampleFilter {
    fn resize_alg(self) -> ResizeAlg {
        match self {
            ResampleFilter::Nearest => ResizeAlg::Nearest,
            ResampleFilter::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            ResampleFilter::Bicubic => ResizeAlg::Convolution(FilterType::CatmullRom),
            ResampleFilter::Lanczos => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }
}

/// Fit a grayscale image onto a `target_width` x `target_height` canvas
pub fn fit_to_canvas(
    img: &GrayImage,
    target_width: u32,
    target_height: u32,
    mode: ResizeMode,
    filter: ResampleFilter,
    background: BackgroundColor,
) -> Result<GrayImage> {
    match mode {
        ResizeMode::Stretch => resize_image(img, target_width, target_height, filter),
        ResizeMode::Letterbox => letterbox(img, target_width, target_height, filter, background),
    }
}

/// Size of the scaled content inside the letterbox canvas
///
/// Scale is the smaller of the two axis ratios; each side is rounded and kept within `1..=target`.
pub fn letterbox_dimensions(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let scale = f64::min(
        target_width as f64 / src_width as f64,
        target_height as f64 / src_height as f64,
    );

    let new_width = ((src_width as f64 * scale).round() as u32).clamp(1, target_width);
    let new_height = ((src_height as f64 * scale).round() as u32).clamp(1, target_height);
    (new_width, new_height)
}

/// Resize preserving aspect ratio and paste centered onto a filled canvas
///
/// The paste offset uses floor division, so an odd leftover pixel ends up on the right/bottom edge.
fn letterbox(
    img: &GrayImage,
    target_width: u32,
    target_height: u32,
    filter: ResampleFilter,
    background: BackgroundColor,
) -> Result<GrayImage> {
    let (src_width, src_height) = img.dimensions();
    let (new_width, new_height) =
        letterbox_dimensions(src_width, src_height, target_width, target_height);

    let resized = resize_image(img, new_width, new_height, filter)?;

    let mut canvas = GrayImage::from_pixel(target_width, target_height, Luma([background.luma()]));
    let paste_x = (target_width - new_width) / 2;
    let paste_y = (target_height - new_height) / 2;
    imageops::replace(&mut canvas, &resized, paste_x as i64, paste_y as i64);

    log::debug!(
        "Letterbox {}x{} -> {}x{} at ({}, {})",
        src_width,
        src_height,
        new_width,
        new_height,
        paste_x,
        paste_y
    );

    Ok(canvas)
}

/// Resize a grayscale image to exact dimensions
fn resize_image(
    img: &GrayImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<GrayImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!(
            "Target size must be non-zero, got {}x{}",
            width,
            height
        ));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8)?;
    let mut dst_image = Image::new(width, height, PixelType::U8);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(filter.resize_alg());
    resizer.resize(&src_image, &mut dst_image, Some(&options))?;

    GrayImage::from_raw(width, height, dst_image.buffer().to_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer does not match {}x{}", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    fn create_gradient_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]))
    }

    #[test]
    fn test_letterbox_dimensions() {
        // Same aspect ratio as the canvas fills it completely
        assert_eq!(letterbox_dimensions(256, 128, 128, 64), (128, 64));
        // Square source is limited by the height
        assert_eq!(letterbox_dimensions(128, 128, 128, 64), (64, 64));
        // Wide source is limited by the width: 100 * 128 / 300 = 42.67
        assert_eq!(letterbox_dimensions(300, 100, 128, 64), (128, 43));
        // Already at target size
        assert_eq!(letterbox_dimensions(128, 64, 128, 64), (128, 64));
    }

    #[test]
    fn test_letterbox_pads_square_source() {
        let img = create_test_image(200, 200, 255);
        let result = fit_to_canvas(
            &img,
            128,
            64,
            ResizeMode::Letterbox,
            ResampleFilter::Nearest,
            BackgroundColor::Black,
        )
        .unwrap();

        assert_eq!(result.dimensions(), (128, 64));
        // 64x64 content starts at x = 32
        assert_eq!(result.get_pixel(0, 0)[0], 0);
        assert_eq!(result.get_pixel(31, 32)[0], 0);
        assert_eq!(result.get_pixel(32, 32)[0], 255);
        assert_eq!(result.get_pixel(95, 32)[0], 255);
        assert_eq!(result.get_pixel(96, 32)[0], 0);
        assert_eq!(result.get_pixel(127, 63)[0], 0);
    }

    #[test]
    fn test_letterbox_white_background() {
        let img = create_test_image(300, 100, 0);
        let result = fit_to_canvas(
            &img,
            128,
            64,
            ResizeMode::Letterbox,
            ResampleFilter::Bilinear,
            BackgroundColor::White,
        )
        .unwrap();

        assert_eq!(result.dimensions(), (128, 64));
        // 43 rows of content, offset (64 - 43) / 2 = 10, odd row goes to the bottom
        for x in [0, 64, 127] {
            assert_eq!(result.get_pixel(x, 9)[0], 255);
            assert_eq!(result.get_pixel(x, 10)[0], 0);
            assert_eq!(result.get_pixel(x, 52)[0], 0);
            assert_eq!(result.get_pixel(x, 53)[0], 255);
        }
    }

    #[test]
    fn test_stretch_fills_canvas() {
        let img = create_test_image(130, 500, 200);
        let result = fit_to_canvas(
            &img,
            128,
            64,
            ResizeMode::Stretch,
            ResampleFilter::Lanczos,
            BackgroundColor::White,
        )
        .unwrap();

        assert_eq!(result.dimensions(), (128, 64));
        // No padding anywhere: a uniform source stays uniform (allowing for fixed-point rounding)
        assert!(result.pixels().all(|p| (199..=201).contains(&p[0])));
    }

    #[test]
    fn test_all_filters_produce_target_size() {
        let img = create_gradient_image(640, 480);
        for filter in [
            ResampleFilter::Nearest,
            ResampleFilter::Bilinear,
            ResampleFilter::Bicubic,
            ResampleFilter::Lanczos,
        ] {
            for mode in [ResizeMode::Letterbox, ResizeMode::Stretch] {
                let result =
                    fit_to_canvas(&img, 128, 64, mode, filter, BackgroundColor::Black).unwrap();
                assert_eq!(result.dimensions(), (128, 64), "{:?} {:?}", mode, filter);
            }
        }
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let img = create_gradient_image(128, 64);
        let result = resize_image(&img, 128, 64, ResampleFilter::Lanczos).unwrap();
        assert_eq!(result, img);
    }
}
