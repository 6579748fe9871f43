/// Two-level quantization for monochrome OLED panels
///
/// Both algorithms take an 8-bit grayscale image and return an image of the same
/// size whose pixels are either 0 (off) or 255 (lit).
use image::{GrayImage, Luma};

/// Midpoint used by error diffusion to pick black or white
const DITHER_MIDPOINT: f32 = 128.0;

/// Floyd-Steinberg dithering
///
/// Each pixel is quantized against the accumulated error, which is then pushed
/// onto unvisited neighbours in raster order:
///
/// ```text
///            *    7/16
///     3/16  5/16  1/16
/// ```
pub fn apply_floyd_steinberg_dithering(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut working_buffer = create_working_buffer(img);

    for y in 0..height {
        for x in 0..width {
            let y_idx = y as usize;
            let x_idx = x as usize;

            // Accumulated error may push a value out of range; clip before quantizing
            let old_pixel = working_buffer[y_idx][x_idx].clamp(0.0, 255.0);
            let new_pixel = if old_pixel > DITHER_MIDPOINT { 255.0 } else { 0.0 };
            working_buffer[y_idx][x_idx] = new_pixel;

            let error = old_pixel - new_pixel;
            distribute_floyd_steinberg_error(&mut working_buffer, x, y, width, height, error);
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        Luma([working_buffer[y as usize][x as usize] as u8])
    })
}

fn distribute_floyd_steinberg_error(
    working_buffer: &mut [Vec<f32>],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    error: f32,
) {
    let x_idx = x as usize;
    let y_idx = y as usize;

    if x + 1 < width {
        working_buffer[y_idx][x_idx + 1] += error * 7.0 / 16.0;
    }

    if y + 1 < height {
        if x > 0 {
            working_buffer[y_idx + 1][x_idx - 1] += error * 3.0 / 16.0;
        }
        working_buffer[y_idx + 1][x_idx] += error * 5.0 / 16.0;
        if x + 1 < width {
            working_buffer[y_idx + 1][x_idx + 1] += error * 1.0 / 16.0;
        }
    }
}

/// Plain threshold: white iff the value is strictly greater than `threshold`
pub fn apply_threshold(img: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let value = img.get_pixel(x, y)[0];
        Luma([if value > threshold { 255 } else { 0 }])
    })
}

fn create_working_buffer(img: &GrayImage) -> Vec<Vec<f32>> {
    let (width, height) = img.dimensions();
    (0..height)
        .map(|y| (0..width).map(|x| img.get_pixel(x, y)[0] as f32).collect())
        .collect()
}
