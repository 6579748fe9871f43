use anyhow::{Context, Result};
use image::GrayImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pack a two-level grayscale image into 1 bit per pixel
///
/// Rows are packed MSB first and padded to a whole byte, which is the layout of
/// a grayscale PNG with bit depth 1. Any non-zero pixel is a lit (1) bit.
pub fn pack_1bit(img: &GrayImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let row_bytes = (width as usize).div_ceil(8);
    let mut packed = vec![0u8; row_bytes * height as usize];

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[0] != 0 {
            let index = y as usize * row_bytes + x as usize / 8;
            packed[index] |= 0x80 >> (x % 8);
        }
    }

    packed
}

/// Encode a two-level image as a grayscale PNG with bit depth 1
pub fn write_1bit_png<W: Write>(img: &GrayImage, writer: W) -> Result<()> {
    let (width, height) = img.dimensions();

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::One);

    let mut png_writer = encoder.write_header().context("Failed to write PNG header")?;
    png_writer
        .write_image_data(&pack_1bit(img))
        .context("Failed to write PNG image data")?;
    png_writer.finish().context("Failed to finish PNG stream")?;

    Ok(())
}

/// Save a two-level image to `path` as a 1-bit PNG
pub fn save_1bit_png(img: &GrayImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_1bit_png(img, &mut writer)
        .with_context(|| format!("Failed to save PNG: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush PNG: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Luma;

    /// Decode a PNG and return (width, height, bit depth, color type, packed rows)
    pub(crate) fn decode_png(bytes: &[u8]) -> (u32, u32, png::BitDepth, png::ColorType, Vec<u8>) {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info.width, info.height, info.bit_depth, info.color_type, buf)
    }

    #[test]
    fn test_pack_1bit_layout() {
        // 10 pixels wide: two bytes per row, the second padded
        let img = GrayImage::from_fn(10, 2, |x, y| {
            if (y == 0 && (x == 0 || x == 9)) || (y == 1 && x == 7) {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        assert_eq!(pack_1bit(&img), vec![0b1000_0000, 0b0100_0000, 0b0000_0001, 0b0000_0000]);
    }

    #[test]
    fn test_pack_full_canvas_size() {
        let img = GrayImage::from_pixel(128, 64, Luma([255]));
        let packed = pack_1bit(&img);

        assert_eq!(packed.len(), 128 / 8 * 64);
        assert!(packed.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_write_1bit_png_header() {
        let img = GrayImage::from_fn(128, 64, |x, _| Luma([if x % 2 == 0 { 255 } else { 0 }]));
        let mut bytes = Vec::new();
        write_1bit_png(&img, &mut bytes).unwrap();

        let (width, height, depth, color, data) = decode_png(&bytes);
        assert_eq!((width, height), (128, 64));
        assert_eq!(depth, png::BitDepth::One);
        assert_eq!(color, png::ColorType::Grayscale);
        assert_eq!(data, pack_1bit(&img));
        assert!(data.iter().all(|&b| b == 0b1010_1010));
    }
}
