use std::io::Cursor;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage, imageops};

use crate::keys::ImageKind;

/// Thumbnails are always this size, whatever the source aspect ratio.
pub const THUMB_WIDTH: u32 = 100;
pub const THUMB_HEIGHT: u32 = 100;

/// Decode `bytes` as the format the object key declared.
///
/// The declared format is authoritative, no content sniffing. Animated GIFs
/// decode to their first frame.
pub fn decode(bytes: &[u8], kind: ImageKind) -> Result<DynamicImage> {
    Ok(image::load_from_memory_with_format(bytes, kind.format())?)
}

/// Scale and crop `src` to exactly 100x100.
///
/// The shorter dimension is scaled to fill the target box and the overflow of
/// the longer one is cropped away, centered. Resampling uses a Catmull-Rom
/// kernel. Works in RGBA8 so transparency survives until encoding.
pub fn resize_to_fill(src: &DynamicImage) -> Result<RgbaImage> {
    let src_rgba8 = src.to_rgba8();
    let (orig_w, orig_h) = src_rgba8.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(eyre!("source image has a zero dimension"));
    }

    let src_image = Image::from_vec_u8(orig_w, orig_h, src_rgba8.into_raw(), PixelType::U8x4)?;
    let mut dst_image = Image::new(THUMB_WIDTH, THUMB_HEIGHT, PixelType::U8x4);

    // fit_into_destination keeps the aspect ratio and crops the overflow
    // around the (0.5, 0.5) center point.
    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::CatmullRom))
        .fit_into_destination(Some((0.5, 0.5)));
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    ImageBuffer::from_raw(THUMB_WIDTH, THUMB_HEIGHT, dst_image.into_vec())
        .ok_or_else(|| eyre!("failed to construct resized image from buffer"))
}

/// Paste the thumbnail at (0, 0) onto a fresh, fully transparent 100x100
/// canvas.
///
/// With a 100x100 thumbnail this is a plain copy, but it stays a separate
/// stage so non-square canvases or watermark overlays can slot in without
/// reshaping the pipeline.
pub fn composite_onto_canvas(thumb: &RgbaImage) -> RgbaImage {
    let mut canvas = ImageBuffer::from_pixel(THUMB_WIDTH, THUMB_HEIGHT, Rgba([0, 0, 0, 0]));
    imageops::overlay(&mut canvas, thumb, 0, 0);
    canvas
}

/// Encode the canvas in `kind`'s container format.
///
/// JPEG cannot carry an alpha channel, so the canvas is flattened to RGB
/// first; PNG and GIF keep RGBA. Everything stays in memory, no scratch
/// files.
pub fn encode(canvas: RgbaImage, kind: ImageKind) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    match kind {
        ImageKind::Jpeg => DynamicImage::ImageRgba8(canvas)
            .to_rgb8()
            .write_to(&mut bytes, ImageFormat::Jpeg)?,
        ImageKind::Png | ImageKind::Gif => canvas.write_to(&mut bytes, kind.format())?,
    }
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, Rgba([10, 60, 200, 255])))
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        solid_image(w, h)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn resize_fills_target_for_any_aspect_ratio() {
        for (w, h) in [(320, 200), (200, 320), (100, 100), (37, 613)] {
            let thumb = resize_to_fill(&solid_image(w, h)).unwrap();
            assert_eq!(thumb.dimensions(), (THUMB_WIDTH, THUMB_HEIGHT));
        }
    }

    #[test]
    fn resized_solid_source_stays_opaque() {
        let thumb = resize_to_fill(&solid_image(640, 480)).unwrap();
        assert!(thumb.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn composite_keeps_canvas_dimensions_and_content() {
        let thumb = resize_to_fill(&solid_image(300, 300)).unwrap();
        let canvas = composite_onto_canvas(&thumb);
        assert_eq!(canvas.dimensions(), (THUMB_WIDTH, THUMB_HEIGHT));
        // Crop-to-fill leaves no uncovered canvas area.
        assert!(canvas.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn encode_decode_round_trip_per_format() {
        let thumb = resize_to_fill(&solid_image(256, 128)).unwrap();
        for kind in [ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif] {
            let canvas = composite_onto_canvas(&thumb);
            let encoded = encode(canvas, kind).unwrap();
            let decoded = decode(&encoded, kind).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                (THUMB_WIDTH, THUMB_HEIGHT)
            );
        }
    }

    #[test]
    fn decode_uses_declared_format() {
        let bytes = png_bytes(32, 32);
        assert!(decode(&bytes, ImageKind::Png).is_ok());
        // Valid PNG bytes under a .jpg key are a decode failure.
        assert!(decode(&bytes, ImageKind::Jpeg).is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"definitely not an image", ImageKind::Jpeg).is_err());
    }
}
