//! Image staging for PDF embedding.
//!
//! Uploaded bytes are decoded, flattened to RGB, shrunk to print resolution,
//! re-encoded as JPEG into a temporary file and embedded from there as-is. The file belongs to the
//! returned `StagedImage` and is unlinked when that value is dropped, on
//! success and on every error path.

use std::path::Path;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use tempfile::NamedTempFile;
use thiserror::Error;

const JPEG_QUALITY: u8 = 90;

/// Image step failures. Never fatal to the report: the caller prints
/// fallback text instead.
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not re-encode image: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A re-encoded copy of the upload, alive as long as this value.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    pub width_px: u32,
    pub height_px: u32,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The staged JPEG stream, ready for a DCT-filtered image object.
    pub fn read_jpeg(&self) -> Result<Vec<u8>, StagingError> {
        Ok(std::fs::read(self.path())?)
    }
}

/// Pixel box for `size_mm` printed at `dpi`.
pub fn print_pixels(size_mm: (f32, f32), dpi: f32) -> (u32, u32) {
    let px = |mm: f32| ((mm / 25.4 * dpi).round() as u32).max(1);
    (px(size_mm.0), px(size_mm.1))
}

/// Shrink `image` to fit inside `max_px`, keeping its aspect ratio. Smaller
/// images are returned untouched.
pub fn fit_within(image: DynamicImage, max_px: (u32, u32)) -> DynamicImage {
    if image.width() <= max_px.0 && image.height() <= max_px.1 {
        return image;
    }
    image.thumbnail(max_px.0, max_px.1)
}

/// Decode `bytes`, fit them inside `max_px` and write them as JPEG into a new
/// temp file in `dir`.
pub fn stage_image(
    bytes: &[u8],
    dir: &Path,
    max_px: (u32, u32),
) -> Result<StagedImage, StagingError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| StagingError::Decode(e.to_string()))?;
    let (source_width, source_height) = (decoded.width(), decoded.height());
    let rgb = fit_within(DynamicImage::ImageRgb8(flatten_on_white(&decoded)), max_px);

    let mut file = tempfile::Builder::new()
        .prefix("colpo-")
        .suffix(".jpg")
        .tempfile_in(dir)?;

    rgb.write_to(&mut file, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| StagingError::Encode(e.to_string()))?;

    tracing::debug!(
        path = %file.path().display(),
        source_width,
        source_height,
        width = rgb.width(),
        height = rgb.height(),
        "Source image staged"
    );

    Ok(StagedImage {
        file,
        width_px: rgb.width(),
        height_px: rgb.height(),
    })
}

/// Open an image file (format sniffed from content) as flattened RGB.
pub fn load_image_file(path: &Path) -> Result<DynamicImage, StagingError> {
    let decoded = image::io::Reader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| StagingError::Decode(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(flatten_on_white(&decoded)))
}

/// Composite any alpha channel onto white. PDF image XObjects here carry no
/// soft mask, and transparent signature scans would otherwise print black.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn encoded_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    const PRINT_BOX: (u32, u32) = (1417, 1063);

    fn dir_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn stages_jpeg_as_jpeg_file() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(ImageFormat::Jpeg, 64, 48);

        let staged = stage_image(&bytes, dir.path(), PRINT_BOX).unwrap();
        assert!(staged.path().exists());
        assert!(staged.path().starts_with(dir.path()));
        assert!(staged.path().to_string_lossy().ends_with(".jpg"));
        assert_eq!((staged.width_px, staged.height_px), (64, 48));

        let jpeg = staged.read_jpeg().unwrap();
        assert!(jpeg.starts_with(&[0xFF, 0xD8, 0xFF]));
        let loaded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (64, 48));
    }

    #[test]
    fn large_upload_is_shrunk_to_print_box() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(ImageFormat::Jpeg, 3000, 1500);

        let staged = stage_image(&bytes, dir.path(), PRINT_BOX).unwrap();
        assert!(staged.width_px <= 1417 && staged.height_px <= 1063);
        assert!(staged.width_px >= 1400, "got {}", staged.width_px);
        // 2:1 aspect kept
        let ratio = staged.width_px as f32 / staged.height_px as f32;
        assert!((ratio - 2.0).abs() < 0.01, "ratio {ratio}");
        assert!(staged.read_jpeg().unwrap().len() < bytes.len());
    }

    #[test]
    fn print_pixels_at_300_dpi() {
        assert_eq!(print_pixels((120.0, 90.0), 300.0), (1417, 1063));
        assert_eq!(print_pixels((50.0, 20.0), 300.0), (591, 236));
    }

    #[test]
    fn fit_within_leaves_small_images_alone() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 5));
        let fitted = fit_within(img, (100, 100));
        assert_eq!((fitted.width(), fitted.height()), (10, 5));
    }

    #[test]
    fn stages_png_input() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(ImageFormat::Png, 20, 10);
        let staged = stage_image(&bytes, dir.path(), PRINT_BOX).unwrap();
        assert_eq!((staged.width_px, staged.height_px), (20, 10));
    }

    #[test]
    fn drop_removes_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(ImageFormat::Png, 8, 8);

        let staged = stage_image(&bytes, dir.path(), PRINT_BOX).unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(dir_entries(dir.path()), 1);

        drop(staged);
        assert!(!path.exists());
        assert_eq!(dir_entries(dir.path()), 0);
    }

    #[test]
    fn corrupt_bytes_fail_without_leaving_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = encoded_image(ImageFormat::Jpeg, 16, 16);
        bytes.truncate(20);

        let err = stage_image(&bytes, dir.path(), PRINT_BOX).unwrap_err();
        assert!(matches!(err, StagingError::Decode(_)));
        assert_eq!(dir_entries(dir.path()), 0);
    }

    #[test]
    fn missing_staging_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let bytes = encoded_image(ImageFormat::Png, 4, 4);

        let err = stage_image(&bytes, &missing, PRINT_BOX).unwrap_err();
        assert!(matches!(err, StagingError::Io(_)));
    }

    #[test]
    fn load_image_file_sniffs_content() {
        let dir = tempfile::tempdir().unwrap();
        // PNG bytes behind a misleading extension
        let path = dir.path().join("signature.jpg");
        std::fs::write(&path, encoded_image(ImageFormat::Png, 12, 6)).unwrap();

        let img = load_image_file(&path).unwrap();
        assert_eq!((img.width(), img.height()), (12, 6));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_image_file(Path::new("/nonexistent/firma.png")).unwrap_err();
        assert!(matches!(err, StagingError::Io(_)));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));

        let flat = flatten_on_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
    }
}
