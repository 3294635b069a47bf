//! In-place image optimization for a site's public directory
//!
//! Every target file is decoded, downscaled with Lanczos3 when it is wider
//! than the configured maximum (aspect ratio kept, never upscaled) and
//! re-encoded over itself: JPEG at the configured quality, PNG with maximum
//! compression. A file that fails is recorded in the [`BatchReport`] and the
//! batch moves on.

mod report;
mod scan;
mod tracker;

pub use report::{BatchReport, Optimized, Outcome};
pub use scan::{has_extension, scan_directory};
pub use tracker::ProcessedSet;

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::{debug, error, info};

use crate::{Error, OptimizeError, Result};

/// Images the site ships that always get optimized, relative to the public
/// directory.
pub const DEFAULT_CURATED: [&str; 3] = ["MIS1#.png", "MIS2#.png", "MIS3#.png"];

/// What to optimize and how
#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    /// Files handled first, in order; missing ones are skipped
    pub files: Vec<PathBuf>,
    /// Directory whose matching files are handled after `files`
    pub dir: Option<PathBuf>,
    /// Extensions picked up from `dir`
    pub extensions: Vec<String>,
    /// Images wider than this are downscaled to it
    pub max_width: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self::for_public_dir("client/public")
    }
}

impl OptimizeConfig {
    /// The site's standard setup: the curated images plus every PNG/JPEG in
    /// `dir`, 1200px wide at quality 80.
    pub fn for_public_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            files: DEFAULT_CURATED.iter().map(|name| dir.join(name)).collect(),
            dir: Some(dir),
            extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            max_width: 1200,
            quality: 80,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(Error::ConfigError("max width must be at least 1".into()));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(Error::ConfigError(format!(
                "quality must be within 1..=100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// New size for an image `width` x `height` capped at `max_width`, or `None`
/// when it already fits. Height scales by the same factor, truncated, and
/// never drops below one pixel.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width {
        return None;
    }
    let ratio = max_width as f64 / width as f64;
    let new_height = ((height as f64 * ratio) as u32).max(1);
    Some((max_width, new_height))
}

/// Encoder choice follows the file name, the way the file will be served.
fn output_format(path: &Path) -> std::result::Result<ImageFormat, OptimizeError> {
    match ImageFormat::from_path(path) {
        Ok(fmt @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(fmt),
        Ok(other) => Err(OptimizeError::UnsupportedFormat(format!("{:?}", other))),
        Err(_) => Err(OptimizeError::UnsupportedFormat(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "<none>".into()),
        )),
    }
}

fn encode(img: &DynamicImage, format: ImageFormat, quality: u8) -> std::result::Result<Vec<u8>, OptimizeError> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            // JPEG has no alpha channel and only 8-bit samples
            let flat = match img {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => None,
                other => Some(DynamicImage::ImageRgb8(other.to_rgb8())),
            };
            flat.as_ref()
                .unwrap_or(img)
                .write_with_encoder(encoder)
                .map_err(OptimizeError::Encode)?;
        }
        _ => {
            let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder).map_err(OptimizeError::Encode)?;
        }
    }
    Ok(buf)
}

/// Optimize one file in place.
///
/// The new bytes are produced in memory first; the original is only
/// overwritten once encoding succeeded.
pub fn optimize_image(path: &Path, config: &OptimizeConfig) -> std::result::Result<Optimized, OptimizeError> {
    let data = fs::read(path).map_err(OptimizeError::Open)?;
    let format = output_format(path)?;
    let img = image::load_from_memory(&data).map_err(OptimizeError::Decode)?;

    let original = img.dimensions();
    let img = match target_dimensions(original.0, original.1, config.max_width) {
        Some((w, h)) => {
            debug!("{}: {}x{} -> {}x{}", path.display(), original.0, original.1, w, h);
            img.resize_exact(w, h, FilterType::Lanczos3)
        }
        None => img,
    };

    let bytes = encode(&img, format, config.quality)?;
    fs::write(path, &bytes).map_err(OptimizeError::Write)?;

    Ok(Optimized {
        path: path.to_path_buf(),
        original,
        output: img.dimensions(),
        bytes_before: data.len() as u64,
        bytes_after: bytes.len() as u64,
    })
}

fn process(path: &Path, config: &OptimizeConfig, seen: &mut ProcessedSet, report: &mut BatchReport) {
    if !seen.insert(path) {
        debug!("{} already optimized in this run, skipping", path.display());
        report.duplicates_skipped += 1;
        return;
    }

    let outcome = match optimize_image(path, config) {
        Ok(done) => {
            info!("Optimized: {}", path.display());
            Outcome::Optimized(done)
        }
        Err(e) => {
            error!("Error optimizing {}: {}", path.display(), e);
            Outcome::Failed {
                path: path.to_path_buf(),
                error: e,
            }
        }
    };
    report.outcomes.push(outcome);
}

/// Run the whole batch: the curated files first, then the directory scan.
///
/// Each file is optimized at most once. Per-file failures land in the report;
/// an unreadable scan directory is logged and treated as empty.
pub fn run_batch(config: &OptimizeConfig) -> BatchReport {
    let mut seen = ProcessedSet::new();
    let mut report = BatchReport::default();

    for path in &config.files {
        if !path.exists() {
            debug!("{} does not exist, skipping", path.display());
            continue;
        }
        process(path, config, &mut seen, &mut report);
    }

    if let Some(dir) = &config.dir {
        match scan_directory(dir, &config.extensions) {
            Ok(paths) => {
                for path in paths {
                    process(&path, config, &mut seen, &mut report);
                }
            }
            Err(e) => error!("Cannot scan {}: {}", dir.display(), e),
        }
    }

    report
}
