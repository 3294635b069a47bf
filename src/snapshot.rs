//! Snapshot rendering: HTML file in, fixed-size PNG file out.

use std::fs;
use std::io::Cursor;

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use log::{debug, info, warn};

use crate::{new_renderer, Backend, Error, RenderConfig, RenderJob, Result, Viewport};

/// A rendered page as PNG bytes plus its pixel size
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

/// Render `job.input` at `job.viewport` and write the PNG to `job.output`.
///
/// The input must exist; nothing is written unless rendering succeeds. An
/// existing file at the output path is overwritten.
pub fn render_snapshot(job: &RenderJob, backend: Backend) -> Result<Screenshot> {
    if !job.input.is_file() {
        return Err(Error::InputMissing(job.input.clone()));
    }

    let config = RenderConfig {
        viewport: job.viewport,
        ..Default::default()
    };

    debug!("rendering {} with the {} backend", job.input.display(), backend);
    let mut renderer = new_renderer(config, backend)?;
    let captured = renderer.load_file(&job.input).and_then(|_| renderer.render_png());
    if let Err(e) = renderer.close() {
        warn!("renderer shutdown failed: {}", e);
    }

    let screenshot = fit_to_viewport(captured?, job.viewport)?;

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&job.output, &screenshot.png_data)?;

    info!("OG image generated successfully at {}", job.output.display());
    Ok(screenshot)
}

/// Make sure a captured PNG has exactly the viewport's pixel size.
///
/// Backends running at a device scale factor other than 1 produce larger
/// captures; those are resampled down with Lanczos3.
pub fn fit_to_viewport(png: Vec<u8>, viewport: Viewport) -> Result<Screenshot> {
    let img = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .map_err(|e| Error::RenderError(format!("backend produced an unreadable PNG: {}", e)))?;

    let (width, height) = img.dimensions();
    if width == viewport.width && height == viewport.height {
        return Ok(Screenshot { width, height, png_data: png });
    }

    debug!(
        "resampling capture from {}x{} to {}x{}",
        width, height, viewport.width, viewport.height
    );
    let resized = img.resize_exact(viewport.width, viewport.height, FilterType::Lanczos3);
    let mut buf = Cursor::new(Vec::new());
    resized.write_to(&mut buf, ImageFormat::Png)?;

    Ok(Screenshot {
        width: viewport.width,
        height: viewport.height,
        png_data: buf.into_inner(),
    })
}
