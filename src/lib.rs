//! ogkit
//!
//! Two small site utilities behind one crate:
//!
//! - **Snapshot rendering**: load a local HTML template, rasterize it at a
//!   fixed viewport and write the result as a PNG (the site's Open Graph
//!   preview image).
//! - **Asset optimization**: downscale oversized PNG/JPEG files in a public
//!   directory and re-encode them in place (see [`optimize`]).
//!
//! # Rendering backends
//!
//! - **CDP** (`cdp` feature): headless Chrome via the Chrome DevTools Protocol
//! - **Raster** (`raster` feature): a browser-less block rasterizer, handy for
//!   tests and machines without Chrome
//!
//! # Example
//!
//! ```no_run
//! use ogkit::{Backend, RenderJob, Viewport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let job = RenderJob {
//!     input: "og-template.html".into(),
//!     output: "client/public/og-image.png".into(),
//!     viewport: Viewport { width: 1200, height: 630 },
//! };
//!
//! let shot = ogkit::render_snapshot(&job, Backend::default())?;
//! println!("wrote {}x{}", shot.width, shot.height);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod error;
pub use error::{Error, OptimizeError, Result};

#[cfg(feature = "cdp")]
pub mod cdp;

// Browser-less renderer (HTML parse, block layout, PNG raster)
#[cfg(feature = "raster")]
pub mod rendering;

pub mod optimize;

mod snapshot;
pub use snapshot::{fit_to_viewport, render_snapshot, Screenshot};

/// Configuration for a renderer backend
///
/// The defaults match a standard Open Graph image: a 1200×630 viewport.
///
/// # Examples
///
/// ```
/// let cfg = ogkit::RenderConfig::default();
/// assert_eq!(cfg.viewport.width, 1200);
/// assert_eq!(cfg.viewport.height, 630);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Timeout for document loads in milliseconds
    pub timeout_ms: u64,
    /// Time to let the page settle after navigation (fonts, images)
    pub settle_ms: u64,
    /// User agent sent when fetching documents over HTTP
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 30000,
            settle_ms: 500,
            user_agent: format!("ogkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
        }
    }
}

impl Viewport {
    /// Largest edge a surface may have; Chrome refuses bigger captures.
    pub const MAX_DIMENSION: u32 = 16384;

    /// Reject empty or oversized surfaces before a backend is started
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ConfigError(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
            return Err(Error::ConfigError(format!(
                "viewport {}x{} exceeds the {}px limit",
                self.width,
                self.height,
                Self::MAX_DIMENSION
            )));
        }
        Ok(())
    }
}

/// A single snapshot request: which HTML to render, where the PNG goes and
/// at which size.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// HTML document to render
    pub input: PathBuf,
    /// PNG file to write (overwritten if present)
    pub output: PathBuf,
    /// Output dimensions
    pub viewport: Viewport,
}

impl Default for RenderJob {
    fn default() -> Self {
        Self {
            input: PathBuf::from("og-template.html"),
            output: PathBuf::from("client/public/og-image.png"),
            viewport: Viewport::default(),
        }
    }
}

/// Which renderer implementation to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Headless Chrome over CDP
    Cdp,
    /// Built-in block rasterizer
    Raster,
}

impl Default for Backend {
    /// Chrome when it is compiled in, otherwise the built-in rasterizer.
    fn default() -> Self {
        if cfg!(feature = "cdp") {
            Backend::Cdp
        } else {
            Backend::Raster
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Cdp => f.write_str("cdp"),
            Backend::Raster => f.write_str("raster"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cdp" | "chrome" => Ok(Backend::Cdp),
            "raster" => Ok(Backend::Raster),
            other => Err(Error::ConfigError(format!("unknown backend '{}'", other))),
        }
    }
}

/// Core trait for renderer backends
pub trait Renderer {
    /// Create a new renderer with the given configuration
    fn new(config: RenderConfig) -> Result<Self>
    where
        Self: Sized;

    /// Load a URL and wait for the document to be ready
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Load a local HTML file
    fn load_file(&mut self, path: &Path) -> Result<()> {
        let canonical = path.canonicalize().map_err(|_| Error::InputMissing(path.to_path_buf()))?;
        let url = url::Url::from_file_path(&canonical)
            .map_err(|_| Error::LoadError(format!("cannot build file URL for {}", canonical.display())))?;
        self.load_url(url.as_str())
    }

    /// Load an HTML document held in memory
    fn load_html(&mut self, html: &str) -> Result<()>;

    /// Render the current document as a PNG image at the configured viewport
    fn render_png(&self) -> Result<Vec<u8>>;

    /// Shut the backend down and release its resources
    fn close(&mut self) -> Result<()>;
}

/// Create a renderer for the requested backend
///
/// Fails with [`Error::ConfigError`] when the backend was not compiled in.
pub fn new_renderer(config: RenderConfig, backend: Backend) -> Result<Box<dyn Renderer>> {
    config.viewport.validate()?;
    match backend {
        #[cfg(feature = "cdp")]
        Backend::Cdp => Ok(Box::new(cdp::CdpRenderer::new(config)?)),
        #[cfg(feature = "raster")]
        Backend::Raster => Ok(Box::new(rendering::RasterRenderer::new(config)?)),
        #[allow(unreachable_patterns)]
        other => Err(Error::ConfigError(format!(
            "backend '{}' is not enabled in this build",
            other
        ))),
    }
}
