//! Browser-less rendering backend
//!
//! Fetches or reads HTML, lays headings and paragraphs out as stacked blocks
//! and paints them onto a canvas of exactly the viewport size. No CSS beyond
//! inline page colors, no JavaScript, no fonts: text shows up as glyph-cell
//! blocks. Output is deterministic for a given document and viewport.

pub mod layout;
pub mod paint;
pub mod raster;

use std::path::Path;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use scraper::Html;

use crate::{Error, RenderConfig, Renderer, Result};

/// Renderer that rasterizes HTML without a browser
pub struct RasterRenderer {
    client: Client,
    config: RenderConfig,
    last_html: Option<String>,
}

impl RasterRenderer {
    /// Render a document string straight to PNG bytes
    pub fn render_document(html: &str, config: &RenderConfig) -> Result<Vec<u8>> {
        config.viewport.validate()?;
        let document = Html::parse_document(html);
        let nodes = layout::layout_document(&document, config.viewport);
        let style = paint::page_style(&document);
        let cmds = paint::build_display_list(&nodes, style, config.viewport);
        debug!("raster: {} blocks, {} paint commands", nodes.len(), cmds.len());
        let canvas = raster::rasterize(&cmds, config.viewport);
        raster::encode_png(&canvas)
    }
}

impl Renderer for RasterRenderer {
    fn new(config: RenderConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            last_html: None,
        })
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url).map_err(|e| Error::LoadError(format!("invalid URL '{}': {}", url, e)))?;

        if parsed.scheme() == "file" {
            let path = parsed
                .to_file_path()
                .map_err(|_| Error::LoadError(format!("invalid file URL '{}'", url)))?;
            return self.load_file(&path);
        }

        let res = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| Error::LoadError(format!("HTTP GET failed: {}", e)))?;

        if !res.status().is_success() {
            return Err(Error::LoadError(format!("HTTP GET {} returned {}", url, res.status())));
        }

        let body = res
            .text()
            .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;
        self.last_html = Some(body);
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let html = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::InputMissing(path.to_path_buf()),
            _ => Error::LoadError(format!("cannot read {}: {}", path.display(), e)),
        })?;
        self.last_html = Some(html);
        Ok(())
    }

    fn load_html(&mut self, html: &str) -> Result<()> {
        self.last_html = Some(html.to_string());
        Ok(())
    }

    fn render_png(&self) -> Result<Vec<u8>> {
        let html = self
            .last_html
            .as_deref()
            .ok_or_else(|| Error::RenderError("No document loaded".into()))?;
        Self::render_document(html, &self.config)
    }

    fn close(&mut self) -> Result<()> {
        self.last_html = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    #[test]
    fn render_without_document_fails() {
        let r = RasterRenderer::new(RenderConfig::default()).unwrap();
        assert!(matches!(r.render_png(), Err(Error::RenderError(_))));
    }

    #[test]
    fn render_html_has_viewport_size() {
        let cfg = RenderConfig {
            viewport: Viewport { width: 300, height: 150 },
            ..Default::default()
        };
        let mut r = RasterRenderer::new(cfg).unwrap();
        r.load_html("<html><body><h1>Hello</h1><p>world</p></body></html>").unwrap();
        let png = r.render_png().unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (300, 150));
    }

    #[test]
    fn render_document_rejects_oversized_viewport() {
        let cfg = RenderConfig {
            viewport: Viewport { width: 100000, height: 100000 },
            ..Default::default()
        };
        let err = RasterRenderer::render_document("<p>x</p>", &cfg).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn load_missing_file_is_input_missing() {
        let mut r = RasterRenderer::new(RenderConfig::default()).unwrap();
        let err = r.load_file(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(matches!(err, Error::InputMissing(_)));
    }
}
