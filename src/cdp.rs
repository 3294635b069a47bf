//! Chrome DevTools Protocol renderer

use crate::{Error, RenderConfig, Renderer, Result};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// CDP-based renderer (uses the `headless_chrome` crate)
///
/// Launches a headless Chrome instance sized to the viewport, drives a single
/// tab and captures screenshots clipped to exactly the viewport rectangle.
pub struct CdpRenderer {
    browser: Option<Browser>,
    tab: Arc<Tab>,
    config: RenderConfig,
}

impl CdpRenderer {
    fn wait_loaded(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::LoadError(format!("Wait for navigation failed: {}", e)))?;

        // Let web fonts and images settle before capturing
        std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        Ok(())
    }
}

impl Renderer for CdpRenderer {
    fn new(config: RenderConfig) -> Result<Self>
    where
        Self: Sized,
    {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .idle_browser_timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));
        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| Error::InitializationError(format!("Failed to set user agent: {}", e)))?;

        debug!(
            "chrome launched with a {}x{} window",
            config.viewport.width, config.viewport.height
        );

        Ok(Self {
            browser: Some(browser),
            tab,
            config,
        })
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::LoadError(format!("Navigation failed: {}", e)))?;
        self.wait_loaded()
    }

    fn load_html(&mut self, html: &str) -> Result<()> {
        let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, html);
        let data_url = format!("data:text/html;charset=utf-8;base64,{}", b64);
        self.load_url(&data_url)
    }

    fn render_png(&self) -> Result<Vec<u8>> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: self.config.viewport.width as f64,
            height: self.config.viewport.height as f64,
            scale: 1.0,
        };

        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))
    }

    fn close(&mut self) -> Result<()> {
        let closed = self
            .tab
            .close(true)
            .map_err(|e| Error::CdpError(format!("Failed to close tab: {}", e)));
        // Dropping the browser kills the Chrome process
        self.browser.take();
        closed.map(|_| ())
    }
}
