//! Integration tests for snapshot rendering
#![cfg(feature = "raster")]

use std::fs;
use std::sync::Once;

use image::GenericImageView;
use ogkit::{new_renderer, Backend, Error, RenderConfig, RenderJob, Viewport};
use tiny_http::{Response, Server};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>MIS Club</title></head>
<body style="background: #0b1d3a; color: #ffffff">
<h1>MIS Club</h1>
<p>Management Information Systems student society.</p>
</body>
</html>"#;

static INIT: Once = Once::new();

fn start_test_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18090").unwrap();
            for request in server.incoming_requests() {
                let response = match request.url() {
                    "/" => Response::from_string(TEMPLATE).with_header(
                        "Content-Type: text/html; charset=utf-8"
                            .parse::<tiny_http::Header>()
                            .unwrap(),
                    ),
                    _ => Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18090".to_string()
}

#[test]
fn renders_og_sized_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("og-template.html");
    fs::write(&input, TEMPLATE).unwrap();
    let job = RenderJob {
        input,
        output: dir.path().join("public").join("og-image.png"),
        viewport: Viewport::default(),
    };

    let shot = ogkit::render_snapshot(&job, Backend::Raster).expect("render");
    assert_eq!((shot.width, shot.height), (1200, 630));

    let written = image::open(&job.output).expect("decode output");
    assert_eq!(written.dimensions(), (1200, 630));
    // body background from the inline style
    assert_eq!(written.get_pixel(1199, 629).0, [11, 29, 58, 255]);
}

#[test]
fn missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let job = RenderJob {
        input: dir.path().join("missing.html"),
        output: dir.path().join("og-image.png"),
        viewport: Viewport::default(),
    };

    let err = ogkit::render_snapshot(&job, Backend::Raster).unwrap_err();
    assert!(matches!(err, Error::InputMissing(_)));
    assert!(!job.output.exists());
}

#[test]
fn existing_output_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("t.html");
    fs::write(&input, TEMPLATE).unwrap();
    let output = dir.path().join("og.png");
    fs::write(&output, b"stale").unwrap();

    let job = RenderJob {
        input,
        output: output.clone(),
        viewport: Viewport { width: 400, height: 210 },
    };
    ogkit::render_snapshot(&job, Backend::Raster).unwrap();
    assert_eq!(image::open(&output).unwrap().dimensions(), (400, 210));
}

#[test]
fn rendering_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("t.html");
    fs::write(&input, TEMPLATE).unwrap();
    let mk = |name: &str| RenderJob {
        input: input.clone(),
        output: dir.path().join(name),
        viewport: Viewport::default(),
    };

    let a = ogkit::render_snapshot(&mk("a.png"), Backend::Raster).unwrap();
    let b = ogkit::render_snapshot(&mk("b.png"), Backend::Raster).unwrap();
    assert_eq!(a.png_data, b.png_data);
}

#[test]
fn raster_loads_over_http() {
    let base_url = start_test_server();
    let cfg = RenderConfig {
        viewport: Viewport { width: 256, height: 128 },
        ..Default::default()
    };
    let mut renderer = new_renderer(cfg, Backend::Raster).expect("renderer");
    renderer.load_url(&base_url).expect("load");
    let png = renderer.render_png().expect("png");
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");

    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (256, 128));
    let has_text = img.pixels().any(|p| p.0 == [255, 255, 255, 255]);
    let has_background = img.pixels().any(|p| p.0 == [11, 29, 58, 255]);
    assert!(has_text, "expected glyph pixels in the text color");
    assert!(has_background, "expected background pixels");
    renderer.close().unwrap();
}

#[test]
fn raster_http_404_is_load_error() {
    let base_url = start_test_server();
    let mut renderer = new_renderer(RenderConfig::default(), Backend::Raster).unwrap();
    let err = renderer.load_url(&format!("{}/missing", base_url)).unwrap_err();
    assert!(matches!(err, Error::LoadError(_)));
}

#[cfg(feature = "cdp")]
#[test]
#[ignore] // Requires Chrome to be installed
fn cdp_renders_og_sized_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("og-template.html");
    fs::write(&input, TEMPLATE).unwrap();
    let job = RenderJob {
        input,
        output: dir.path().join("og-image.png"),
        viewport: Viewport::default(),
    };

    let shot = ogkit::render_snapshot(&job, Backend::Cdp).expect("render with chrome");
    assert_eq!((shot.width, shot.height), (1200, 630));
    assert_eq!(image::open(&job.output).unwrap().dimensions(), (1200, 630));
}
