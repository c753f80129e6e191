#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use collage_canvas::{CanvasConfig, CollageApp};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // An explicit config file wins over the settings stored by eframe
    let config = std::env::var_os("COLLAGE_CANVAS_CONFIG").map(|path| {
        CanvasConfig::load(&path).unwrap_or_else(|err| {
            log::warn!("Ignoring config {}: {}", path.to_string_lossy(), err);
            CanvasConfig::default()
        })
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Collage Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(CollageApp::new(cc, config)))),
    )
}

// The demo host is native only; on the web the library is embedded by the page.
#[cfg(target_arch = "wasm32")]
fn main() {}
