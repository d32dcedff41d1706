mod app;
mod effects;

use anyhow::anyhow;
use clipjoin_logging::{initialize, LogDestination};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    initialize(LogDestination::Both);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Clipjoin",
        options,
        Box::new(|cc| Ok(Box::new(app::ClipjoinApp::new(cc)))),
    )
    .map_err(|err| anyhow!("ui loop failed: {err}"))
}
