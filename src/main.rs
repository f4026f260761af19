use eframe::egui;
use nn_train_viz::{app::TrainerApp, logging};

fn main() -> Result<(), eframe::Error> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "NN Training Visualizer",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(TrainerApp::default()))
        }),
    )
}
