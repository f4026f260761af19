use std::time::Duration;

use eframe::egui;
use egui::{Align2, Color32, FontId, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::config::{self, DEFAULT_INPUTS, DEFAULT_NEURONS, DEFAULT_OUTPUTS, TrainingForm};
use crate::dashboard::{self, StatCards, format_elapsed, format_error};
use crate::error::Precondition;
use crate::journal::Severity;
use crate::model::{self, Activation, DatasetDescriptor, NetworkTopology};
use crate::render::{self, PainterSurface, Rendered, Surface};
use crate::scheduler::{Clock, MonotonicClock, TaskHandle, date_time_label};
use crate::session::Session;
use crate::trainer::Trainer;

const NETWORK_TEST_DELAY: Duration = Duration::from_secs(1);
const SAMPLE_DATASET: &str = "data/XOR_dataset.csv";
const CANVAS_BG: Color32 = Color32::from_gray(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Dashboard,
    Network,
    Training,
    Metrics,
    Dataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrainingTab {
    Chart,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
    Network,
    Dataset,
    Training,
}

/// One editable row of the network dialog.
#[derive(Debug, Clone)]
struct LayerRow {
    neurons: String,
    activation: Activation,
}

impl LayerRow {
    fn new(neurons: usize, activation: Activation) -> Self {
        Self {
            neurons: neurons.to_string(),
            activation,
        }
    }
}

#[derive(Debug, Clone)]
struct DatasetForm {
    path: String,
    inputs: String,
    outputs: String,
    has_header: bool,
}

impl Default for DatasetForm {
    fn default() -> Self {
        Self {
            path: String::new(),
            inputs: DEFAULT_INPUTS.to_string(),
            outputs: DEFAULT_OUTPUTS.to_string(),
            has_header: true,
        }
    }
}

pub struct TrainerApp {
    session: Session,
    trainer: Trainer,
    clock: MonotonicClock,
    view: View,
    training_tab: TrainingTab,
    dialog: Option<Dialog>,
    layer_rows: Vec<LayerRow>,
    dataset_form: DatasetForm,
    training_form: TrainingForm,
    network_test: Option<TaskHandle>,
    dark: bool,
}

impl Default for TrainerApp {
    fn default() -> Self {
        Self {
            session: Session::new(),
            trainer: Trainer::new(),
            clock: MonotonicClock::new(),
            view: View::Dashboard,
            training_tab: TrainingTab::Chart,
            dialog: None,
            layer_rows: vec![
                LayerRow::new(2, Activation::Linear),
                LayerRow::new(4, Activation::Sigmoid),
                LayerRow::new(1, Activation::Sigmoid),
            ],
            dataset_form: DatasetForm::default(),
            training_form: TrainingForm::default(),
            network_test: None,
            dark: false,
        }
    }
}

impl TrainerApp {
    fn advance_timers(&mut self) {
        let now = self.clock.now();
        self.trainer
            .poll(&mut self.session, now, &mut rand::thread_rng());
        if let Some(task) = self.network_test.as_mut() {
            if task.fire_due(now) {
                self.network_test = None;
                self.session.log.success("Test finished: accuracy = 95.5%");
            }
        }
    }

    fn next_wakeup(&self) -> Option<Duration> {
        let now = self.clock.now();
        let test = self.network_test.as_ref().map(|t| t.remaining(now));
        match (self.trainer.next_tick_in(now), test) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn create_network(&mut self) {
        let built = self
            .layer_rows
            .iter()
            .fold(NetworkTopology::builder(), |b, row| {
                b.layer(config::parse_or(&row.neurons, DEFAULT_NEURONS), row.activation)
            })
            .created(date_time_label())
            .build();
        match built {
            Ok(topology) => {
                self.session.create_network(topology);
                self.dialog = None;
            }
            Err(err) => self.session.log.error(err.to_string()),
        }
    }

    fn apply_template(&mut self, name: &str) {
        match model::template(name) {
            Ok(template) => {
                self.layer_rows = template
                    .rows()
                    .into_iter()
                    .map(|(n, act)| LayerRow::new(n, act))
                    .collect();
                self.session
                    .log
                    .success(format!("Template \"{name}\" applied"));
            }
            Err(err) => self.session.log.error(err.to_string()),
        }
    }

    fn load_dataset(&mut self) {
        let form = &self.dataset_form;
        let descriptor = DatasetDescriptor {
            source: form.path.trim().to_string(),
            inputs: config::parse_or(&form.inputs, DEFAULT_INPUTS),
            outputs: config::parse_or(&form.outputs, DEFAULT_OUTPUTS),
            has_header: form.has_header,
            loaded: date_time_label(),
        };
        if self.session.load_dataset(descriptor).is_ok() {
            self.dialog = None;
        }
    }

    fn start_training(&mut self) {
        let now = self.clock.now();
        if let Err(err) = self.trainer.start(&mut self.session, now) {
            tracing::debug!("start refused: {err}");
        }
    }

    fn stop_training(&mut self) {
        let now = self.clock.now();
        self.trainer.stop(&mut self.session, now);
    }

    fn test_network(&mut self) {
        if self.session.topology.is_none() {
            let _ = self.session.refuse(Precondition::NoNetwork);
            return;
        }
        self.session.log.info("Testing network...");
        self.network_test = Some(TaskHandle::once(NETWORK_TEST_DELAY, self.clock.now()));
    }

    fn export_history(&mut self, ctx: &egui::Context) {
        if self.session.history.is_empty() {
            self.session.log.error("No results to export");
            return;
        }
        match self.session.history.to_json() {
            Ok(json) => {
                ctx.copy_text(json);
                self.session.log.success("Training history copied to clipboard");
            }
            Err(err) => self.session.log.error(format!("Export failed: {err}")),
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.dark = !self.dark;
        ctx.set_visuals(if self.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
    }

    fn draw_nav(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.heading("NN Training Visualizer");
            ui.separator();
            for (view, label) in [
                (View::Dashboard, "Dashboard"),
                (View::Network, "Network"),
                (View::Training, "Training"),
                (View::Metrics, "Metrics"),
                (View::Dataset, "Dataset"),
            ] {
                ui.selectable_value(&mut self.view, view, label);
            }
            ui.separator();
            let theme = if self.dark { "Light theme" } else { "Dark theme" };
            if ui.button(theme).clicked() {
                self.toggle_theme(ctx);
            }
        });
    }

    fn draw_actions(&mut self, ui: &mut egui::Ui) {
        ui.heading("Actions");
        if ui.button("New network...").clicked() {
            self.dialog = Some(Dialog::Network);
        }
        if ui.button("Load dataset...").clicked() {
            self.dialog = Some(Dialog::Dataset);
        }
        if ui.button("Training parameters...").clicked() {
            self.dialog = Some(Dialog::Training);
        }
        ui.separator();
        let running = self.trainer.is_running();
        if ui.add_enabled(!running, egui::Button::new("Start training")).clicked() {
            self.start_training();
        }
        if ui.add_enabled(running, egui::Button::new("Stop training")).clicked() {
            self.stop_training();
        }
        if ui.button("Test network").clicked() {
            self.test_network();
        }
        ui.separator();
        self.draw_network_info(ui);
        ui.separator();
        self.draw_dataset_info(ui);
    }

    fn draw_network_info(&self, ui: &mut egui::Ui) {
        ui.strong("Architecture");
        match &self.session.topology {
            Some(topo) => {
                for (i, layer) in topo.layers().iter().enumerate() {
                    ui.label(format!(
                        "Layer {}: {} neurons ({})",
                        i + 1,
                        layer.neurons,
                        layer.activation
                    ));
                }
                ui.small(format!("Created: {}", topo.created()));
            }
            None => {
                ui.weak("No network created");
            }
        }
    }

    fn draw_dataset_info(&self, ui: &mut egui::Ui) {
        ui.strong("Dataset");
        match &self.session.dataset {
            Some(ds) => {
                ui.label(format!("File: {}", ds.file_name()));
                ui.label(format!("Inputs: {}", ds.inputs));
                ui.label(format!("Outputs: {}", ds.outputs));
                ui.small(format!("Loaded: {}", ds.loaded));
            }
            None => {
                ui.weak("No dataset loaded");
            }
        }
    }

    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let color = if self.trainer.is_running() {
                Color32::from_rgb(0xf5, 0x9e, 0x0b)
            } else {
                Color32::from_rgb(0x10, 0xb9, 0x81)
            };
            ui.colored_label(color, "●");
            ui.label(dashboard::status_line(&self.session));
            ui.separator();
            if let Some(topo) = &self.session.topology {
                ui.label(format!("Network: {} layers", topo.layer_count()));
            }
            if let Some(ds) = &self.session.dataset {
                ui.label(format!("Dataset: {}", ds.file_name()));
            }
        });
    }

    fn draw_dashboard(&self, ui: &mut egui::Ui) {
        let cards = StatCards::from_session(&self.session);
        egui::Grid::new("stat_cards")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (name, value) in [
                    ("Network", &cards.network),
                    ("Dataset", &cards.dataset),
                    ("Current error", &cards.error),
                    ("Epoch", &cards.epoch),
                ] {
                    ui.label(name);
                    ui.strong(value);
                    ui.end_row();
                }
            });
        ui.separator();
        match &self.session.topology {
            Some(topo) => {
                ui.strong("Architecture");
                for (i, layer) in topo.layers().iter().enumerate() {
                    ui.label(format!("Layer {}: {} neurons", i + 1, layer.neurons));
                }
                if let Some(total) = cards.total_neurons {
                    ui.label(format!("Total neurons: {total}"));
                }
            }
            None => {
                ui.weak("Create a network to see its details");
            }
        }
        ui.separator();
        ui.strong("Recent activity");
        for item in self.session.activity.iter() {
            ui.horizontal(|ui| {
                ui.label(&item.message);
                ui.weak(&item.time);
            });
        }
    }

    fn draw_training(&mut self, ui: &mut egui::Ui) {
        let run = &self.session.run;
        if run.is_active() || run.current_epoch > 0 {
            ui.add(
                egui::ProgressBar::new(dashboard::progress(&self.session))
                    .show_percentage()
                    .text(format!("Epoch {} / {}", run.current_epoch, run.epoch_limit)),
            );
        }
        if run.is_active() {
            ui.label(format!(
                "Current error: {}   Min error: {}",
                format_error(run.latest_error()),
                format_error(run.min_error())
            ));
        } else {
            ui.weak("Ready to start");
        }
        ui.separator();
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.training_tab, TrainingTab::Chart, "Error chart");
            ui.selectable_value(&mut self.training_tab, TrainingTab::Logs, "Log");
        });
        match self.training_tab {
            TrainingTab::Chart => {
                if ui.button("Clear chart").clicked() {
                    self.session.clear_chart();
                }
                let samples = &self.session.run.samples;
                canvas(ui, 320.0, "Start a training run to see the error curve", |s| {
                    render::draw_error_curve(s, samples)
                });
            }
            TrainingTab::Logs => {
                if ui.button("Clear log").clicked() {
                    self.session.clear_log();
                }
                self.draw_log(ui);
            }
        }
    }

    fn draw_log(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in self.session.log.entries() {
                    ui.horizontal(|ui| {
                        ui.weak(format!("[{}]", entry.time));
                        ui.label(
                            RichText::new(&entry.message).color(severity_color(entry.severity)),
                        );
                    });
                }
            });
    }

    fn draw_network_view(&self, ui: &mut egui::Ui) {
        let topology = self.session.topology.as_ref();
        let height = ui.available_height().clamp(240.0, 640.0);
        canvas(ui, height, "No network created", |s| {
            render::draw_network(s, topology)
        });
    }

    fn draw_metrics(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let run = &self.session.run;
        egui::Grid::new("metrics").num_columns(2).show(ui, |ui| {
            ui.label("MSE");
            ui.strong(run.latest_error().map_or("-".into(), |e| format!("{e:.6}")));
            ui.end_row();
            ui.label("Min error");
            ui.strong(run.min_error().map_or("-".into(), |e| format!("{e:.6}")));
            ui.end_row();
            ui.label("Accuracy");
            ui.strong(
                self.session
                    .accuracy
                    .map_or("-".into(), |a| format!("{:.2}%", a * 100.0)),
            );
            ui.end_row();
            let scores = self.session.confusion.as_ref().and_then(|m| m.scores());
            for (label, value) in [
                ("Precision", scores.map(|s| s.precision)),
                ("Recall", scores.map(|s| s.recall)),
                ("F1 score", scores.map(|s| s.f1)),
            ] {
                ui.label(label);
                ui.strong(format_error(value));
                ui.end_row();
            }
            ui.label("Training time");
            ui.strong(format_elapsed(run.elapsed_secs));
            ui.end_row();
        });
        ui.separator();
        ui.strong("Confusion matrix");
        let matrix = self.session.confusion.as_ref();
        canvas(ui, 220.0, "Complete a training run to see the matrix", |s| {
            render::draw_confusion_matrix(s, matrix)
        });
        ui.separator();
        ui.horizontal(|ui| {
            ui.strong("Training history");
            if ui.button("Copy as JSON").clicked() {
                self.export_history(ctx);
            }
        });
        if self.session.history.is_empty() {
            ui.weak("Run a training session to build the history");
            return;
        }
        let finals: PlotPoints = self
            .session
            .history
            .iter()
            .rev()
            .enumerate()
            .map(|(i, h)| [i as f64 + 1.0, h.final_error])
            .collect();
        let mins: PlotPoints = self
            .session
            .history
            .iter()
            .rev()
            .enumerate()
            .map(|(i, h)| [i as f64 + 1.0, h.min_error])
            .collect();
        Plot::new("history_plot")
            .height(140.0)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(finals).name("Final error"));
                plot_ui.line(Line::new(mins).name("Min error"));
            });
        for entry in self.session.history.iter() {
            ui.group(|ui| {
                ui.weak(&entry.timestamp);
                ui.label(format!(
                    "Epochs: {} | Final error: {:.4} | Min: {:.4}",
                    entry.epochs_run, entry.final_error, entry.min_error
                ));
                ui.label(format!("Duration: {}", format_elapsed(entry.duration_secs)));
            });
        }
    }

    fn draw_dataset_view(&self, ui: &mut egui::Ui) {
        let Some(ds) = &self.session.dataset else {
            ui.weak("Load a dataset to see its statistics and preview");
            return;
        };
        egui::Grid::new("dataset_stats").num_columns(2).show(ui, |ui| {
            ui.label("File");
            ui.strong(ds.file_name());
            ui.end_row();
            ui.label("Inputs");
            ui.strong(ds.inputs.to_string());
            ui.end_row();
            ui.label("Outputs");
            ui.strong(ds.outputs.to_string());
            ui.end_row();
            ui.label("Header row");
            ui.strong(if ds.has_header { "yes" } else { "no" });
            ui.end_row();
            ui.label("Samples");
            ui.strong("~1000 (simulated)");
            ui.end_row();
        });
        ui.separator();
        ui.strong("Preview (first 5 lines)");
        for line in ["x1, x2, y", "0.0, 0.0, 0.0", "0.0, 1.0, 1.0", "1.0, 0.0, 1.0", "1.0, 1.0, 0.0"] {
            ui.monospace(line);
        }
    }

    fn draw_network_dialog(&mut self, ctx: &egui::Context) {
        let mut open = true;
        egui::Window::new("Network configuration")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Templates:");
                    for name in ["simple", "medium", "deep"] {
                        if ui.button(name).clicked() {
                            self.apply_template(name);
                        }
                    }
                });
                ui.separator();
                for (i, row) in self.layer_rows.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        let label = if i == 0 {
                            "Layer 1 (input)".to_string()
                        } else {
                            format!("Layer {}", i + 1)
                        };
                        ui.label(label);
                        ui.add(egui::TextEdit::singleline(&mut row.neurons).desired_width(48.0));
                        egui::ComboBox::from_id_salt(format!("act_{i}"))
                            .selected_text(row.activation.label())
                            .show_ui(ui, |ui| {
                                for a in Activation::ALL {
                                    ui.selectable_value(&mut row.activation, a, a.label());
                                }
                            });
                    });
                }
                ui.horizontal(|ui| {
                    if ui.button("Add layer").clicked() {
                        self.layer_rows.push(LayerRow::new(4, Activation::Sigmoid));
                    }
                    if ui
                        .add_enabled(self.layer_rows.len() > 1, egui::Button::new("Remove layer"))
                        .clicked()
                    {
                        self.layer_rows.pop();
                    }
                });
                ui.separator();
                if ui.button("Create").clicked() {
                    self.create_network();
                }
            });
        if !open {
            self.dialog = None;
        }
    }

    fn draw_dataset_dialog(&mut self, ctx: &egui::Context) {
        let mut open = true;
        egui::Window::new("Load dataset")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("File:");
                    ui.text_edit_singleline(&mut self.dataset_form.path);
                    if ui.button("Browse...").clicked() {
                        self.dataset_form.path = SAMPLE_DATASET.to_string();
                        self.session.log.info("File selected: XOR_dataset.csv");
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Inputs:");
                    ui.add(egui::TextEdit::singleline(&mut self.dataset_form.inputs).desired_width(48.0));
                    ui.label("Outputs:");
                    ui.add(egui::TextEdit::singleline(&mut self.dataset_form.outputs).desired_width(48.0));
                });
                ui.checkbox(&mut self.dataset_form.has_header, "First row is a header");
                if ui.button("Load").clicked() {
                    self.load_dataset();
                }
            });
        if !open {
            self.dialog = None;
        }
    }

    fn draw_training_dialog(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut save = false;
        egui::Window::new("Training parameters")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                let form = &mut self.training_form;
                egui::Grid::new("training_form").num_columns(2).show(ui, |ui| {
                    for (name, field) in [
                        ("Learning rate", &mut form.learning_rate),
                        ("Epochs", &mut form.epochs),
                        ("Batch size", &mut form.batch_size),
                        ("Momentum", &mut form.momentum),
                    ] {
                        ui.label(name);
                        ui.add(egui::TextEdit::singleline(field).desired_width(80.0));
                        ui.end_row();
                    }
                });
                ui.checkbox(&mut form.shuffle, "Shuffle samples each epoch");
                save = ui.button("Save").clicked();
            });
        if save {
            self.session.save_params(self.training_form.parse());
            self.dialog = None;
        } else if !open {
            self.dialog = None;
        }
    }
}

impl eframe::App for TrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_timers();

        egui::TopBottomPanel::top("nav").show(ctx, |ui| self.draw_nav(ui, ctx));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.draw_status_bar(ui));
        egui::SidePanel::left("actions")
            .resizable(false)
            .show(ctx, |ui| self.draw_actions(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.view {
                View::Dashboard => self.draw_dashboard(ui),
                View::Network => self.draw_network_view(ui),
                View::Training => self.draw_training(ui),
                View::Metrics => self.draw_metrics(ui, ctx),
                View::Dataset => self.draw_dataset_view(ui),
            });
        });

        match self.dialog {
            Some(Dialog::Network) => self.draw_network_dialog(ctx),
            Some(Dialog::Dataset) => self.draw_dataset_dialog(ctx),
            Some(Dialog::Training) => self.draw_training_dialog(ctx),
            None => {}
        }

        if let Some(wait) = self.next_wakeup() {
            ctx.request_repaint_after(wait);
        }
    }
}

/// Allocates a full-width drawing area and shows `placeholder` when the
/// renderer has nothing to draw.
fn canvas(
    ui: &mut egui::Ui,
    height: f32,
    placeholder: &str,
    draw: impl FnOnce(&mut dyn Surface) -> Rendered,
) {
    let size = egui::vec2(ui.available_width(), height);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 4.0, CANVAS_BG);
    if draw(&mut PainterSurface::new(&painter, rect)) == Rendered::Placeholder {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            placeholder,
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
    }
}

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Info => Color32::GRAY,
        Severity::Success => Color32::from_rgb(0x10, 0xb9, 0x81),
        Severity::Warning => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        Severity::Error => Color32::from_rgb(0xef, 0x44, 0x44),
    }
}
