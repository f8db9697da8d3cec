//! Desktop front end for the fixed-point iteration service.
//!
//! [`SolverApp`] shows the four solver fields, a `Find Root` button, the
//! result region, and the convergence chart. Requests run on a background
//! tokio runtime and their completions are handed back to the UI thread over
//! a channel, so the window stays responsive while the service works.

use eframe::egui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints};
use fixpoint_client::{
    ChartHandle, ClientConfig, Completion, ConfigError, FormInput, Handler, HttpTransport,
    LineChart,
};
use thiserror::Error;
use tokio::{runtime::Runtime, sync::mpsc};

/// Window title.
pub const TITLE: &str = "Fixed-Point Iteration Root Finder";

/// Errors that can stop the app from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid client config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("failed to open window: {0}")]
    Window(#[from] eframe::Error),
}

/// The values the form starts with.
#[must_use]
pub fn default_form() -> FormInput {
    FormInput::new("np.sin(x) + x + 1", "2", "1e-6", "1000")
}

/// A runnable egui application that drives a [`Handler`].
pub struct SolverApp {
    form: FormInput,
    handler: Handler<HttpTransport>,
    runtime: Runtime,
    completions: mpsc::UnboundedReceiver<Completion>,
    sender: mpsc::UnboundedSender<Completion>,
}

impl SolverApp {
    /// Creates the app for the given client config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the runtime cannot start.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let handler = Handler::http(config)?;
        let runtime = Runtime::new()?;
        let (sender, completions) = mpsc::unbounded_channel();

        Ok(Self {
            form: default_form(),
            handler,
            runtime,
            completions,
            sender,
        })
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn run(self) -> Result<(), AppError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 800.0]),
            ..Default::default()
        };

        eframe::run_native(TITLE, options, Box::new(|_cc| Ok(Box::new(self))))?;
        Ok(())
    }

    fn find_root(&mut self, ctx: &egui::Context) {
        let Some(request) = self.handler.dispatch(&self.form) else {
            return;
        };

        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let completion = request.await;
            // The receiver only closes when the window does.
            let _ = sender.send(completion);
            ctx.request_repaint();
        });
    }

    fn receive(&mut self) {
        while let Ok(completion) = self.completions.try_recv() {
            self.handler.apply(completion);
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("form").num_columns(2).show(ui, |ui| {
            let fields = [
                ("f(x):", &mut self.form.function),
                ("Initial Guess (x0):", &mut self.form.x0),
                ("Tolerance:", &mut self.form.tolerance),
                ("Max Iterations:", &mut self.form.max_iterations),
            ];
            for (label, value) in fields {
                ui.label(label);
                ui.text_edit_singleline(value);
                ui.end_row();
            }
        });
    }

    fn result_ui(&self, ui: &mut egui::Ui) {
        for line in self.handler.result().lines() {
            ui.label(line);
        }
    }
}

impl eframe::App for SolverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive();

        egui::TopBottomPanel::top("inputs").show(ctx, |ui| {
            self.form_ui(ui);
            ui.horizontal(|ui| {
                let idle = !self.handler.is_in_flight();
                if ui.add_enabled(idle, egui::Button::new("Find Root")).clicked() {
                    self.find_root(ctx);
                }
                if !idle {
                    ui.spinner();
                }
            });
            ui.separator();
            self.result_ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let ChartHandle::Present { canvas, chart } = self.handler.chart() {
                chart_ui(ui, canvas, chart);
            }
        });
    }
}

fn chart_ui(ui: &mut egui::Ui, canvas: &str, chart: &LineChart) {
    let labels = chart.labels.clone();
    let points: PlotPoints = chart.points().collect();

    Plot::new(canvas)
        .legend(Legend::default())
        .x_axis_label(chart.x_axis_title)
        .y_axis_label(chart.y_axis_title)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(chart.series_title));
        });
}

/// Names whole-number ticks after their iteration; other ticks stay blank.
fn tick_label(labels: &[String], mark: GridMark) -> String {
    let value = mark.value;
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = value as usize;
    labels.get(index).cloned().unwrap_or_default()
}
