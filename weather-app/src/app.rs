//! Application state and UI for the desktop front-end.
//!
//! Requests run on a worker thread so the UI stays responsive; results come
//! back over a channel and the dialog/chart window only appears once data
//! has arrived.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui;
use weather_core::{
    CurrentConditions, capitalize, condition_emoji,
    flow::{Flow, Input, InteractionState, Reply, Report},
};

/// Result of one request, produced on the worker thread.
struct Outcome {
    state: InteractionState,
    reply: Reply,
}

struct SummaryDialog {
    city: String,
    conditions: CurrentConditions,
}

pub struct WeatherApp {
    flow: Flow,
    city_input: String,
    state: InteractionState,
    pending: Option<Receiver<Outcome>>,
    summary: Option<SummaryDialog>,
    chart: Option<egui::TextureHandle>,
    error: Option<String>,
}

impl WeatherApp {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            city_input: String::new(),
            state: InteractionState::default(),
            pending: None,
            summary: None,
            chart: None,
            error: None,
        }
    }

    /// Kick off a request on a worker thread. The single implicit session's
    /// state travels with the request and comes back with the outcome.
    fn request(&mut self, ctx: &egui::Context, report: Report) {
        if self.pending.is_some() {
            return; // one request at a time
        }

        let (tx, rx) = mpsc::channel();
        self.pending = Some(rx);

        let flow = self.flow.clone();
        let city = self.city_input.clone();
        let state = self.state;
        let ctx = ctx.clone();

        thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(err) => {
                    let _ = tx.send(Outcome {
                        state,
                        reply: Reply::Error(format!("Error: {err}")),
                    });
                    ctx.request_repaint();
                    return;
                }
            };

            let outcome = rt.block_on(async move {
                let (state, reply) = flow.step(state, Input::Select(report)).await;
                match reply {
                    Reply::AskCity => {
                        let (state, reply) = flow.step(state, Input::Text(&city)).await;
                        Outcome { state, reply }
                    }
                    reply => Outcome { state, reply },
                }
            });

            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                self.state = outcome.state;
                self.apply_reply(ctx, outcome.reply);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
            }
        }
    }

    fn apply_reply(&mut self, ctx: &egui::Context, reply: Reply) {
        match reply {
            Reply::Current(report) => {
                self.summary = Some(SummaryDialog {
                    city: report.city,
                    conditions: report.conditions,
                });
            }
            Reply::Chart { png, .. } => match chart_texture(ctx, &png) {
                Some(texture) => self.chart = Some(texture),
                None => self.error = Some("Error: could not decode the rendered chart".to_string()),
            },
            Reply::Error(text) => self.error = Some(text),
            Reply::AskCity => self.error = Some("Please enter a city name".to_string()),
            Reply::Menu => {}
        }
    }

    fn show_summary(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.summary else {
            return;
        };
        let mut open = true;

        egui::Window::new("Current weather")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "Current weather in {}:",
                            capitalize(&dialog.city)
                        ))
                        .size(22.0),
                    );
                    ui.label(
                        egui::RichText::new(format!("{:.1} °C", dialog.conditions.temperature_c))
                            .size(30.0),
                    );
                    ui.label(
                        egui::RichText::new(condition_emoji(dialog.conditions.condition_code))
                            .size(30.0),
                    );
                    ui.label(
                        egui::RichText::new(capitalize(&dialog.conditions.description)).size(22.0),
                    );
                });
            });

        if !open {
            self.summary = None;
        }
    }

    fn show_chart(&mut self, ctx: &egui::Context) {
        let Some(texture) = &self.chart else {
            return;
        };
        let mut open = true;

        egui::Window::new("Weather chart")
            .open(&mut open)
            .default_size([1000.0, 800.0])
            .show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                });
            });

        if !open {
            self.chart = None;
        }
    }

    fn show_error(&mut self, ctx: &egui::Context) {
        let Some(text) = &self.error else {
            return;
        };
        let mut open = true;

        egui::Window::new("Error")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(text);
            });

        if !open {
            self.error = None;
        }
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading("Enter city name:");
                ui.add_space(10.0);
                ui.add(
                    egui::TextEdit::singleline(&mut self.city_input)
                        .hint_text("City")
                        .desired_width(300.0),
                );
                ui.add_space(20.0);

                let busy = self.pending.is_some();
                if ui
                    .add_enabled(!busy, egui::Button::new("Current weather"))
                    .clicked()
                {
                    self.request(ctx, Report::Current);
                }
                ui.add_space(10.0);
                if ui
                    .add_enabled(!busy, egui::Button::new("Weather chart for the month"))
                    .clicked()
                {
                    self.request(ctx, Report::History);
                }

                if busy {
                    ui.add_space(10.0);
                    ui.spinner();
                }
            });
        });

        self.show_summary(ctx);
        self.show_chart(ctx);
        self.show_error(ctx);
    }
}

/// Decode the rendered PNG into an egui texture.
fn chart_texture(ctx: &egui::Context, png: &[u8]) -> Option<egui::TextureHandle> {
    let decoded = image::load_from_memory(png).ok()?;
    let rgba = decoded.to_rgba8();

    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels: Vec<egui::Color32> = rgba
        .pixels()
        .map(|p| egui::Color32::from_rgba_premultiplied(p[0], p[1], p[2], p[3]))
        .collect();

    let color_image = egui::ColorImage {
        size,
        pixels,
        source_size: egui::Vec2::new(size[0] as f32, size[1] as f32),
    };

    Some(ctx.load_texture("weather_chart", color_image, egui::TextureOptions::LINEAR))
}
