//! egui renderer for the playground page.

mod chart;
mod controls;
mod help;
mod sidebar;
mod sign_in;
mod status_area;
pub mod style;

use eframe::egui::{self, Frame, Margin, RichText};

use crate::egui_app::controller::PlaygroundController;

/// Minimum window size that keeps the sidebar, form and chart readable.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(1100.0, 720.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: PlaygroundController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(controller: PlaygroundController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(10, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("GINI Data Playground").color(palette.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("What is the Gini index?").clicked() {
                            self.controller.ui.show_gini_help = true;
                        }
                    });
                });
            });
    }

    fn render_page(&mut self, ctx: &egui::Context) {
        self.render_top_bar(ctx);
        self.render_sidebar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_chart(ui);
                    ui.add_space(12.0);
                    self.render_controls(ui);
                });
        });
        self.render_gini_help(ctx);
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_status(ctx);
        if !self.controller.is_authenticated() || self.controller.ui.fatal.is_some() {
            self.render_sign_in(ctx);
            return;
        }
        self.render_page(ctx);
    }
}
