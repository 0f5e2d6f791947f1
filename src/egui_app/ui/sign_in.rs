use eframe::egui::{self, Frame, Margin, RichText};

use super::EguiApp;
use super::style;

impl EguiApp {
    /// Gate shown while no usable identity is in the session.
    pub(super) fn render_sign_in(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("GINI Data Playground");
                ui.add_space(8.0);
                let message = self
                    .controller
                    .ui
                    .fatal
                    .clone()
                    .unwrap_or_else(|| "Please log in first!".to_string());
                ui.label(RichText::new(message).color(style::palette().warning));
                ui.add_space(16.0);
                Frame::new()
                    .fill(palette.bg_tertiary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        let form = &mut self.controller.ui.sign_in;
                        egui::Grid::new("sign_in_grid")
                            .num_columns(2)
                            .spacing([12.0, 8.0])
                            .show(ui, |ui| {
                                ui.label("User ID");
                                ui.text_edit_singleline(&mut form.user_id);
                                ui.end_row();
                                ui.label("Name");
                                ui.text_edit_singleline(&mut form.name);
                                ui.end_row();
                                ui.label("Roles");
                                ui.text_edit_singleline(&mut form.roles)
                                    .on_hover_text("Comma separated");
                                ui.end_row();
                            });
                        if let Some(error) = &form.error {
                            ui.label(RichText::new(error).color(palette.warning));
                        }
                        ui.add_space(8.0);
                        if ui.button("Sign in").clicked() {
                            self.controller.sign_in_from_form();
                        }
                    });
            });
        });
    }
}
