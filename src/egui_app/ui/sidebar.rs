use eframe::egui::{self, ComboBox, Frame, Margin, RichText};

use super::EguiApp;
use super::style;
use crate::egui_app::state::PickerState;

enum PickerAction {
    None,
    Activate(usize),
    Refresh,
}

impl EguiApp {
    pub(super) fn render_sidebar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(260.0)
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::same(10)),
            )
            .show(ctx, |ui| {
                let identity = self.controller.session().identity();
                ui.label(RichText::new(identity.display_name()).strong());
                ui.label(RichText::new(identity.roles_label()).color(palette.text_muted));
                ui.add_space(6.0);
                if ui.button("Logout").clicked() {
                    self.controller.logout();
                    return;
                }
                ui.separator();

                ui.label(RichText::new("Saved graphs").strong());
                match picker(ui, "saved_graph_picker", &mut self.controller.ui.saved_graphs, "Load") {
                    PickerAction::Activate(index) => self.controller.load_saved_graph(index),
                    PickerAction::Refresh => self.controller.refresh_saved_graphs(),
                    PickerAction::None => {}
                }
                ui.separator();

                ui.label(RichText::new("Country presets").strong());
                match picker(ui, "preset_picker", &mut self.controller.ui.presets, "Apply") {
                    PickerAction::Activate(index) => self.controller.apply_preset(index),
                    PickerAction::Refresh => self.controller.refresh_presets(),
                    PickerAction::None => {}
                }
                if let Some(preset) = self.controller.session().selected_preset() {
                    ui.label(
                        RichText::new(format!("Applied: {}", preset.label))
                            .color(palette.text_muted),
                    );
                }
            });
    }
}

/// Dropdown plus action button; shows the picker's message when empty.
fn picker(ui: &mut egui::Ui, id: &str, state: &mut PickerState, action: &str) -> PickerAction {
    if state.labels.is_empty() {
        let message = state.error.as_deref().unwrap_or("Nothing to show");
        ui.label(RichText::new(message).color(style::palette().text_muted));
        return if ui.small_button("Retry").clicked() {
            PickerAction::Refresh
        } else {
            PickerAction::None
        };
    }
    let selected_text = state.selected_label().unwrap_or("Select...").to_string();
    ComboBox::from_id_salt(id)
        .width(ui.available_width())
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for (index, label) in state.labels.iter().enumerate() {
                ui.selectable_value(&mut state.selected, Some(index), label);
            }
        });
    match state.selected {
        Some(index) if ui.button(action).clicked() => PickerAction::Activate(index),
        _ => PickerAction::None,
    }
}
