use eframe::egui::{self, ComboBox, DragValue, RichText};

use super::EguiApp;
use super::style;
use crate::features::{Region, ScalarFeature};
use crate::sweep::{MAX_STEPS, MIN_STEPS};

impl EguiApp {
    pub(super) fn render_controls(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        if self.controller.ui.features.using_fallback {
            ui.label(
                RichText::new(crate::egui_app::controller::FEATURE_FALLBACK_WARNING)
                    .color(palette.warning),
            );
        }
        ui.columns(2, |columns| {
            self.render_sweep_inputs(&mut columns[0]);
            self.render_actions(&mut columns[1]);
        });
        ui.add_space(8.0);
        ui.checkbox(&mut self.controller.ui.form.advanced, "Advanced mode");
        if self.controller.ui.form.advanced {
            self.render_feature_grid(ui);
        } else {
            self.render_feature_summary(ui);
        }
    }

    fn render_sweep_inputs(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Compare feature").strong());
        let options = self.controller.ui.features.options.clone();
        let current = self.controller.ui.form.x_axis;
        let mut chosen = current;
        ComboBox::from_id_salt("compare_feature")
            .selected_text(current.map_or("No features", ScalarFeature::display_name))
            .show_ui(ui, |ui| {
                for feature in options {
                    ui.selectable_value(&mut chosen, Some(feature), feature.display_name());
                }
            });
        if chosen != current {
            if let Some(feature) = chosen {
                self.controller.select_compare_feature(feature);
            }
        }

        let form = &mut self.controller.ui.form;
        let (decimals, speed) = form
            .x_axis
            .map(|feature| {
                let spec = feature.input_spec();
                (spec.decimals, spec.step / 10.0)
            })
            .unwrap_or((2, 0.1));
        egui::Grid::new("sweep_range_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label("Min value");
                ui.add(DragValue::new(&mut form.x_min).fixed_decimals(decimals).speed(speed));
                ui.end_row();
                ui.label("Max value");
                ui.add(DragValue::new(&mut form.x_max).fixed_decimals(decimals).speed(speed));
                ui.end_row();
                ui.label("Steps");
                ui.add(DragValue::new(&mut form.steps).range(MIN_STEPS..=MAX_STEPS));
                ui.end_row();
            });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Region").strong());
        let current = self.controller.ui.form.snapshot.region();
        let mut region = current;
        ComboBox::from_id_salt("region")
            .selected_text(region.display_name())
            .show_ui(ui, |ui| {
                for option in Region::ALL {
                    ui.selectable_value(&mut region, option, option.display_name());
                }
            });
        if region != current {
            self.controller.set_region(region);
        }
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Generate Graph").clicked() {
                self.controller.generate_graph();
            }
            if ui.button("Clear Graph").clicked() {
                self.controller.clear_graph();
            }
        });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.controller.ui.form.graph_name)
                    .hint_text("Graph name")
                    .desired_width(160.0),
            );
            let can_save = self.controller.graph_data().is_some();
            if ui
                .add_enabled(can_save, egui::Button::new("Save Graph"))
                .on_disabled_hover_text("Generate a graph before saving")
                .clicked()
            {
                self.controller.save_graph();
            }
        });
    }

    fn render_feature_grid(&mut self, ui: &mut egui::Ui) {
        let mut edits = Vec::new();
        egui::Grid::new("feature_grid")
            .num_columns(4)
            .spacing([12.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for (column, feature) in ScalarFeature::ALL.into_iter().enumerate() {
                    let spec = feature.input_spec();
                    let mut value = self.controller.ui.form.snapshot.get(feature);
                    ui.label(feature.display_name()).on_hover_text(spec.help);
                    let mut drag = DragValue::new(&mut value)
                        .speed(spec.step / 10.0)
                        .fixed_decimals(spec.decimals);
                    drag = match (spec.min, spec.max) {
                        (Some(min), Some(max)) => drag.range(min..=max),
                        (Some(min), None) => drag.range(min..=f64::INFINITY),
                        (None, Some(max)) => drag.range(f64::NEG_INFINITY..=max),
                        (None, None) => drag,
                    };
                    if ui.add(drag).on_hover_text(spec.help).changed() {
                        edits.push((feature, value));
                    }
                    if column % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        for (feature, value) in edits {
            self.controller.set_feature_value(feature, value);
        }
    }

    fn render_feature_summary(&self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let snapshot = &self.controller.ui.form.snapshot;
        egui::CollapsingHeader::new("Feature values")
            .default_open(false)
            .show(ui, |ui| {
                for feature in ScalarFeature::ALL {
                    let decimals = feature.input_spec().decimals;
                    ui.label(
                        RichText::new(format!(
                            "{}: {:.*}",
                            feature.display_name(),
                            decimals,
                            snapshot.get(feature)
                        ))
                        .color(palette.text_muted),
                    );
                }
            });
    }
}
