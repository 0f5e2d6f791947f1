use eframe::egui::{self, RichText};
use egui_plot::{Line, Plot, PlotPoints, Polygon};

use super::EguiApp;
use super::style;

const GINI_INTRO: &str = "The Gini index measures economic inequality in a country on a \
scale from 0 to 1, where 0 is perfect equality and 1 is perfect inequality. It is \
calculated from the Lorenz curve, which plots the cumulative share of income earned by \
the cumulative share of the population.";

const AREA_DESCRIPTION: &str = "Area A lies between the Lorenz curve and the line of \
perfect equality. Area B lies between the Lorenz curve and the x-axis.";

const LORENZ_SAMPLES: usize = 40;

/// Example Lorenz curve `y = x^2.5`, sampled from 0 to 1.
fn lorenz_points() -> Vec<[f64; 2]> {
    (0..=LORENZ_SAMPLES)
        .map(|i| {
            let x = i as f64 / LORENZ_SAMPLES as f64;
            [x, x.powf(2.5)]
        })
        .collect()
}

impl EguiApp {
    pub(super) fn render_gini_help(&mut self, ctx: &egui::Context) {
        let mut open = self.controller.ui.show_gini_help;
        egui::Window::new("What is the Gini index?")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(560.0)
            .show(ctx, |ui| {
                ui.label(GINI_INTRO);
                ui.add_space(8.0);
                ui.columns(2, |columns| {
                    render_lorenz_diagram(&mut columns[0]);
                    let ui = &mut columns[1];
                    ui.label(AREA_DESCRIPTION);
                    ui.add_space(6.0);
                    ui.label("The Gini index is calculated as:");
                    ui.label(RichText::new("GINI = A / (A + B)").monospace().strong());
                });
            });
        self.controller.ui.show_gini_help = open;
    }
}

fn render_lorenz_diagram(ui: &mut egui::Ui) {
    let palette = style::palette();
    let curve = lorenz_points();
    let mut area_a = curve.clone();
    area_a.reverse();
    area_a.insert(0, [0.0, 0.0]);
    let mut area_b = curve.clone();
    area_b.push([1.0, 0.0]);
    Plot::new("lorenz_curve")
        .height(220.0)
        .data_aspect(1.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_label("Population share")
        .y_axis_label("Income share")
        .show(ui, |plot_ui| {
            plot_ui.polygon(
                Polygon::new("A", PlotPoints::from(area_a))
                    .fill_color(palette.series_marker.gamma_multiply(0.25)),
            );
            plot_ui.polygon(
                Polygon::new("B", PlotPoints::from(area_b))
                    .fill_color(palette.placeholder.gamma_multiply(0.25)),
            );
            plot_ui.line(
                Line::new("Perfect equality", PlotPoints::from(vec![[0.0, 0.0], [1.0, 1.0]]))
                    .color(palette.text_muted),
            );
            plot_ui.line(
                Line::new("Lorenz curve", PlotPoints::from(curve))
                    .color(palette.series_line)
                    .width(2.0),
            );
        });
}
