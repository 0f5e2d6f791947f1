use eframe::egui::{self, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use super::EguiApp;
use super::style;

const CHART_HEIGHT: f32 = 360.0;
const Y_AXIS_LABEL: &str = "GINI Coefficient";

/// Static curve drawn before any prediction exists.
fn placeholder_points() -> Vec<[f64; 2]> {
    const SAMPLES: [(f64, f64); 6] = [
        (1.0e6, 0.30),
        (5.0e6, 0.32),
        (1.0e7, 0.33),
        (2.2e7, 0.35),
        (5.0e7, 0.36),
        (1.0e8, 0.38),
    ];
    SAMPLES.iter().map(|&(x, y)| [x, y]).collect()
}

impl EguiApp {
    pub(super) fn render_chart(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.label(RichText::new(self.controller.chart_title()).heading());
        let series = self.controller.graph_data();
        let x_label = series.map_or("Population", |series| series.feature_name());
        Plot::new("gini_chart")
            .height(CHART_HEIGHT)
            .x_axis_label(x_label)
            .y_axis_label(Y_AXIS_LABEL)
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| match series {
                Some(series) => {
                    let points = series.points();
                    plot_ui.line(
                        Line::new(Y_AXIS_LABEL, PlotPoints::from(points.clone()))
                            .color(palette.series_line)
                            .width(2.0),
                    );
                    plot_ui.points(
                        Points::new("Predictions", points)
                            .color(palette.series_marker)
                            .radius(3.5),
                    );
                }
                None => {
                    plot_ui.line(
                        Line::new("Example", PlotPoints::from(placeholder_points()))
                            .color(palette.placeholder)
                            .width(1.5),
                    );
                }
            });
    }
}
