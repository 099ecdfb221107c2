use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{ColorMap, ACCENT, TEAL};
use crate::data::filter::FilteredView;
use crate::data::model::{CategoryField, NumericField};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// A plot whose x axis shows `labels` at the integer positions 0, 1, 2, …
fn categorical_plot(id: &str, labels: Vec<String>, y_label: &'static str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let pos = mark.value;
            if pos < 0.0 || (pos - pos.round()).abs() > 1e-6 {
                return String::new();
            }
            labels.get(pos.round() as usize).cloned().unwrap_or_default()
        })
}

fn bars(groups: &[(&str, f64)], colors: &[Color32]) -> Vec<Bar> {
    groups
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .width(0.6)
                .name(*label)
                .fill(colors[i % colors.len()])
        })
        .collect()
}

fn labels_of<T>(groups: &[(&str, T)]) -> Vec<String> {
    groups.iter().map(|(label, _)| label.to_string()).collect()
}

// ---------------------------------------------------------------------------
// "Restaurant Types" tab
// ---------------------------------------------------------------------------

/// Number of restaurants per type.
pub fn type_distribution(ui: &mut Ui, view: &FilteredView<'_>, colors: &ColorMap) {
    let groups: Vec<(&str, f64)> = view
        .group_counts(CategoryField::ListedInType)
        .into_iter()
        .map(|(k, n)| (k, n as f64))
        .collect();
    let fills: Vec<Color32> = groups.iter().map(|(k, _)| colors.color_for(k)).collect();
    let chart = BarChart::new(bars(&groups, &fills)).name("Restaurants");

    ui.strong("Restaurant Types Distribution");
    categorical_plot("type_distribution", labels_of(&groups), "Number of Restaurants")
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Total votes per type, drawn as a line with markers.
pub fn votes_by_type(ui: &mut Ui, view: &FilteredView<'_>) {
    let groups = view.group_sum(CategoryField::ListedInType, NumericField::Votes);
    let points: Vec<[f64; 2]> = groups
        .iter()
        .enumerate()
        .map(|(i, (_, votes))| [i as f64, *votes])
        .collect();

    ui.strong("Total Votes by Restaurant Type");
    categorical_plot("votes_by_type", labels_of(&groups), "votes").show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name("votes")
                .color(ACCENT)
                .width(2.0),
        );
        plot_ui.points(Points::new(PlotPoints::from(points)).radius(4.0).color(ACCENT));
    });
}

// ---------------------------------------------------------------------------
// "Online Orders" tab
// ---------------------------------------------------------------------------

/// Yes/No availability of a service flag.
pub fn flag_counts(ui: &mut Ui, view: &FilteredView<'_>, field: CategoryField, palette: [Color32; 2]) {
    let groups: Vec<(&str, f64)> = view
        .group_counts(field)
        .into_iter()
        .map(|(k, n)| (k, n as f64))
        .collect();
    let chart = BarChart::new(bars(&groups, &palette)).name(field.label());

    ui.strong(format!("{} Availability", field.label()));
    categorical_plot(&format!("flag_{}", field.label()), labels_of(&groups), "Number of Restaurants")
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

pub const ONLINE_PALETTE: [Color32; 2] = [ACCENT, TEAL];
pub const BOOKING_PALETTE: [Color32; 2] = [
    Color32::from_rgb(0x45, 0xB7, 0xD1),
    Color32::from_rgb(0x96, 0xCE, 0xB4),
];

// ---------------------------------------------------------------------------
// "Ratings & Cost" tab
// ---------------------------------------------------------------------------

/// Equal-width histogram of a numeric column.
pub fn histogram(ui: &mut Ui, view: &FilteredView<'_>, field: NumericField, bins: usize, color: Color32) {
    ui.strong(format!("{} distribution", field.label()));
    let bins = match view.histogram(field, bins) {
        Ok(bins) => bins,
        Err(e) => {
            ui.label(e.to_string());
            return;
        }
    };
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let width = if b.upper > b.lower { b.upper - b.lower } else { 0.1 };
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(width)
                .name(format!("{:.1} – {:.1}", b.lower, b.upper))
                .fill(color)
        })
        .collect();

    Plot::new(format!("hist_{}", field.label()))
        .height(CHART_HEIGHT)
        .x_axis_label(field.label())
        .y_axis_label("Number of Restaurants")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).color(color)));
}

// ---------------------------------------------------------------------------
// "Detailed Analysis" tab
// ---------------------------------------------------------------------------

/// Rating quartiles split by online-order availability.
pub fn rating_box_plot(ui: &mut Ui, view: &FilteredView<'_>) {
    let groups = view.group_describe(CategoryField::OnlineOrder, NumericField::Rate);
    let palette = ONLINE_PALETTE;
    let plots: Vec<BoxPlot> = groups
        .iter()
        .enumerate()
        .map(|(i, (label, s))| {
            let elem = BoxElem::new(
                i as f64,
                BoxSpread::new(s.min, s.q25, s.median, s.q75, s.max),
            )
            .name(*label)
            .fill(palette[i % palette.len()].gamma_multiply(0.5))
            .whisker_width(0.4)
            .box_width(0.5);
            BoxPlot::new(vec![elem]).name(*label).color(palette[i % palette.len()])
        })
        .collect();

    ui.strong("Rating Distribution by Online Order Availability");
    categorical_plot("rating_box", labels_of(&groups), "rate").show(ui, |plot_ui| {
        for plot in plots {
            plot_ui.box_plot(plot);
        }
    });
}

/// Cost against rating, one series per restaurant type, marker size by votes.
pub fn cost_vs_rating(ui: &mut Ui, view: &FilteredView<'_>, colors: &ColorMap) {
    let max_votes = view.records().map(|r| r.votes).max().unwrap_or(0).max(1) as f64;
    let groups = view.group_counts(CategoryField::ListedInType);

    ui.strong("Cost vs Rating (Size = Votes)");
    Plot::new("cost_vs_rating")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Rating")
        .y_axis_label("Cost (₹)")
        .show(ui, |plot_ui| {
            for (kind, _) in &groups {
                let color = colors.color_for(kind);
                // egui_plot has one radius per series, so bucket by vote share.
                for (bucket, radius) in [(0.0, 2.0), (0.25, 4.0), (0.5, 6.0), (0.75, 8.0)] {
                    let points: Vec<[f64; 2]> = view
                        .records()
                        .filter(|r| r.listed_in_type == *kind)
                        .filter(|r| {
                            let share = r.votes as f64 / max_votes;
                            share >= bucket && (share < bucket + 0.25 || bucket == 0.75)
                        })
                        .map(|r| [r.rate, r.approx_cost_for_two])
                        .collect();
                    if points.is_empty() {
                        continue;
                    }
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(radius)
                            .color(color)
                            .name(*kind),
                    );
                }
            }
        });
}
