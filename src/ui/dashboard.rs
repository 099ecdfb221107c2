use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{ACCENT, TEAL};
use crate::data::aggregate::Summary;
use crate::data::error::EmptyResultError;
use crate::data::filter::{apply, FilteredView};
use crate::data::model::{CategoryField, NumericField, Record, YesNo};
use crate::state::{AppState, Tab};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics, charts, search and summary tables for the current filters.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some((dataset, criteria)) = state.snapshot() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a restaurant CSV to begin  (File → Open…)");
        });
        return;
    };
    let view = apply(&dataset, &criteria);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            metrics_row(ui, &view);
            ui.separator();

            ui.heading("Key Insights");
            insights(ui, &view);
            ui.separator();

            ui.heading("Visualizations");
            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut state.tab, tab, tab.title());
                }
            });
            charts(ui, &view, state);
            ui.separator();

            ui.heading("Restaurant Search");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Search for a restaurant:");
                ui.add(egui::TextEdit::singleline(&mut state.search).hint_text("Enter restaurant name..."));
            });
            search_results(ui, &view, &state.search);
            ui.separator();

            ui.heading("Summary Statistics");
            ui.columns(2, |cols| {
                cols[0].strong("Numerical Summary");
                numeric_summary(&mut cols[0], &view);
                cols[1].strong("Categorical Summary");
                categorical_summary(&mut cols[1], &view);
            });
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

/// Format an aggregate, rendering an empty selection as "no data".
fn or_no_data<T>(value: Result<T, EmptyResultError>, fmt: impl FnOnce(T) -> String) -> String {
    value.map(fmt).unwrap_or_else(|_| "no data".to_string())
}

fn metrics_row(ui: &mut Ui, view: &FilteredView<'_>) {
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Restaurants", view.count().to_string());
        metric(&mut cols[1], "Average Rating", or_no_data(view.mean_rate(), |v| format!("{v:.2}")));
        metric(&mut cols[2], "Avg Cost for Two", or_no_data(view.mean_cost(), |v| format!("₹{v:.0}")));
        metric(&mut cols[3], "Total Votes", thousands(view.total_votes()));
    });
}

fn insights(ui: &mut Ui, view: &FilteredView<'_>) {
    ui.columns(2, |cols| {
        cols[0].strong("Most Popular Restaurant Type");
        cols[0].label(or_no_data(view.most_common_type(), |(kind, n)| {
            format!("{kind} with {n} restaurants")
        }));
        cols[1].strong("Most Voted Restaurant");
        cols[1].label(or_no_data(view.top_by_votes(), |r| {
            format!("{} with {} votes", r.name, thousands(r.votes))
        }));
    });
}

fn charts(ui: &mut Ui, view: &FilteredView<'_>, state: &AppState) {
    ui.columns(2, |cols| match state.tab {
        Tab::Types => {
            plot::type_distribution(&mut cols[0], view, &state.color_map);
            plot::votes_by_type(&mut cols[1], view);
        }
        Tab::Ordering => {
            plot::flag_counts(&mut cols[0], view, CategoryField::OnlineOrder, plot::ONLINE_PALETTE);
            plot::flag_counts(&mut cols[1], view, CategoryField::BookTable, plot::BOOKING_PALETTE);
        }
        Tab::RatingsCost => {
            plot::histogram(&mut cols[0], view, NumericField::Rate, 10, ACCENT);
            plot::histogram(&mut cols[1], view, NumericField::Cost, 15, TEAL);
        }
        Tab::Detailed => {
            plot::rating_box_plot(&mut cols[0], view);
            plot::cost_vs_rating(&mut cols[1], view, &state.color_map);
        }
    });
}

fn search_results(ui: &mut Ui, view: &FilteredView<'_>, query: &str) {
    if query.is_empty() {
        return;
    }
    let hits = view.search(query);
    if hits.is_empty() {
        ui.colored_label(egui::Color32::YELLOW, format!("No restaurants found matching '{query}'"));
        return;
    }
    ui.label(format!("Found {} restaurant(s) matching '{query}'", hits.len()));

    ui.push_id("search_results", |ui: &mut Ui| {
        record_table(ui, &hits);
    });
}

fn record_table(ui: &mut Ui, records: &[&Record]) {
    let check = |flag: YesNo| match flag {
        YesNo::Yes => "✅ Yes",
        YesNo::No => "❌ No",
    };
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto(), 6)
        .header(20.0, |mut header| {
            for title in ["Name", "Rating", "Votes", "Cost for Two", "Type", "Online Order", "Table Booking"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for r in records {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{}/5", r.rate));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(thousands(r.votes));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("₹{}", r.approx_cost_for_two));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&r.listed_in_type);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(check(r.online_order));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(check(r.book_table));
                    });
                });
            }
        });
}

/// The `describe()` table: one row per statistic, one column per field.
fn numeric_summary(ui: &mut Ui, view: &FilteredView<'_>) {
    let summaries: Vec<_> = NumericField::ALL
        .iter()
        .map(|&field| (field, view.describe(field)))
        .collect();
    if summaries.iter().any(|(_, s)| s.is_err()) {
        ui.label("no data");
        return;
    }
    let stats: [(&str, fn(&Summary) -> String); 8] = [
        ("count", |s| s.count.to_string()),
        ("mean", |s| format!("{:.2}", s.mean)),
        ("std", |s| s.std.map_or("–".to_string(), |v| format!("{v:.2}"))),
        ("min", |s| format!("{:.2}", s.min)),
        ("25%", |s| format!("{:.2}", s.q25)),
        ("50%", |s| format!("{:.2}", s.median)),
        ("75%", |s| format!("{:.2}", s.q75)),
        ("max", |s| format!("{:.2}", s.max)),
    ];

    ui.push_id("numeric_summary", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto())
            .columns(Column::auto(), summaries.len())
            .header(20.0, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for (field, _) in &summaries {
                    header.col(|ui: &mut Ui| {
                        ui.strong(field.label());
                    });
                }
            })
            .body(|mut body| {
                for (name, stat) in stats {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                        for (_, summary) in &summaries {
                            row.col(|ui: &mut Ui| {
                                if let Ok(s) = summary {
                                    ui.label(stat(s));
                                }
                            });
                        }
                    });
                }
            });
    });
}

fn categorical_summary(ui: &mut Ui, view: &FilteredView<'_>) {
    for field in [CategoryField::ListedInType, CategoryField::OnlineOrder, CategoryField::BookTable] {
        ui.strong(format!("{}:", field.label()));
        for (value, count) in view.group_counts(field) {
            ui.label(format!("  - {value}: {count}"));
        }
        ui.add_space(4.0);
    }
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
