use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::apply;
use crate::data::model::YesNo;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(criteria)) = (state.dataset.clone(), state.criteria.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Restaurant types (multi-select) ----
            let header_text = format!(
                "Restaurant Types  ({}/{})",
                criteria.types.len(),
                dataset.types.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("types")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_types();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_types();
                        }
                    });

                    for kind in &dataset.types {
                        let mut checked = criteria.types.contains(kind);
                        let text = RichText::new(kind).color(state.color_map.color_for(kind));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_type(kind);
                        }
                    }
                });
            ui.separator();

            // ---- Name filter ----
            ui.strong("Name contains");
            if ui.text_edit_singleline(&mut state.name_filter).changed() {
                let query = state.name_filter.clone();
                state.set_name_filter(&query);
            }
            ui.separator();

            // ---- Yes/No selectors ----
            if let Some(choice) = yes_no_selector(ui, "Online Order", criteria.online_order) {
                state.set_online_order(choice);
            }
            if let Some(choice) = yes_no_selector(ui, "Table Booking", criteria.book_table) {
                state.set_book_table(choice);
            }
            ui.separator();

            // ---- Numeric ranges ----
            let mut changed = false;
            ui.strong("Rating Range");
            changed |= range_editor(ui, &mut state.rate_bounds, 0.0..=5.0, 0.1, 1);
            ui.strong("Cost for Two People (₹)");
            changed |= range_editor(ui, &mut state.cost_bounds, 0.0..=f64::MAX, 10.0, 0);
            if changed {
                state.commit_ranges();
            }
            if let Some(err) = &state.criteria_error {
                ui.label(RichText::new(err).color(Color32::RED));
            }
        });
}

/// A combo box offering All / Yes / No. Returns the new selection when the
/// user changed it.
fn yes_no_selector(ui: &mut Ui, label: &str, current: Option<YesNo>) -> Option<Option<YesNo>> {
    let mut selected = current;
    ui.strong(label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(selected.map_or("All", YesNo::as_str))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, None, "All");
            for value in YesNo::ALL {
                ui.selectable_value(&mut selected, Some(value), value.as_str());
            }
        });
    (selected != current).then_some(selected)
}

/// Two drag values for the inclusive bounds of a range.
fn range_editor(
    ui: &mut Ui,
    bounds: &mut (f64, f64),
    limits: std::ops::RangeInclusive<f64>,
    speed: f64,
    decimals: usize,
) -> bool {
    ui.horizontal(|ui: &mut Ui| {
        let lo = ui.add(
            egui::DragValue::new(&mut bounds.0)
                .range(limits.clone())
                .speed(speed)
                .fixed_decimals(decimals),
        );
        ui.label("to");
        let hi = ui.add(
            egui::DragValue::new(&mut bounds.1)
                .range(limits)
                .speed(speed)
                .fixed_decimals(decimals),
        );
        lo.changed() || hi.changed()
    })
    .inner
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                if let Err(e) = state.reload() {
                    log::error!("Failed to reload: {e:#}");
                    state.status_message = Some(format!("Error: {e:#}"));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some((ds, criteria)) = state.snapshot() {
            ui.label(format!(
                "{} restaurants loaded, {} visible",
                ds.len(),
                apply(&ds, &criteria).count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
