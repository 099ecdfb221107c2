use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::cache::{DatasetCache, SourceKey};
use crate::data::filter::FilterCriteria;
use crate::data::model::{Dataset, YesNo};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart tabs in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Types,
    Ordering,
    RatingsCost,
    Detailed,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Types, Tab::Ordering, Tab::RatingsCost, Tab::Detailed];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Types => "Restaurant Types",
            Tab::Ordering => "Online Orders",
            Tab::RatingsCost => "Ratings & Cost",
            Tab::Detailed => "Detailed Analysis",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Arc<Dataset>>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Criteria currently applied to the dataset. Always valid.
    pub criteria: Option<FilterCriteria>,

    /// Range bounds as edited in the side panel; they only reach `criteria`
    /// when they form a valid range.
    pub rate_bounds: (f64, f64),
    pub cost_bounds: (f64, f64),

    /// Why the last range edit was not applied.
    pub criteria_error: Option<String>,

    /// Text in the side panel's name filter.
    pub name_filter: String,

    /// Text in the restaurant search box.
    pub search: String,

    pub tab: Tab,

    /// Restaurant type → colour.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` through the process-wide cache and make it current.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let key = SourceKey::for_path(path)?;
        let dataset = DatasetCache::global()
            .get_or_load(&key)
            .with_context(|| format!("loading {}", path.display()))?;
        if !dataset.rejected.is_empty() {
            self.status_message = Some(format!(
                "{} malformed rows skipped",
                dataset.rejected.len()
            ));
        } else {
            self.status_message = None;
        }
        self.source = Some(key.path);
        self.set_dataset(dataset);
        Ok(())
    }

    /// Drop the cached dataset and parse the current source again.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.source.clone().context("no file loaded")?;
        DatasetCache::global().invalidate();
        self.open(&path)
    }

    /// Ingest a newly loaded dataset and reset every filter to "show all".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        let criteria = FilterCriteria::everything(&dataset);
        self.rate_bounds = (criteria.rate.min(), criteria.rate.max());
        self.cost_bounds = (criteria.cost.min(), criteria.cost.max());
        self.criteria = Some(criteria);
        self.criteria_error = None;
        self.name_filter.clear();
        self.color_map = ColorMap::new(&dataset.types);
        self.dataset = Some(dataset);
    }

    /// The dataset and criteria to render this frame. Owned copies, so the
    /// caller can keep mutating `self` while it holds a view built from them.
    pub fn snapshot(&self) -> Option<(Arc<Dataset>, FilterCriteria)> {
        Some((Arc::clone(self.dataset.as_ref()?), self.criteria.clone()?))
    }

    /// Replace the criteria with `f(criteria)`.
    fn update_criteria(&mut self, f: impl FnOnce(FilterCriteria) -> FilterCriteria) {
        if let Some(criteria) = self.criteria.take() {
            self.criteria = Some(f(criteria));
        }
    }

    /// Toggle a single restaurant type in the multi-select.
    pub fn toggle_type(&mut self, value: &str) {
        self.update_criteria(|criteria| {
            let mut types = criteria.types.clone();
            if !types.remove(value) {
                types.insert(value.to_string());
            }
            criteria.with_types(types)
        });
    }

    /// Select every restaurant type.
    pub fn select_all_types(&mut self) {
        let all = self.dataset.as_ref().map(|ds| ds.types.clone()).unwrap_or_default();
        self.update_criteria(|criteria| criteria.with_types(all));
    }

    /// Deselect every restaurant type, which hides every record.
    pub fn select_no_types(&mut self) {
        self.update_criteria(|criteria| criteria.with_types(Vec::<String>::new()));
    }

    pub fn set_online_order(&mut self, value: Option<YesNo>) {
        self.update_criteria(|criteria| criteria.with_online_order(value));
    }

    pub fn set_book_table(&mut self, value: Option<YesNo>) {
        self.update_criteria(|criteria| criteria.with_book_table(value));
    }

    /// Restrict every view to names containing `query` (ignoring case).
    pub fn set_name_filter(&mut self, query: &str) {
        self.update_criteria(|criteria| criteria.with_name_query(query));
    }

    /// Push the edited range bounds into the criteria. An invalid range is
    /// reported and leaves the previous criteria in force.
    pub fn commit_ranges(&mut self) {
        let Some(current) = self.criteria.clone() else {
            return;
        };
        let (rate_min, rate_max) = self.rate_bounds;
        let (cost_min, cost_max) = self.cost_bounds;
        let updated = current
            .with_rate_range(rate_min, rate_max)
            .context("rating range")
            .and_then(|c| c.with_cost_range(cost_min, cost_max).context("cost range"));
        match updated {
            Ok(criteria) => {
                self.criteria = Some(criteria);
                self.criteria_error = None;
            }
            Err(e) => {
                log::debug!("Rejected filter ranges: {e:#}");
                self.criteria_error = Some(format!("{e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::apply;
    use crate::data::model::{CategoryField, Record};

    fn record(name: &str, kind: &str, rate: f64, cost: f64) -> Record {
        Record {
            name: name.to_string(),
            online_order: YesNo::Yes,
            book_table: YesNo::No,
            rate,
            votes: 1,
            approx_cost_for_two: cost,
            listed_in_type: kind.to_string(),
        }
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Arc::new(Dataset::from_records(
            vec![
                record("A", "Dining", 4.1, 800.0),
                record("B", "Delivery", 3.0, 300.0),
                record("C", "Dining", 4.5, 600.0),
            ],
            Vec::new(),
        )));
        state
    }

    fn visible(state: &AppState) -> usize {
        state
            .snapshot()
            .map(|(ds, criteria)| apply(&ds, &criteria).count())
            .unwrap_or(0)
    }

    #[test]
    fn new_dataset_shows_everything() {
        let state = state();
        assert_eq!(visible(&state), 3);
        assert_eq!(state.rate_bounds, (3.0, 4.5));
        assert_eq!(state.cost_bounds, (300.0, 800.0));
    }

    #[test]
    fn type_selection_round_trip() {
        let mut state = state();
        state.toggle_type("Delivery");
        assert_eq!(visible(&state), 2);
        state.select_no_types();
        assert_eq!(visible(&state), 0);
        state.select_all_types();
        assert_eq!(visible(&state), 3);
    }

    #[test]
    fn inverted_range_keeps_previous_criteria() {
        let mut state = state();
        state.rate_bounds = (4.0, 4.5);
        state.commit_ranges();
        assert_eq!(visible(&state), 2);

        state.rate_bounds = (4.5, 4.0);
        state.commit_ranges();
        assert!(state.criteria_error.is_some());
        assert_eq!(visible(&state), 2);
    }

    #[test]
    fn flag_selectors_filter_the_view() {
        let mut state = state();
        state.set_book_table(Some(YesNo::Yes));
        assert_eq!(visible(&state), 0);
        state.set_book_table(None);
        state.set_online_order(Some(YesNo::Yes));
        state.set_name_filter("C");
        let (ds, criteria) = state.snapshot().unwrap();
        let view = apply(&ds, &criteria);
        assert_eq!(view.group_counts(CategoryField::OnlineOrder), vec![("Yes", 1)]);
    }

    #[test]
    fn open_reports_skipped_rows() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "name,online_order,book_table,rate,votes,approx_cost(for two people),listed_in(type)\n\
             A,Yes,No,4.1/5,10,800,Dining\n\
             B,No,No,NEW,0,300,Delivery\n"
        )
        .unwrap();
        file.flush().unwrap();

        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        assert_eq!(visible(&state), 1);
        assert_eq!(state.status_message.as_deref(), Some("1 malformed rows skipped"));
        state.reload().unwrap();
        assert_eq!(visible(&state), 1);
    }
}
