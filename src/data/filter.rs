use std::collections::BTreeSet;

use super::error::CriteriaError;
use super::model::{Dataset, NumericField, Record, YesNo};

// ---------------------------------------------------------------------------
// Inclusive numeric range
// ---------------------------------------------------------------------------

/// A closed interval `[min, max]`. Construction rejects inverted or
/// non-finite bounds so a range can never silently match nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, CriteriaError> {
        for bound in [min, max] {
            if !bound.is_finite() {
                return Err(CriteriaError::NonFiniteBound(bound));
            }
        }
        if min > max {
            return Err(CriteriaError::InvertedRange { min, max });
        }
        Ok(Range { min, max })
    }

    /// The range accepting every finite value.
    pub fn unbounded() -> Self {
        Range {
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// The conjunctive predicate set built from the user's selections.
///
/// A record passes when:
/// * its `listed_in_type` is in `types` (an empty set admits nothing)
/// * `online_order` / `book_table` equal the requested value, if any
/// * `rate` and `approx_cost_for_two` fall inside their inclusive ranges
/// * `name` contains `name_query` ignoring case, if one is set
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub types: BTreeSet<String>,
    pub online_order: Option<YesNo>,
    pub book_table: Option<YesNo>,
    pub rate: Range,
    pub cost: Range,
    pub name_query: Option<String>,
}

impl FilterCriteria {
    /// Criteria admitting every record of `dataset`: all types selected, no
    /// flag constraints, and ranges spanning the dataset's own min/max.
    pub fn everything(dataset: &Dataset) -> Self {
        let span = |field| {
            dataset
                .bounds(field)
                .and_then(|(lo, hi)| Range::new(lo, hi).ok())
                .unwrap_or_else(Range::unbounded)
        };
        FilterCriteria {
            types: dataset.types.iter().cloned().collect(),
            online_order: None,
            book_table: None,
            rate: span(NumericField::Rate),
            cost: span(NumericField::Cost),
            name_query: None,
        }
    }

    /// Restrict to exactly these restaurant types.
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_online_order(mut self, value: Option<YesNo>) -> Self {
        self.online_order = value;
        self
    }

    pub fn with_book_table(mut self, value: Option<YesNo>) -> Self {
        self.book_table = value;
        self
    }

    pub fn with_rate_range(mut self, min: f64, max: f64) -> Result<Self, CriteriaError> {
        self.rate = Range::new(min, max)?;
        Ok(self)
    }

    pub fn with_cost_range(mut self, min: f64, max: f64) -> Result<Self, CriteriaError> {
        self.cost = Range::new(min, max)?;
        Ok(self)
    }

    /// Case-insensitive substring on `name`; an empty query clears it.
    pub fn with_name_query(mut self, query: &str) -> Self {
        self.name_query = (!query.is_empty()).then(|| query.to_lowercase());
        self
    }

    /// Whether `record` satisfies every active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.types.contains(&record.listed_in_type)
            && self.online_order.map_or(true, |v| v == record.online_order)
            && self.book_table.map_or(true, |v| v == record.book_table)
            && self.rate.contains(record.rate)
            && self.cost.contains(record.approx_cost_for_two)
            && self
                .name_query
                .as_deref()
                .map_or(true, |q| contains_ignore_case(&record.name, q))
    }
}

/// `needle` must already be lowercase.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The read-only result of applying criteria to a dataset: the dataset plus
/// the indices of the records that passed, in dataset order. Aggregates live
/// in [`super::aggregate`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub(crate) dataset: &'a Dataset,
    pub(crate) indices: Vec<usize>,
}

/// Apply `criteria` to every record of `dataset`.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

impl<'a> FilteredView<'a> {
    /// Apply further criteria to the records already in this view.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| criteria.matches(&self.dataset.records[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            indices,
        }
    }

    /// Positions of the passing records within the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The passing records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
