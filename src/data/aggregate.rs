use super::error::{CriteriaError, EmptyResultError};
use super::filter::{contains_ignore_case, FilteredView};
use super::model::{CategoryField, NumericField, Record};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One histogram bucket: `[lower, upper)`, except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Descriptive statistics of one numeric column, as shown in the
/// "Numerical Summary" table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        Some(Summary {
            count: n,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[n - 1],
        })
    }
}

/// Linear interpolation between closest ranks on pre-sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Aggregates over a filtered view
// ---------------------------------------------------------------------------

impl<'a> FilteredView<'a> {
    /// Number of records that passed the filter.
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn mean_rate(&self) -> Result<f64, EmptyResultError> {
        self.mean(NumericField::Rate, "mean rating")
    }

    pub fn mean_cost(&self) -> Result<f64, EmptyResultError> {
        self.mean(NumericField::Cost, "mean cost")
    }

    fn mean(&self, field: NumericField, aggregate: &'static str) -> Result<f64, EmptyResultError> {
        if self.is_empty() {
            return Err(EmptyResultError::new(aggregate));
        }
        let sum: f64 = self.records().map(|r| r.numeric(field)).sum();
        Ok(sum / self.count() as f64)
    }

    /// Sum of votes; zero for an empty view.
    pub fn total_votes(&self) -> u64 {
        self.records().map(|r| r.votes).sum()
    }

    /// The restaurant type occurring most often, with its count. Ties go to
    /// the type seen first.
    pub fn most_common_type(&self) -> Result<(&'a str, usize), EmptyResultError> {
        let mut best: Option<(&'a str, usize)> = None;
        for (value, count) in self.group_counts(CategoryField::ListedInType) {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((value, count));
            }
        }
        best.ok_or(EmptyResultError::new("most common type"))
    }

    /// The record with the most votes. Ties go to the earliest record.
    pub fn top_by_votes(&self) -> Result<&'a Record, EmptyResultError> {
        let mut best: Option<&'a Record> = None;
        for record in self.records() {
            if best.map_or(true, |b| record.votes > b.votes) {
                best = Some(record);
            }
        }
        best.ok_or(EmptyResultError::new("most voted restaurant"))
    }

    /// Occurrences of each distinct value of `field`, in first-seen order.
    pub fn group_counts(&self, field: CategoryField) -> Vec<(&'a str, usize)> {
        self.group_fold(field, 0usize, |n, _| *n += 1)
    }

    /// Sum of `numeric` for each distinct value of `field`, in first-seen order.
    pub fn group_sum(&self, field: CategoryField, numeric: NumericField) -> Vec<(&'a str, f64)> {
        self.group_fold(field, 0.0, |sum, r| *sum += r.numeric(numeric))
    }

    /// Descriptive statistics of `numeric` for each distinct value of `field`.
    pub fn group_describe(
        &self,
        field: CategoryField,
        numeric: NumericField,
    ) -> Vec<(&'a str, Summary)> {
        self.group_fold(field, Vec::new(), |values, r| values.push(r.numeric(numeric)))
            .into_iter()
            .filter_map(|(key, values)| Summary::from_values(values).map(|s| (key, s)))
            .collect()
    }

    fn group_fold<T, F>(&self, field: CategoryField, init: T, mut step: F) -> Vec<(&'a str, T)>
    where
        T: Clone,
        F: FnMut(&mut T, &'a Record),
    {
        let mut groups: Vec<(&'a str, T)> = Vec::new();
        for record in self.records() {
            let key = record.category(field);
            let pos = match groups.iter().position(|(k, _)| *k == key) {
                Some(pos) => pos,
                None => {
                    groups.push((key, init.clone()));
                    groups.len() - 1
                }
            };
            step(&mut groups[pos].1, record);
        }
        groups
    }

    /// Equal-width histogram of `numeric` over the view's own [min, max].
    ///
    /// An empty view yields no bins. When every value is the same the bins
    /// collapse into a single `[v, v]` bin.
    pub fn histogram(&self, numeric: NumericField, bin_count: usize) -> Result<Vec<Bin>, CriteriaError> {
        if bin_count == 0 {
            return Err(CriteriaError::ZeroBins);
        }
        let values: Vec<f64> = self.records().map(|r| r.numeric(numeric)).collect();
        let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }) else {
            return Ok(Vec::new());
        };

        if min == max {
            return Ok(vec![Bin {
                lower: min,
                upper: max,
                count: values.len(),
            }]);
        }

        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();
        for v in values {
            let mut idx = (((v - min) / width) as usize).min(bin_count - 1);
            // The division can round across an edge; the stored bounds decide.
            while idx > 0 && v < bins[idx].lower {
                idx -= 1;
            }
            while idx + 1 < bin_count && v >= bins[idx + 1].lower {
                idx += 1;
            }
            bins[idx].count += 1;
        }
        Ok(bins)
    }

    /// Descriptive statistics of `numeric` over the whole view.
    pub fn describe(&self, numeric: NumericField) -> Result<Summary, EmptyResultError> {
        Summary::from_values(self.records().map(|r| r.numeric(numeric)).collect())
            .ok_or(EmptyResultError::new("summary statistics"))
    }

    /// Records whose name contains `query` ignoring case, in dataset order.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&'a Record> {
        let needle = query.to_lowercase();
        self.records()
            .filter(|r| contains_ignore_case(&r.name, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::model::{fixtures, Dataset, YesNo};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn dining_only_metrics() {
        let ds = fixtures::abc();
        let criteria = FilterCriteria::everything(&ds).with_types(["Dining"]);
        let view = apply(&ds, &criteria);

        assert_eq!(view.count(), 2);
        assert!(approx(view.mean_rate().unwrap(), 4.3));
        assert!(approx(view.mean_cost().unwrap(), 700.0));
        assert_eq!(view.total_votes(), 15);
        assert_eq!(view.most_common_type().unwrap(), ("Dining", 2));
        assert_eq!(view.top_by_votes().unwrap().name, "A");
    }

    #[test]
    fn search_is_case_insensitive() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        let hits: Vec<_> = view.search("b").into_iter().map(|r| r.name.as_str()).collect();
        assert_eq!(hits, vec!["B"]);
        assert_eq!(view.search("").len(), 3);
        assert!(view.search("zzz").is_empty());
    }

    #[test]
    fn search_only_sees_filtered_records() {
        let ds = fixtures::abc();
        let criteria = FilterCriteria::everything(&ds).with_types(["Dining"]);
        let view = apply(&ds, &criteria);

        assert!(view.search("b").is_empty());
        let hits: Vec<_> = view.search("").into_iter().map(|r| r.name.as_str()).collect();
        assert_eq!(hits, vec!["A", "C"]);
    }

    #[test]
    fn out_of_range_rating_signals_empty() {
        let ds = fixtures::abc();
        let criteria = FilterCriteria::everything(&ds).with_rate_range(5.0, 5.0).unwrap();
        let view = apply(&ds, &criteria);

        assert_eq!(view.count(), 0);
        assert_eq!(view.mean_rate(), Err(EmptyResultError::new("mean rating")));
        assert!(view.mean_cost().is_err());
        assert!(view.most_common_type().is_err());
        assert!(view.top_by_votes().is_err());
        assert!(view.describe(NumericField::Rate).is_err());
        assert_eq!(view.total_votes(), 0);
        assert!(view.group_counts(CategoryField::ListedInType).is_empty());
        assert!(view.histogram(NumericField::Rate, 10).unwrap().is_empty());
    }

    #[test]
    fn ties_go_to_first_seen() {
        let ds = Dataset::from_records(
            vec![
                fixtures::record("X", 4.0, 7, 100.0, "Cafes"),
                fixtures::record("Y", 4.0, 9, 100.0, "Buffet"),
                fixtures::record("Z", 4.0, 9, 100.0, "Buffet"),
                fixtures::record("W", 4.0, 1, 100.0, "Cafes"),
            ],
            Vec::new(),
        );
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        assert_eq!(view.most_common_type().unwrap(), ("Cafes", 2));
        assert_eq!(view.top_by_votes().unwrap().name, "Y");
    }

    #[test]
    fn group_counts_follow_first_seen_order_and_sum_to_count() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        for field in [CategoryField::ListedInType, CategoryField::OnlineOrder, CategoryField::BookTable] {
            let total: usize = view.group_counts(field).iter().map(|(_, n)| n).sum();
            assert_eq!(total, view.count());
        }
        assert_eq!(
            view.group_counts(CategoryField::ListedInType),
            vec![("Dining", 2), ("Delivery", 1)]
        );
        assert_eq!(
            view.group_counts(CategoryField::OnlineOrder),
            vec![(YesNo::Yes.as_str(), 2), (YesNo::No.as_str(), 1)]
        );
    }

    #[test]
    fn group_sum_totals_votes_per_type() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));
        assert_eq!(
            view.group_sum(CategoryField::ListedInType, NumericField::Votes),
            vec![("Dining", 15.0), ("Delivery", 50.0)]
        );
    }

    #[test]
    fn histogram_counts_every_record_once() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        let bins = view.histogram(NumericField::Rate, 3).unwrap();
        assert_eq!(bins.len(), 3);
        assert!(approx(bins[0].lower, 3.0));
        assert!(approx(bins[2].upper, 4.5));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), view.count());
        // 4.5 is the maximum and lands in the closed last bin.
        assert_eq!(bins[2].count, 2);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn histogram_bins_contain_the_values_they_count() {
        let ds = Dataset::from_records(
            vec![
                fixtures::record("X", 3.0, 1, 100.0, "Cafes"),
                fixtures::record("Y", 3.3, 1, 100.0, "Cafes"),
                fixtures::record("Z", 4.5, 1, 100.0, "Cafes"),
            ],
            Vec::new(),
        );
        let view = apply(&ds, &FilterCriteria::everything(&ds));
        let bins = view.histogram(NumericField::Rate, 10).unwrap();
        assert_eq!(bins.len(), 10);

        let last = bins.len() - 1;
        for (i, bin) in bins.iter().enumerate() {
            let inside = view
                .records()
                .filter(|r| bin.lower <= r.rate && (r.rate < bin.upper || (i == last && r.rate <= bin.upper)))
                .count();
            assert_eq!(bin.count, inside, "bin {i} [{}, {}) miscounted", bin.lower, bin.upper);
        }
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn histogram_collapses_single_value() {
        let ds = fixtures::abc();
        let criteria = FilterCriteria::everything(&ds).with_types(["Delivery"]);
        let view = apply(&ds, &criteria);

        let bins = view.histogram(NumericField::Cost, 15).unwrap();
        assert_eq!(
            bins,
            vec![Bin {
                lower: 300.0,
                upper: 300.0,
                count: 1
            }]
        );
    }

    #[test]
    fn histogram_rejects_zero_bins() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));
        assert_eq!(view.histogram(NumericField::Rate, 0), Err(CriteriaError::ZeroBins));
    }

    #[test]
    fn describe_matches_hand_computed_quartiles() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        let votes = view.describe(NumericField::Votes).unwrap();
        assert_eq!(votes.count, 3);
        assert!(approx(votes.mean, 65.0 / 3.0));
        assert_eq!(votes.min, 5.0);
        assert!(approx(votes.q25, 7.5));
        assert_eq!(votes.median, 10.0);
        assert!(approx(votes.q75, 30.0));
        assert_eq!(votes.max, 50.0);
        assert!(votes.std.is_some());
    }

    #[test]
    fn group_describe_splits_by_flag() {
        let ds = fixtures::abc();
        let view = apply(&ds, &FilterCriteria::everything(&ds));

        let by_online = view.group_describe(CategoryField::OnlineOrder, NumericField::Rate);
        assert_eq!(by_online.len(), 2);
        assert_eq!(by_online[0].0, "Yes");
        assert!(approx(by_online[0].1.median, 4.3));
        assert_eq!(by_online[1].1.count, 1);
        assert_eq!(by_online[1].1.std, None);
    }
}
