use std::fmt;
use std::str::FromStr;

use super::error::FieldParseError;

// ---------------------------------------------------------------------------
// YesNo – the two-valued service flags
// ---------------------------------------------------------------------------

/// Value of the `online_order` / `book_table` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("yes") {
            Ok(YesNo::Yes)
        } else if s.eq_ignore_ascii_case("no") {
            Ok(YesNo::No)
        } else {
            Err("expected 'Yes' or 'No'".to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single normalised restaurant entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub online_order: YesNo,
    pub book_table: YesNo,
    /// Rating in `[0, 5]`, parsed from `"<float>/5"`.
    pub rate: f64,
    pub votes: u64,
    pub approx_cost_for_two: f64,
    pub listed_in_type: String,
}

impl Record {
    /// The textual value of a categorical column.
    pub fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::ListedInType => &self.listed_in_type,
            CategoryField::OnlineOrder => self.online_order.as_str(),
            CategoryField::BookTable => self.book_table.as_str(),
        }
    }

    /// The value of a numeric column as `f64`.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Rate => self.rate,
            NumericField::Votes => self.votes as f64,
            NumericField::Cost => self.approx_cost_for_two,
        }
    }
}

// ---------------------------------------------------------------------------
// Column selectors used by the aggregate functions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    ListedInType,
    OnlineOrder,
    BookTable,
}

impl CategoryField {
    pub fn label(self) -> &'static str {
        match self {
            CategoryField::ListedInType => "Restaurant Type",
            CategoryField::OnlineOrder => "Online Order",
            CategoryField::BookTable => "Table Booking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Rate,
    Votes,
    Cost,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [NumericField::Rate, NumericField::Votes, NumericField::Cost];

    pub fn label(self) -> &'static str {
        match self {
            NumericField::Rate => "rate",
            NumericField::Votes => "votes",
            NumericField::Cost => "approx_cost(for two people)",
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All accepted rows, in source order.
    pub records: Vec<Record>,
    /// Distinct `listed_in_type` values in first-seen order.
    pub types: Vec<String>,
    /// Rows dropped because a field failed to parse.
    pub rejected: Vec<FieldParseError>,
}

impl Dataset {
    /// Build the column index from the accepted records.
    pub fn from_records(records: Vec<Record>, rejected: Vec<FieldParseError>) -> Self {
        let mut types: Vec<String> = Vec::new();
        for r in &records {
            if !types.contains(&r.listed_in_type) {
                types.push(r.listed_in_type.clone());
            }
        }
        Dataset {
            records,
            types,
            rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(min, max)` of a numeric column over the whole dataset, `None` if empty.
    pub fn bounds(&self, field: NumericField) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.numeric(field)).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(name: &str, rate: f64, votes: u64, cost: f64, kind: &str) -> Record {
        Record {
            name: name.to_string(),
            online_order: YesNo::Yes,
            book_table: YesNo::No,
            rate,
            votes,
            approx_cost_for_two: cost,
            listed_in_type: kind.to_string(),
        }
    }

    /// The three-restaurant table used throughout the engine tests.
    pub fn abc() -> Dataset {
        let mut b = record("B", 3.0, 50, 300.0, "Delivery");
        b.online_order = YesNo::No;
        b.book_table = YesNo::Yes;
        Dataset::from_records(
            vec![
                record("A", 4.1, 10, 800.0, "Dining"),
                b,
                record("C", 4.5, 5, 600.0, "Dining"),
            ],
            Vec::new(),
        )
    }
}
