use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::error::{FieldParseError, LoadError};
use super::model::{Dataset, Record, YesNo};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the restaurant table from a CSV file on disk.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file)?;
    log::info!(
        "Loaded {} restaurants from {} ({} rows rejected)",
        dataset.len(),
        path.display(),
        dataset.rejected.len()
    );
    Ok(dataset)
}

/// Load the restaurant table from any CSV byte stream.
///
/// Expected header (display labels as exported from the source):
///
/// ```text
/// name,online_order,book_table,rate,votes,approx_cost(for two people),listed_in(type)
/// ```
///
/// The semantic names `approx_cost_for_two` and `listed_in_type` are accepted
/// too. Column order does not matter and extra columns are ignored.
///
/// A row whose fields fail typed parsing is dropped and reported in
/// [`Dataset::rejected`]; the load itself only fails if the input is not
/// tabular or lacks a required column.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers = reader.headers()?.clone();
    for (column, aliases) in REQUIRED_COLUMNS {
        if !aliases.iter().any(|a| headers.iter().any(|h| h == *a)) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        let row_no = i + 1;
        let raw = result?;
        match raw.into_record(row_no) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Dropping {e}");
                rejected.push(e);
            }
        }
    }

    Ok(Dataset::from_records(records, rejected))
}

// ---------------------------------------------------------------------------
// Raw row → typed Record
// ---------------------------------------------------------------------------

const REQUIRED_COLUMNS: [(&str, &[&str]); 7] = [
    ("name", &["name"]),
    ("online_order", &["online_order"]),
    ("book_table", &["book_table"]),
    ("rate", &["rate"]),
    ("votes", &["votes"]),
    ("approx_cost_for_two", &["approx_cost(for two people)", "approx_cost_for_two"]),
    ("listed_in_type", &["listed_in(type)", "listed_in_type"]),
];

/// One CSV row exactly as it appears in the file, before any typing.
#[derive(Debug, Deserialize)]
struct RawRow {
    name: String,
    online_order: String,
    book_table: String,
    rate: String,
    votes: String,
    #[serde(rename = "approx_cost(for two people)", alias = "approx_cost_for_two")]
    approx_cost_for_two: String,
    #[serde(rename = "listed_in(type)", alias = "listed_in_type")]
    listed_in_type: String,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<Record, FieldParseError> {
        let fail = |field: &'static str, value: &str, reason: String| FieldParseError {
            row,
            field,
            value: value.to_string(),
            reason,
        };

        let online_order = self
            .online_order
            .parse::<YesNo>()
            .map_err(|e| fail("online_order", &self.online_order, e))?;
        let book_table = self
            .book_table
            .parse::<YesNo>()
            .map_err(|e| fail("book_table", &self.book_table, e))?;
        let rate = parse_rate(&self.rate).map_err(|e| fail("rate", &self.rate, e))?;
        let votes = self
            .votes
            .trim()
            .parse::<u64>()
            .map_err(|e| fail("votes", &self.votes, e.to_string()))?;
        let approx_cost_for_two = parse_cost(&self.approx_cost_for_two)
            .map_err(|e| fail("approx_cost_for_two", &self.approx_cost_for_two, e))?;

        Ok(Record {
            name: self.name,
            online_order,
            book_table,
            rate,
            votes,
            approx_cost_for_two,
            listed_in_type: self.listed_in_type.trim().to_string(),
        })
    }
}

/// `"4.1/5"` → `4.1`. Only the part before the first `/` is read.
fn parse_rate(s: &str) -> Result<f64, String> {
    let numerator = s.split('/').next().unwrap_or("").trim();
    let value: f64 = numerator.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=5.0).contains(&value) {
        return Err(format!("{value} is outside 0..=5"));
    }
    Ok(value)
}

/// `"1,200"` → `1200.0`.
fn parse_cost(s: &str) -> Result<f64, String> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{value} is not a non-negative amount"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str =
        "name,online_order,book_table,rate,votes,approx_cost(for two people),listed_in(type)\n";

    fn load(body: &str) -> Result<Dataset, LoadError> {
        load_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn rate_denominator_is_discarded() {
        assert_eq!(parse_rate("4.1/5"), Ok(4.1));
        assert_eq!(parse_rate(" 3.9 /5"), Ok(3.9));
        assert_eq!(parse_rate("2.8"), Ok(2.8));
        assert!(parse_rate("NEW").is_err());
        assert!(parse_rate("-").is_err());
        assert!(parse_rate("7.0/5").is_err());
    }

    #[test]
    fn cost_accepts_thousands_separators() {
        assert_eq!(parse_cost("1,200"), Ok(1200.0));
        assert_eq!(parse_cost("800"), Ok(800.0));
        assert!(parse_cost("-5").is_err());
    }

    #[test]
    fn loads_display_labelled_columns() {
        let ds = load(
            "Jalsa,Yes,Yes,4.1/5,775,800,Buffet\n\
             \"Spice Elephant, Indiranagar\",Yes,No,4.1/5,787,\"1,200\",Dining\n",
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert!(ds.rejected.is_empty());
        assert_eq!(ds.records[0].name, "Jalsa");
        assert_eq!(ds.records[0].book_table, YesNo::Yes);
        assert_eq!(ds.records[1].name, "Spice Elephant, Indiranagar");
        assert_eq!(ds.records[1].approx_cost_for_two, 1200.0);
        assert_eq!(ds.types, vec!["Buffet", "Dining"]);
    }

    #[test]
    fn accepts_semantic_column_names_in_any_order() {
        let csv = "listed_in_type,name,rate,votes,approx_cost_for_two,online_order,book_table\n\
                   Cafes,Blue Tokai,4.4/5,300,500,No,No\n";
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].listed_in_type, "Cafes");
        assert_eq!(ds.records[0].rate, 4.4);
    }

    #[test]
    fn unparseable_rate_drops_only_that_row() {
        let ds = load(
            "A,Yes,No,4.1/5,10,800,Dining\n\
             B,No,No,NEW,0,300,Delivery\n\
             C,No,Yes,4.5/5,5,600,Dining\n",
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rejected.len(), 1);
        let err = &ds.rejected[0];
        assert_eq!(err.row, 2);
        assert_eq!(err.field, "rate");
        assert_eq!(err.value, "NEW");
        // The dropped row never contributes a category.
        assert_eq!(ds.types, vec!["Dining"]);
    }

    #[test]
    fn invalid_flag_is_a_field_error() {
        let ds = load("A,Maybe,No,4.1/5,10,800,Dining\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.rejected[0].field, "online_order");
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "name,online_order,book_table,rate,votes,listed_in(type)\nA,Yes,No,4.1/5,10,Dining\n";
        match load_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "approx_cost_for_two"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_malformed_input() {
        let result = load("A,Yes,No,4.1/5\n");
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_path(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}A,Yes,No,4.1/5,10,800,Dining\n").unwrap();
        let ds = load_path(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
    }
}
