//! Ingestion of the player data file: a comma-delimited text file with a
//! header row, quoted fields (embedded commas, doubled-`""` escapes, and
//! quoted fields spanning multiple lines), and one record per row. Each
//! record is keyed by its unique `player_slug`, which is the only field the
//! trees ever compare.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::Error;

/// Columns every data file must carry.
const REQUIRED_COLUMNS: [&str; 6] = [
    "player_slug",
    "name",
    "full_name",
    "best_position",
    "overall_rating",
    "potential",
];

/// One player record. Ordering and equality consider the `slug` alone; the
/// remaining fields are payload carried through the trees.
#[derive(Debug, Clone)]
pub struct Record {
    /// Unique identifier; the sole sort key.
    pub slug: String,
    /// Short display name.
    pub name: String,
    /// Full legal name.
    pub full_name: String,
    /// Best playing position.
    pub position: String,
    /// Current overall rating. Malformed values in the file load as 0.
    pub overall: u32,
    /// Potential rating. Malformed values in the file load as 0.
    pub potential: u32,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl Eq for Record {}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slug.cmp(&other.slug)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} {}/{}",
            self.name, self.slug, self.position, self.overall, self.potential
        )
    }
}

/// Loads at most `limit` records from a CSV file on disk.
pub fn load_path<P: AsRef<Path>>(path: P, limit: usize) -> Result<Vec<Record>, Error> {
    let file = File::open(path)?;
    load(BufReader::new(file), limit)
}

/// Loads at most `limit` records from CSV text. The first row must be a
/// header naming at least the required columns (extra columns are ignored);
/// an empty input yields an empty vector. Blank rows are skipped and do not
/// count against `limit`.
pub fn load<R: BufRead>(mut reader: R, limit: usize) -> Result<Vec<Record>, Error> {
    let Some(header) = read_csv_record(&mut reader)? else {
        return Ok(Vec::new());
    };

    let mut index = HashMap::new();
    for (i, name) in split_fields(&header).into_iter().enumerate() {
        index.insert(name.trim().to_string(), i);
    }
    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *index.get(name).ok_or(Error::MissingColumn(name))?;
    }

    let mut records = Vec::new();
    while records.len() < limit {
        let Some(row) = read_csv_record(&mut reader)? else {
            break;
        };
        if row.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&row);
        let field = |i: usize| fields.get(i).copied().unwrap_or_default();

        records.push(Record {
            slug: unquote(field(columns[0])),
            name: unquote(field(columns[1])),
            full_name: unquote(field(columns[2])),
            position: unquote(field(columns[3])),
            overall: lenient_int(field(columns[4])),
            potential: lenient_int(field(columns[5])),
        });
    }

    debug!(records = records.len(), "loaded player data");
    Ok(records)
}

/// Reads one logical CSV record, joining physical lines while a quoted
/// field is still open (odd number of quotes seen so far).
fn read_csv_record<R: BufRead>(reader: &mut R) -> Result<Option<String>, Error> {
    let mut record = String::new();
    if reader.read_line(&mut record)? == 0 {
        return Ok(None);
    }
    trim_newline(&mut record);
    while record.matches('"').count() % 2 == 1 {
        let mut next = String::new();
        if reader.read_line(&mut next)? == 0 {
            break;
        }
        trim_newline(&mut next);
        record.push('\n');
        record.push_str(&next);
    }
    Ok(Some(record))
}

fn trim_newline(line: &mut String) {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
}

/// Splits a record on the commas that sit outside quoted fields.
fn split_fields(record: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in record.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&record[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&record[start..]);
    fields
}

/// Strips surrounding quotes, collapses doubled `""` escapes, and trims
/// whitespace.
fn unquote(field: &str) -> String {
    let field = field.trim();
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"").trim().to_string()
    } else {
        field.to_string()
    }
}

/// Parses a rating column; anything malformed loads as 0 rather than
/// failing the whole file.
fn lenient_int(field: &str) -> u32 {
    field.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const HEADER: &str = "player_slug,name,full_name,best_position,overall_rating,potential\n";

    fn load_str(csv: &str, limit: usize) -> Result<Vec<Record>, Error> {
        load(Cursor::new(csv), limit)
    }

    #[test]
    fn loads_plain_rows() {
        let csv = format!(
            "{HEADER}l-messi,L. Messi,Lionel Messi,RW,93,93\ncr7,Cristiano Ronaldo,Cristiano Ronaldo dos Santos,ST,92,92\n"
        );
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].slug, "l-messi");
        assert_eq!(records[0].position, "RW");
        assert_eq!(records[0].overall, 93);
        assert_eq!(records[1].name, "Cristiano Ronaldo");
    }

    #[test]
    fn respects_the_row_limit() {
        let csv = format!("{HEADER}a,A,A,ST,1,1\nb,B,B,ST,2,2\nc,C,C,ST,3,3\n");
        let records = load_str(&csv, 2).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].slug, "b");
    }

    #[test]
    fn quoted_fields_keep_their_commas() {
        let csv = format!("{HEADER}jr,Junior,\"Silva, Junior\",CM,80,85\n");
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records[0].full_name, "Silva, Junior");
    }

    #[test]
    fn doubled_quotes_unescape() {
        let csv = format!("{HEADER}nick,\"Joe \"\"Hammer\"\" Smith\",Joe Smith,GK,70,72\n");
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records[0].name, "Joe \"Hammer\" Smith");
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let csv = format!("{HEADER}jr,Junior,\"Silva\nJunior\",CM,80,85\n");
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Silva\nJunior");
    }

    #[test]
    fn malformed_ratings_load_as_zero() {
        let csv = format!("{HEADER}x,X,X,ST,not-a-number,\n");
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records[0].overall, 0);
        assert_eq!(records[0].potential, 0);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let csv = format!("{HEADER}\na,A,A,ST,1,1\n\n\nb,B,B,ST,2,2\n");
        let records = load_str(&csv, usize::MAX).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn extra_columns_are_ignored_and_order_is_free() {
        let csv = "name,club,player_slug,best_position,potential,overall_rating,full_name\n\
                   A,FCB,a,ST,90,88,Aaa Bbb\n";
        let records = load_str(csv, usize::MAX).unwrap();

        assert_eq!(records[0].slug, "a");
        assert_eq!(records[0].overall, 88);
        assert_eq!(records[0].potential, 90);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "player_slug,name,best_position,overall_rating,potential\na,A,ST,1,1\n";
        let err = load_str(csv, usize::MAX).unwrap_err();

        assert!(matches!(err, Error::MissingColumn("full_name")));
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(load_str("", usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn records_order_by_slug_alone() {
        let a = Record {
            slug: "a".into(),
            name: "Z".into(),
            full_name: "Z".into(),
            position: "ST".into(),
            overall: 99,
            potential: 99,
        };
        let b = Record {
            slug: "b".into(),
            name: "A".into(),
            full_name: "A".into(),
            position: "GK".into(),
            overall: 1,
            potential: 1,
        };
        let a_again = Record { overall: 50, ..a.clone() };

        assert!(a < b);
        assert_eq!(a, a_again);
    }
}
