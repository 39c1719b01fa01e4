//! Reading benchmark results from CSV into a grouped, sorted dataset.

use std::{fs::File, io::Read, path::Path};

use csv::{Reader, StringRecord};
use indexmap::IndexMap;

use crate::core::error::{Result, SortplotErrorKind};

pub const ALGORITHM_COLUMN: &str = "algorithm";
pub const SIZE_COLUMN: &str = "n";
pub const DISTRIBUTION_COLUMN: &str = "distribution";
pub const TIME_COLUMN: &str = "time_ms";

/// One benchmark observation, i.e. one row of results.csv
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub algorithm: String,
    pub n: u64,
    pub distribution: String,
    pub time_ms: f64,
}

/// A single (n, time_ms) sample of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub n: u64,
    pub time_ms: f64,
}

/// Points of one algorithm, sorted by `n`
pub type Series = Vec<Point>;

/// Series for each algorithm in one distribution, in first-seen order
pub type AlgorithmSeries = IndexMap<String, Series>;

/// distribution -> algorithm -> points sorted ascending by `n`.
///
/// Keys keep the order in which they first appeared in the input. Points with
/// equal `n` are all kept, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedDataset {
    distributions: IndexMap<String, AlgorithmSeries>,
}

impl GroupedDataset {
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut distributions: IndexMap<String, AlgorithmSeries> = IndexMap::new();

        for record in records {
            distributions
                .entry(record.distribution)
                .or_default()
                .entry(record.algorithm)
                .or_default()
                .push(Point {
                    n: record.n,
                    time_ms: record.time_ms,
                });
        }

        // sort_by_key is stable, so ties stay in input order
        for series in distributions.values_mut().flat_map(|algs| algs.values_mut()) {
            series.sort_by_key(|point| point.n);
        }

        Self { distributions }
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    /// Number of distinct distributions
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    /// Total number of points across every series
    pub fn point_count(&self) -> usize {
        self.distributions
            .values()
            .flat_map(|algs| algs.values())
            .map(Vec::len)
            .sum()
    }

    pub fn distributions(&self) -> impl Iterator<Item = (&str, &AlgorithmSeries)> {
        self.distributions
            .iter()
            .map(|(name, algs)| (name.as_str(), algs))
    }

    pub fn distribution(&self, distribution: &str) -> Option<&AlgorithmSeries> {
        self.distributions.get(distribution)
    }

    pub fn series(&self, distribution: &str, algorithm: &str) -> Option<&[Point]> {
        self.distribution(distribution)?
            .get(algorithm)
            .map(Vec::as_slice)
    }
}

/// Positions of the required columns within the header row
struct ColumnIndex {
    algorithm: usize,
    n: usize,
    distribution: usize,
    time_ms: usize,
}

impl ColumnIndex {
    /// A header name that appears twice resolves to its last column
    fn from_headers(headers: &StringRecord, source: &Path) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == column)
                .map(|(index, _)| index)
                .last()
                .ok_or_else(|| SortplotErrorKind::MissingColumn {
                    column: column.to_string(),
                    path: source.to_path_buf(),
                })
        };

        Ok(Self {
            algorithm: find(ALGORITHM_COLUMN)?,
            n: find(SIZE_COLUMN)?,
            distribution: find(DISTRIBUTION_COLUMN)?,
            time_ms: find(TIME_COLUMN)?,
        })
    }
}

/// Read results.csv and group its rows by distribution and algorithm
pub fn load_results(csv_path: &Path) -> Result<GroupedDataset> {
    let file = File::open(csv_path)?;
    let dataset = read_grouped(file, csv_path)?;

    tracing::debug!(
        "Read {} point(s) in {} distribution(s) from: {}",
        dataset.point_count(),
        dataset.len(),
        csv_path.display()
    );
    Ok(dataset)
}

/// Same as [`load_results`], for CSV data that does not live in a file
pub fn load_from_reader<R: Read>(reader: R) -> Result<GroupedDataset> {
    read_grouped(reader, Path::new("<input>"))
}

fn read_grouped<R: Read>(source: R, source_name: &Path) -> Result<GroupedDataset> {
    let records = read_records(source, source_name)?;
    Ok(GroupedDataset::from_records(records))
}

fn read_records<R: Read>(source: R, source_name: &Path) -> Result<Vec<Record>> {
    let mut reader = Reader::from_reader(source);
    let headers = reader.headers()?.clone();

    // No header at all means no data, not a malformed file
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let columns = ColumnIndex::from_headers(&headers, source_name)?;
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);
        records.push(parse_record(&row, &columns, line)?);
    }

    Ok(records)
}

fn parse_record(row: &StringRecord, columns: &ColumnIndex, line: u64) -> Result<Record> {
    let field = |index: usize| row.get(index).unwrap_or("");

    let raw_n = field(columns.n);
    let n = raw_n
        .trim()
        .parse::<u64>()
        .map_err(|_| SortplotErrorKind::InvalidSize {
            value: raw_n.to_string(),
            line,
        })?;

    let raw_time = field(columns.time_ms);
    let time_ms = raw_time
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|time| time.is_finite() && *time >= 0.0)
        .ok_or_else(|| SortplotErrorKind::InvalidTime {
            value: raw_time.to_string(),
            line,
        })?;

    Ok(Record {
        algorithm: field(columns.algorithm).to_string(),
        n,
        distribution: field(columns.distribution).to_string(),
        time_ms,
    })
}
