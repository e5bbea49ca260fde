use crate::config::BatchConfig;
use crate::resolver::WardResolver;
use crate::types::{LatLon, WardInfo};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rayon::prelude::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

const WARD_COLUMNS: [&str; 7] = [
    "ward",
    "zone",
    "division",
    "subdivision",
    "assembly",
    "parliament",
    "chapter",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub invalid: usize,
}

enum RowOutcome {
    Resolved(WardInfo),
    NotFound,
    Invalid,
}

/// Input rows plus the positions of the coordinate columns.
struct PointTable {
    headers: StringRecord,
    lat_idx: usize,
    lon_idx: usize,
    records: Vec<StringRecord>,
}

pub fn run_batch(
    resolver: &WardResolver,
    config: &BatchConfig,
    input: &Path,
    output: &Path,
) -> Result<BatchSummary> {
    let reader =
        File::open(input).with_context(|| format!("Failed to open points CSV: {:?}", input))?;
    // Read and validate the input before touching the output path.
    let table = read_points(config, reader)?;
    let writer = File::create(output)
        .with_context(|| format!("Failed to create output CSV: {:?}", output))?;

    let summary = write_resolved(resolver, &table, writer)?;
    info!(
        rows = summary.rows,
        resolved = summary.resolved,
        not_found = summary.not_found,
        invalid = summary.invalid,
        "Batch resolution complete"
    );
    Ok(summary)
}

/// Copies every input row to `output` with the ward columns appended. Rows
/// that do not resolve keep empty ward columns. Output order matches input.
pub fn resolve_csv<R: Read, W: Write>(
    resolver: &WardResolver,
    config: &BatchConfig,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let table = read_points(config, input)?;
    write_resolved(resolver, &table, output)
}

fn read_points<R: Read>(config: &BatchConfig, input: R) -> Result<PointTable> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = rdr.headers()?.clone();

    let lat_idx = headers
        .iter()
        .position(|h| h == config.lat_column)
        .ok_or_else(|| anyhow!("Latitude column '{}' not found in CSV", config.lat_column))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == config.lon_column)
        .ok_or_else(|| anyhow!("Longitude column '{}' not found in CSV", config.lon_column))?;

    let records = rdr
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .context("Failed to read points CSV")?;

    Ok(PointTable {
        headers,
        lat_idx,
        lon_idx,
        records,
    })
}

fn write_resolved<W: Write>(
    resolver: &WardResolver,
    table: &PointTable,
    output: W,
) -> Result<BatchSummary> {
    let outcomes: Vec<RowOutcome> = table
        .records
        .par_iter()
        .enumerate()
        .map(
            |(row, record)| match parse_location(record, table.lat_idx, table.lon_idx) {
                Some(location) => match resolver.resolve(location) {
                    Some(info) => RowOutcome::Resolved(info),
                    None => RowOutcome::NotFound,
                },
                None => {
                    warn!(row = row + 1, "Skipping row with unparseable coordinates");
                    RowOutcome::Invalid
                }
            },
        )
        .collect();

    let mut wtr = WriterBuilder::new().from_writer(output);
    let mut out_headers = table.headers.clone();
    for column in WARD_COLUMNS {
        out_headers.push_field(column);
    }
    wtr.write_record(&out_headers)?;

    let mut summary = BatchSummary {
        rows: table.records.len(),
        ..BatchSummary::default()
    };

    for (record, outcome) in table.records.iter().zip(&outcomes) {
        let mut row = record.clone();
        match outcome {
            RowOutcome::Resolved(info) => {
                summary.resolved += 1;
                for field in [
                    info.ward.as_str(),
                    info.zone.as_str(),
                    info.division.as_str(),
                    info.subdivision.as_str(),
                    info.assembly.as_str(),
                    info.parliament.as_str(),
                    info.chapter.as_deref().unwrap_or(""),
                ] {
                    row.push_field(field);
                }
            }
            RowOutcome::NotFound | RowOutcome::Invalid => {
                if matches!(outcome, RowOutcome::Invalid) {
                    summary.invalid += 1;
                } else {
                    summary.not_found += 1;
                }
                for _ in WARD_COLUMNS {
                    row.push_field("");
                }
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(summary)
}

fn parse_location(record: &StringRecord, lat_idx: usize, lon_idx: usize) -> Option<LatLon> {
    let lat = record.get(lat_idx)?.parse::<f64>().ok()?;
    let lon = record.get(lon_idx)?.parse::<f64>().ok()?;
    let location = LatLon::new(lat, lon);
    location.is_finite().then_some(location)
}
