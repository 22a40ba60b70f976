//! Header and index inspection

use anyhow::{Context, Result};
use labdump::pear::survey;
use labdump::sixtysix::read_entries;
use labdump::{
    check_index, decode_pear, parse_index, Format, ScaleHeader, ScaleLayout,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use super::read_input;
use crate::file_utils::SixtysixSample;

/// Offset of the transformation key in a sixtysix File C
const KEY_OFFSET: usize = 4;

#[derive(Debug, Serialize, PartialEq)]
pub struct PearInfo {
    pub size: usize,
    pub header_sentinels: usize,
    pub header_complete: bool,
    pub footer_sentinels: usize,
    /// Pairs after stripping footer sentinel words, if the body decodes
    pub records: Option<usize>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScaleInfo {
    pub size: usize,
    pub divisor: u16,
    pub y_first: u16,
    pub y_last: u16,
    pub y_step: u16,
    pub columns: usize,
    pub declared_rows: u16,
    pub row_size: usize,
    /// Whole rows the body can hold
    pub body_rows: usize,
    /// Bytes after the last whole row
    pub leftover_bytes: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SixtysixInfo {
    pub records: usize,
    pub first_minutes: Option<f64>,
    pub last_minutes: Option<f64>,
    pub declared_entries: usize,
    pub file_b_entries: usize,
    pub distinct_columns: usize,
    pub overlaps: usize,
    pub unclaimed_bytes: usize,
    pub trailing_bytes: usize,
    pub consistent: bool,
    /// Transformation key from File C, usually `C` or `B`
    pub key: Option<char>,
}

pub fn handle(kind: Format, path: &Path, json: bool) -> Result<()> {
    match kind {
        Format::Pear => {
            let info = pear_info(&read_input(path)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_pear(path, &info);
            }
        }
        Format::Scale => {
            let info = scale_info(&read_input(path)?)
                .with_context(|| format!("Failed to read scale header of {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_scale(path, &info);
            }
        }
        Format::Sixtysix => {
            let sample = SixtysixSample::resolve(path)?;
            let a = read_input(&sample.file_a)?;
            let b = read_input(&sample.file_b)?;
            let c = sample.file_c.as_deref().map(read_input).transpose()?;
            let info = sixtysix_info(&a, &b, c.as_deref())
                .with_context(|| format!("Failed to read sixtysix index in {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_sixtysix(path, &info);
            }
        }
    }
    Ok(())
}

pub fn pear_info(data: &[u8]) -> PearInfo {
    let survey = survey(data);

    PearInfo {
        size: survey.len,
        header_sentinels: survey.header_sentinels,
        header_complete: survey.header_complete(),
        footer_sentinels: survey.footer_sentinels,
        records: decode_pear(data).ok().map(|r| r.len()),
    }
}

pub fn scale_info(data: &[u8]) -> Result<ScaleInfo> {
    let header = ScaleHeader::parse(data)?;
    let columns = header.y_labels()?.len();
    let row_size = ScaleLayout::default().row_size(columns);
    let body = data.len().saturating_sub(labdump::scale::BODY_OFFSET);

    Ok(ScaleInfo {
        size: data.len(),
        divisor: header.divisor,
        y_first: header.y_first,
        y_last: header.y_last,
        y_step: header.y_step,
        columns,
        declared_rows: header.row_count,
        row_size,
        body_rows: body / row_size,
        leftover_bytes: body % row_size,
    })
}

pub fn sixtysix_info(file_a: &[u8], file_b: &[u8], file_c: Option<&[u8]>) -> Result<SixtysixInfo> {
    let records = parse_index(file_a)?;
    let report = check_index(&records, file_b.len());

    let mut columns = BTreeSet::new();
    for (row, record) in records.iter().enumerate() {
        columns.extend(read_entries(file_b, row, record)?.into_iter().map(|e| e.column));
    }

    Ok(SixtysixInfo {
        records: records.len(),
        first_minutes: records.first().map(|r| r.minutes()),
        last_minutes: records.last().map(|r| r.minutes()),
        declared_entries: report.declared_entries,
        file_b_entries: report.file_b_entries,
        distinct_columns: columns.len(),
        overlaps: report.overlaps.len(),
        unclaimed_bytes: report.unclaimed_bytes,
        trailing_bytes: report.trailing_bytes,
        consistent: report.is_clean(),
        key: file_c.and_then(|c| c.get(KEY_OFFSET)).map(|&b| char::from(b)),
    })
}

fn print_pear(path: &Path, info: &PearInfo) {
    println!("File: {}", path.display());
    println!("Size: {} bytes", info.size);
    println!(
        "Header sentinels: {}{}",
        info.header_sentinels,
        if info.header_complete { "" } else { " (incomplete)" }
    );
    println!("Footer sentinels: {}", info.footer_sentinels);
    match info.records {
        Some(n) => println!("Records: {}", n),
        None => println!("Records: body does not decode"),
    }
}

fn print_scale(path: &Path, info: &ScaleInfo) {
    println!("File: {}", path.display());
    println!("Size: {} bytes", info.size);
    println!("Divisor: {}", info.divisor);
    println!(
        "Y axis: {}..={} step {} ({} columns)",
        info.y_first, info.y_last, info.y_step, info.columns
    );
    println!("Row size: {} bytes", info.row_size);
    println!("Rows: {} declared, {} in body", info.declared_rows, info.body_rows);
    if info.leftover_bytes > 0 {
        println!("Leftover: {} bytes after the last row", info.leftover_bytes);
    }
}

fn print_sixtysix(path: &Path, info: &SixtysixInfo) {
    println!("Sample: {}", path.display());
    println!("Index records: {}", info.records);
    if let (Some(first), Some(last)) = (info.first_minutes, info.last_minutes) {
        println!("Retention: {:.4} to {:.4} min", first, last);
    }
    println!(
        "Entries: {} declared, {} in File B",
        info.declared_entries, info.file_b_entries
    );
    println!("Distinct m/z columns: {}", info.distinct_columns);
    println!(
        "Consistency: {}",
        if info.consistent { "clean" } else { "inconsistent" }
    );
    if !info.consistent {
        println!("  Overlapping regions: {}", info.overlaps);
        println!("  Unclaimed bytes: {} ({} trailing)", info.unclaimed_bytes, info.trailing_bytes);
    }
    match info.key {
        Some(key) => println!("File C key: {}", key),
        None => println!("File C key: missing"),
    }
}
