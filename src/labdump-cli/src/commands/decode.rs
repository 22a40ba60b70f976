//! Single-sample decode handlers

use anyhow::{Context, Result};
use labdump::{
    decode_pear_with, decode_scale_with, decode_sixtysix_with, pear_table, DenseTable, Footer,
    PearLayout, RowLabel, ScaleLayout,
};
use std::path::Path;
use tracing::info;

use super::{read_input, sixtysix_options};
use crate::cli::{DecodeCommand, OutputArgs};
use crate::config::Config;
use crate::export::write_table;
use crate::file_utils::SixtysixSample;

pub fn handle(command: DecodeCommand, config: &Config) -> Result<()> {
    match command {
        DecodeCommand::Pear {
            input,
            keep_footer,
            output,
        } => {
            let table = pear(&input, keep_footer)?;
            emit(&table, &output, config)
        }

        DecodeCommand::Scale {
            input,
            positional_rows,
            values,
            output,
        } => {
            let layout = ScaleLayout {
                row_label: if positional_rows {
                    RowLabel::Position
                } else {
                    RowLabel::LeadingFloat
                },
                value_kind: values.into(),
            };
            let table = scale(&input, &layout)?;
            emit(&table, &output, config)
        }

        DecodeCommand::Sixtysix {
            dir,
            file_a,
            file_b,
            strict,
            output,
        } => {
            let (file_a, file_b) = match (file_a, file_b, dir) {
                (Some(a), Some(b), _) => (a, b),
                (_, _, Some(dir)) => {
                    let sample = SixtysixSample::resolve(&dir)?;
                    (sample.file_a, sample.file_b)
                }
                _ => anyhow::bail!("Give a sample directory or both --a and --b"),
            };
            let table = sixtysix(&file_a, &file_b, strict)?;
            emit(&table, &output, config)
        }
    }
}

fn pear(input: &Path, keep_footer: bool) -> Result<DenseTable> {
    let data = read_input(input)?;
    let layout = PearLayout {
        footer: if keep_footer {
            Footer::None
        } else {
            Footer::default()
        },
        ..PearLayout::default()
    };

    let records = decode_pear_with(&data, &layout)
        .with_context(|| format!("Failed to decode pear dump {}", input.display()))?;
    info!(records = records.len(), "decoded {}", input.display());

    Ok(pear_table(&records))
}

fn scale(input: &Path, layout: &ScaleLayout) -> Result<DenseTable> {
    let data = read_input(input)?;
    let table = decode_scale_with(&data, layout)
        .with_context(|| format!("Failed to decode scale dump {}", input.display()))?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "decoded {}",
        input.display()
    );
    Ok(table)
}

fn sixtysix(file_a: &Path, file_b: &Path, strict: bool) -> Result<DenseTable> {
    let a = read_input(file_a)?;
    let b = read_input(file_b)?;
    let table = decode_sixtysix_with(&a, &b, &sixtysix_options(strict)).with_context(|| {
        format!(
            "Failed to join {} with {}",
            file_a.display(),
            file_b.display()
        )
    })?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "decoded {}",
        file_a.display()
    );
    Ok(table)
}

fn emit(table: &DenseTable, output: &OutputArgs, config: &Config) -> Result<()> {
    let format = config.output_format(output.format);
    write_table(table, format, output.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labdump::pear::{BODY_OFFSET, FOOTER_SENTINEL, HEADER_SENTINEL};
    use labdump::Label;
    use std::fs;

    #[test]
    fn test_pear_footer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pear1");

        let mut data = vec![HEADER_SENTINEL; BODY_OFFSET];
        data.extend_from_slice(&[0, 0, 0, 3, 0, 0, 1, 0]);
        data.extend_from_slice(&u32::from(FOOTER_SENTINEL).to_le_bytes());
        fs::write(&path, &data).unwrap();

        let table = pear(&path, false).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.row(0).unwrap(), &[3.0, 256.0]);
        assert!(pear(&path, true).is_err());
    }

    #[test]
    fn test_sixtysix_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("sixtysix.A");
        let b = dir.path().join("sixtysix.B");

        let mut index = Vec::new();
        index.extend_from_slice(&0u32.to_be_bytes());
        index.extend_from_slice(&11u32.to_be_bytes());
        index.extend_from_slice(&1u16.to_be_bytes());
        fs::write(&a, &index).unwrap();

        let mut entries = Vec::new();
        entries.extend_from_slice(&306u16.to_le_bytes());
        entries.extend_from_slice(&31u32.to_le_bytes());
        fs::write(&b, &entries).unwrap();

        let table = sixtysix(&a, &b, true).unwrap();
        assert_eq!(table.x_axis.labels, vec![Label::Float(0.0002)]);
        assert_eq!(table.y_axis.labels, vec![Label::Int(306)]);
        assert_eq!(table.get(0, 0), Some(31.0));
    }

    #[test]
    fn test_missing_input_names_file() {
        let err = scale(Path::new("/nonexistent/scale1"), &ScaleLayout::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/scale1"));
    }
}
