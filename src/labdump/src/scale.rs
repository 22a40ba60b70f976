//! Scale dumps: header-described grid of scaled rows
//!
//! The header holds 16-bit big-endian values at fixed offsets. Each body row
//! begins with the `"HH"` marker, then the retention time as a big-endian
//! float, then one raw value per y-axis label. Raw values are divided by the
//! header divisor.

use tracing::debug;

use crate::axis::{y_axis, Axis, Label};
use crate::field::{FieldKind, FieldSpec};
use crate::table::DenseTable;
use crate::{Error, Result};

/// Offset of the first body row
pub const BODY_OFFSET: usize = 0x200;

/// Row marker: ASCII "HH"
pub const ROW_MARKER: u16 = 0x4848;

const DIVISOR: FieldSpec = FieldSpec::be(0x80, FieldKind::U16);
const Y_FIRST: FieldSpec = FieldSpec::be(0x100, FieldKind::U16);
const Y_LAST: FieldSpec = FieldSpec::be(0x102, FieldKind::U16);
const Y_STEP: FieldSpec = FieldSpec::be(0x104, FieldKind::U16);
const ROW_COUNT: FieldSpec = FieldSpec::be(0x180, FieldKind::U16);

// Row-relative
const MARKER: FieldSpec = FieldSpec::be(0, FieldKind::U16);
const ROW_TIME: FieldSpec = FieldSpec::be(2, FieldKind::F32);

/// Parsed scale header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleHeader {
    pub divisor: u16,
    pub y_first: u16,
    pub y_last: u16,
    pub y_step: u16,
    /// Declared number of body rows
    pub row_count: u16,
}

impl ScaleHeader {
    /// Parse the header; a zero divisor is rejected here
    pub fn parse(data: &[u8]) -> Result<Self> {
        let divisor = DIVISOR.read_u16(data)?;
        if divisor == 0 {
            return Err(Error::DivisionByZero);
        }

        Ok(Self {
            divisor,
            y_first: Y_FIRST.read_u16(data)?,
            y_last: Y_LAST.read_u16(data)?,
            y_step: Y_STEP.read_u16(data)?,
            row_count: ROW_COUNT.read_u16(data)?,
        })
    }

    /// Y-axis labels described by the header
    pub fn y_labels(&self) -> Result<Vec<u16>> {
        y_axis(self.y_first, self.y_last, self.y_step)
    }
}

/// Source of each row's x-axis label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLabel {
    /// Big-endian `f32` right after the marker
    #[default]
    LeadingFloat,
    /// Row position; the row holds values only
    Position,
}

/// Row shape of a scale body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleLayout {
    pub row_label: RowLabel,
    /// Kind of every cell value (big-endian)
    pub value_kind: FieldKind,
}

impl Default for ScaleLayout {
    fn default() -> Self {
        Self {
            row_label: RowLabel::LeadingFloat,
            value_kind: FieldKind::I32,
        }
    }
}

impl ScaleLayout {
    fn values_start(&self) -> usize {
        match self.row_label {
            RowLabel::LeadingFloat => ROW_TIME.end(),
            RowLabel::Position => MARKER.end(),
        }
    }

    /// Bytes per row for `columns` values
    pub fn row_size(&self, columns: usize) -> usize {
        self.values_start() + columns * self.value_kind.width()
    }
}

/// Decode a scale dump with the default row layout
pub fn decode_scale(data: &[u8]) -> Result<DenseTable> {
    decode_scale_with(data, &ScaleLayout::default())
}

/// Decode a scale dump with an explicit row layout
pub fn decode_scale_with(data: &[u8], layout: &ScaleLayout) -> Result<DenseTable> {
    let header = ScaleHeader::parse(data)?;
    let y_labels = header.y_labels()?;
    let columns = y_labels.len();
    let row_size = layout.row_size(columns);
    let divisor = f64::from(header.divisor);

    debug!(
        divisor = header.divisor,
        columns,
        rows = header.row_count,
        "parsed scale header"
    );

    let declared = usize::from(header.row_count);
    let mut x_labels = Vec::with_capacity(declared);
    let mut cells = Vec::with_capacity(declared * columns);
    let mut pos = BODY_OFFSET;

    while x_labels.len() < declared {
        let remaining = data.len().saturating_sub(pos);
        if remaining < row_size {
            return Err(Error::TruncatedRecord {
                offset: pos,
                record_size: row_size,
                remaining,
            });
        }

        let marker = MARKER.at(pos).read_u16(data)?;
        if marker != ROW_MARKER {
            return Err(Error::FormatMismatch {
                offset: pos,
                expected: ROW_MARKER,
                found: marker,
            });
        }

        let label = match layout.row_label {
            RowLabel::LeadingFloat => Label::Float(f64::from(ROW_TIME.at(pos).read_f32(data)?)),
            RowLabel::Position => Label::Int(x_labels.len() as i64),
        };
        x_labels.push(label);

        let values_at = pos + layout.values_start();
        for col in 0..columns {
            let field = FieldSpec::be(col * layout.value_kind.width(), layout.value_kind);
            let raw = field.at(values_at).read(data)?;
            cells.push(raw.as_f64() / divisor);
        }

        pos += row_size;
    }

    // Padding after the declared rows is ignored; further marked rows are not
    let extra = extra_rows(data, pos, row_size);
    if extra > 0 {
        return Err(Error::CountMismatch {
            what: "scale rows",
            declared,
            parsed: declared + extra,
        });
    }

    let x_axis = Axis::new("RT (min)", x_labels);
    let y_axis = Axis::new("wavelength", y_labels.into_iter().map(Label::from).collect());
    DenseTable::from_cells(x_axis, y_axis, cells)
}

/// Whole marked rows starting at `pos`
fn extra_rows(data: &[u8], mut pos: usize, row_size: usize) -> usize {
    let mut count = 0;
    while data.len().saturating_sub(pos) >= row_size
        && MARKER.at(pos).read_u16(data).is_ok_and(|m| m == ROW_MARKER)
    {
        count += 1;
        pos += row_size;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        divisor: u16,
        y: (u16, u16, u16),
        declared_rows: u16,
        rows: Vec<(f32, Vec<i32>)>,
    }

    impl Fixture {
        fn build(&self) -> Vec<u8> {
            let mut data = vec![0u8; BODY_OFFSET];
            DIVISOR.write_u16(&mut data, self.divisor).unwrap();
            Y_FIRST.write_u16(&mut data, self.y.0).unwrap();
            Y_LAST.write_u16(&mut data, self.y.1).unwrap();
            Y_STEP.write_u16(&mut data, self.y.2).unwrap();
            ROW_COUNT.write_u16(&mut data, self.declared_rows).unwrap();

            for (time, values) in &self.rows {
                data.extend_from_slice(b"HH");
                data.extend_from_slice(&time.to_be_bytes());
                for v in values {
                    data.extend_from_slice(&v.to_be_bytes());
                }
            }
            data
        }
    }

    fn three_by_two() -> Fixture {
        Fixture {
            divisor: 1000,
            y: (200, 204, 2),
            declared_rows: 2,
            rows: vec![
                (0.5, vec![1000, -2500, 333]),
                (1.0, vec![0, 7, 123_456]),
            ],
        }
    }

    #[test]
    fn test_header_parse() {
        let data = three_by_two().build();
        let header = ScaleHeader::parse(&data).unwrap();
        assert_eq!(header.divisor, 1000);
        assert_eq!((header.y_first, header.y_last, header.y_step), (200, 204, 2));
        assert_eq!(header.row_count, 2);
        assert_eq!(header.y_labels().unwrap(), vec![200, 202, 204]);
    }

    #[test]
    fn test_decode_scales_values() {
        let fixture = three_by_two();
        let table = decode_scale(&fixture.build()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.x_axis.labels, vec![Label::Float(0.5), Label::Float(1.0)]);
        assert_eq!(table.y_axis.labels[2], Label::Int(204));

        for (row, (_, raw)) in fixture.rows.iter().enumerate() {
            for (col, &value) in raw.iter().enumerate() {
                let expected = f64::from(value) / f64::from(fixture.divisor);
                let stored = table.get(row, col).unwrap();
                assert!((stored - expected).abs() < 1e-12, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn test_zero_divisor_fails_before_rows() {
        let mut fixture = three_by_two();
        fixture.divisor = 0;
        let mut data = fixture.build();
        // Corrupt the first marker too; the divisor check must win
        data[BODY_OFFSET] = 0;
        assert_eq!(decode_scale(&data), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_bad_marker() {
        let mut data = three_by_two().build();
        let second_row = BODY_OFFSET + ScaleLayout::default().row_size(3);
        data[second_row] = b'X';
        assert_eq!(
            decode_scale(&data),
            Err(Error::FormatMismatch {
                offset: second_row,
                expected: ROW_MARKER,
                found: 0x5848
            })
        );
    }

    #[test]
    fn test_missing_rows_truncated() {
        let mut fixture = three_by_two();
        fixture.declared_rows = 3;
        assert!(matches!(
            decode_scale(&fixture.build()),
            Err(Error::TruncatedRecord { remaining: 0, .. })
        ));
    }

    #[test]
    fn test_partial_row_truncated() {
        let mut data = three_by_two().build();
        data.truncate(data.len() - 3);
        let row_size = ScaleLayout::default().row_size(3);
        assert_eq!(
            decode_scale(&data),
            Err(Error::TruncatedRecord {
                offset: BODY_OFFSET + row_size,
                record_size: row_size,
                remaining: row_size - 3
            })
        );
    }

    #[test]
    fn test_extra_rows_count_mismatch() {
        let mut fixture = three_by_two();
        fixture.declared_rows = 1;
        assert_eq!(
            decode_scale(&fixture.build()),
            Err(Error::CountMismatch {
                what: "scale rows",
                declared: 1,
                parsed: 2
            })
        );
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let fixture = three_by_two();
        let mut data = fixture.build();
        data.extend_from_slice(&[0u8; 16]);

        let table = decode_scale(&data).unwrap();
        assert_eq!(table, decode_scale(&fixture.build()).unwrap());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_single_row_then_padding() {
        let fixture = Fixture {
            divisor: 1,
            y: (5, 5, 1),
            declared_rows: 1,
            rows: vec![(0.25, vec![9])],
        };
        let mut data = fixture.build();
        data.extend_from_slice(&[0u8; 16]);

        let table = decode_scale(&data).unwrap();
        assert_eq!(table.x_axis.labels, vec![Label::Float(0.25)]);
        assert_eq!(table.row(0).unwrap(), &[9.0]);
    }

    #[test]
    fn test_partial_marker_tail_ignored() {
        // A trailing "HH" too short to be a row is padding
        let mut data = three_by_two().build();
        data.extend_from_slice(b"HH\0\0");
        assert_eq!(decode_scale(&data).unwrap().row_count(), 2);
    }

    #[test]
    fn test_invalid_axis() {
        let mut fixture = three_by_two();
        fixture.y = (204, 200, 2);
        assert!(matches!(
            decode_scale(&fixture.build()),
            Err(Error::InvalidAxis { .. })
        ));
    }

    #[test]
    fn test_short_header_out_of_range() {
        let mut data = vec![0u8; 0x90];
        DIVISOR.write_u16(&mut data, 10).unwrap();
        assert!(matches!(
            ScaleHeader::parse(&data),
            Err(Error::OutOfRange { offset: 0x100, .. })
        ));
    }

    #[test]
    fn test_position_labels_and_float_values() {
        let mut data = vec![0u8; BODY_OFFSET];
        DIVISOR.write_u16(&mut data, 4).unwrap();
        Y_FIRST.write_u16(&mut data, 1).unwrap();
        Y_LAST.write_u16(&mut data, 2).unwrap();
        Y_STEP.write_u16(&mut data, 1).unwrap();
        ROW_COUNT.write_u16(&mut data, 1).unwrap();
        data.extend_from_slice(b"HH");
        data.extend_from_slice(&2.0f32.to_be_bytes());
        data.extend_from_slice(&6.0f32.to_be_bytes());

        let layout = ScaleLayout {
            row_label: RowLabel::Position,
            value_kind: FieldKind::F32,
        };
        let table = decode_scale_with(&data, &layout).unwrap();
        assert_eq!(table.x_axis.labels, vec![Label::Int(0)]);
        assert_eq!(table.row(0).unwrap(), &[0.5, 1.5]);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let data = three_by_two().build();
        assert_eq!(decode_scale(&data).unwrap(), decode_scale(&data).unwrap());
    }
}
