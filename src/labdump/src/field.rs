//! Fixed-width scalar fields at known byte offsets
//!
//! A [`FieldSpec`] names one value in a dump: where it starts, what it is and
//! which byte order it uses. The kind fixes the width, so a spec can never
//! describe a 3-byte float or a 2-byte signed integer.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Numeric class and width of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U16,
    U32,
    I32,
    F32,
}

impl FieldKind {
    /// Width in bytes
    pub const fn width(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
        }
    }
}

/// Byte order of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// A decoded field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Unsigned(v) => v as f64,
            Self::Signed(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Location and interpretation of one scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub offset: usize,
    pub kind: FieldKind,
    pub endian: Endian,
}

impl FieldSpec {
    pub const fn new(offset: usize, kind: FieldKind, endian: Endian) -> Self {
        Self {
            offset,
            kind,
            endian,
        }
    }

    /// Big-endian field
    pub const fn be(offset: usize, kind: FieldKind) -> Self {
        Self::new(offset, kind, Endian::Big)
    }

    /// Little-endian field
    pub const fn le(offset: usize, kind: FieldKind) -> Self {
        Self::new(offset, kind, Endian::Little)
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// Offset one past the last byte of the field
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }

    /// Same field relative to `base` (turns record-relative specs absolute)
    #[inline]
    pub const fn at(self, base: usize) -> Self {
        Self::new(base + self.offset, self.kind, self.endian)
    }

    fn range(&self, available: usize) -> Result<std::ops::Range<usize>> {
        let out_of_range = Error::OutOfRange {
            offset: self.offset,
            len: self.width(),
            available,
        };
        match self.offset.checked_add(self.width()) {
            Some(end) if end <= available => Ok(self.offset..end),
            _ => Err(out_of_range),
        }
    }

    fn expect_kind(&self, expected: FieldKind) -> Result<()> {
        if self.kind != expected {
            return Err(Error::FieldKindMismatch {
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }

    /// Read the field from `buf`
    pub fn read(&self, buf: &[u8]) -> Result<Scalar> {
        let bytes = &buf[self.range(buf.len())?];
        Ok(match self.endian {
            Endian::Big => decode::<BigEndian>(self.kind, bytes),
            Endian::Little => decode::<LittleEndian>(self.kind, bytes),
        })
    }

    pub fn read_u16(&self, buf: &[u8]) -> Result<u16> {
        self.expect_kind(FieldKind::U16)?;
        let bytes = &buf[self.range(buf.len())?];
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u16(bytes),
            Endian::Little => LittleEndian::read_u16(bytes),
        })
    }

    pub fn read_u32(&self, buf: &[u8]) -> Result<u32> {
        self.expect_kind(FieldKind::U32)?;
        let bytes = &buf[self.range(buf.len())?];
        Ok(match self.endian {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        })
    }

    pub fn read_i32(&self, buf: &[u8]) -> Result<i32> {
        self.expect_kind(FieldKind::I32)?;
        let bytes = &buf[self.range(buf.len())?];
        Ok(match self.endian {
            Endian::Big => BigEndian::read_i32(bytes),
            Endian::Little => LittleEndian::read_i32(bytes),
        })
    }

    pub fn read_f32(&self, buf: &[u8]) -> Result<f32> {
        self.expect_kind(FieldKind::F32)?;
        let bytes = &buf[self.range(buf.len())?];
        Ok(match self.endian {
            Endian::Big => BigEndian::read_f32(bytes),
            Endian::Little => LittleEndian::read_f32(bytes),
        })
    }

    /// Write `value` at the field, converted to the field's kind
    ///
    /// Conversion uses `as` semantics: floats truncate toward zero and
    /// saturate, integers wrap to the field width.
    pub fn write(&self, buf: &mut [u8], value: Scalar) -> Result<()> {
        let range = self.range(buf.len())?;
        let bytes = &mut buf[range];
        match self.endian {
            Endian::Big => encode::<BigEndian>(self.kind, bytes, value),
            Endian::Little => encode::<LittleEndian>(self.kind, bytes, value),
        }
        Ok(())
    }

    pub fn write_u16(&self, buf: &mut [u8], value: u16) -> Result<()> {
        self.expect_kind(FieldKind::U16)?;
        let range = self.range(buf.len())?;
        match self.endian {
            Endian::Big => BigEndian::write_u16(&mut buf[range], value),
            Endian::Little => LittleEndian::write_u16(&mut buf[range], value),
        }
        Ok(())
    }

    pub fn write_u32(&self, buf: &mut [u8], value: u32) -> Result<()> {
        self.expect_kind(FieldKind::U32)?;
        let range = self.range(buf.len())?;
        match self.endian {
            Endian::Big => BigEndian::write_u32(&mut buf[range], value),
            Endian::Little => LittleEndian::write_u32(&mut buf[range], value),
        }
        Ok(())
    }

    pub fn write_i32(&self, buf: &mut [u8], value: i32) -> Result<()> {
        self.expect_kind(FieldKind::I32)?;
        let range = self.range(buf.len())?;
        match self.endian {
            Endian::Big => BigEndian::write_i32(&mut buf[range], value),
            Endian::Little => LittleEndian::write_i32(&mut buf[range], value),
        }
        Ok(())
    }

    pub fn write_f32(&self, buf: &mut [u8], value: f32) -> Result<()> {
        self.expect_kind(FieldKind::F32)?;
        let range = self.range(buf.len())?;
        match self.endian {
            Endian::Big => BigEndian::write_f32(&mut buf[range], value),
            Endian::Little => LittleEndian::write_f32(&mut buf[range], value),
        }
        Ok(())
    }
}

fn decode<B: ByteOrder>(kind: FieldKind, bytes: &[u8]) -> Scalar {
    match kind {
        FieldKind::U16 => Scalar::Unsigned(u64::from(B::read_u16(bytes))),
        FieldKind::U32 => Scalar::Unsigned(u64::from(B::read_u32(bytes))),
        FieldKind::I32 => Scalar::Signed(i64::from(B::read_i32(bytes))),
        FieldKind::F32 => Scalar::Float(f64::from(B::read_f32(bytes))),
    }
}

fn encode<B: ByteOrder>(kind: FieldKind, bytes: &mut [u8], value: Scalar) {
    match (kind, value) {
        (FieldKind::U16, Scalar::Unsigned(v)) => B::write_u16(bytes, v as u16),
        (FieldKind::U16, Scalar::Signed(v)) => B::write_u16(bytes, v as u16),
        (FieldKind::U16, Scalar::Float(v)) => B::write_u16(bytes, v as u16),
        (FieldKind::U32, Scalar::Unsigned(v)) => B::write_u32(bytes, v as u32),
        (FieldKind::U32, Scalar::Signed(v)) => B::write_u32(bytes, v as u32),
        (FieldKind::U32, Scalar::Float(v)) => B::write_u32(bytes, v as u32),
        (FieldKind::I32, Scalar::Unsigned(v)) => B::write_i32(bytes, v as i32),
        (FieldKind::I32, Scalar::Signed(v)) => B::write_i32(bytes, v as i32),
        (FieldKind::I32, Scalar::Float(v)) => B::write_i32(bytes, v as i32),
        (FieldKind::F32, value) => B::write_f32(bytes, value.as_f64() as f32),
    }
}
