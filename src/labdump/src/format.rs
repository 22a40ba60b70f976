//! Known dump formats and a single decode entry point

use std::fmt;
use std::str::FromStr;

use crate::pear::PearTrace;
use crate::table::DenseTable;
use crate::{decode_scale, decode_sixtysix_with, Error, Result, SixtysixOptions};

/// Instrument dump format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Pear,
    Scale,
    Sixtysix,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Pear, Format::Scale, Format::Sixtysix];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pear => "pear",
            Self::Scale => "scale",
            Self::Sixtysix => "sixtysix",
        }
    }

    /// Number of raw buffers one sample needs
    pub fn input_count(self) -> usize {
        match self {
            Self::Pear | Self::Scale => 1,
            Self::Sixtysix => 2,
        }
    }

    /// Guess the format from a file or sample name (`pear3`, `sixtysix.A`, ...)
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| lower.starts_with(format.name()))
    }

    /// Decode one sample; `inputs` are File A then File B for sixtysix
    pub fn decode(self, inputs: &[&[u8]], options: &SixtysixOptions) -> Result<DenseTable> {
        if inputs.len() != self.input_count() {
            return Err(Error::CountMismatch {
                what: "input files",
                declared: self.input_count(),
                parsed: inputs.len(),
            });
        }

        match self {
            Self::Pear => Ok(PearTrace::decode(inputs[0])?.into_table()),
            Self::Scale => decode_scale(inputs[0]),
            Self::Sixtysix => decode_sixtysix_with(inputs[0], inputs[1], options),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown format '{}' (expected pear, scale or sixtysix)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("pear".parse::<Format>().unwrap(), Format::Pear);
        assert_eq!("SixtySix".parse::<Format>().unwrap(), Format::Sixtysix);
        assert!("plum".parse::<Format>().is_err());
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(Format::from_file_name("pear12"), Some(Format::Pear));
        assert_eq!(Format::from_file_name("Scale_3"), Some(Format::Scale));
        assert_eq!(Format::from_file_name("sixtysix.A"), Some(Format::Sixtysix));
        assert_eq!(Format::from_file_name("notes.txt"), None);
    }

    #[test]
    fn test_decode_checks_input_count() {
        let empty: &[u8] = &[];
        let err = Format::Sixtysix
            .decode(&[empty], &SixtysixOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::CountMismatch {
                what: "input files",
                declared: 2,
                parsed: 1
            }
        );
    }

    #[test]
    fn test_decode_pear_dispatch() {
        let mut data = vec![crate::pear::HEADER_SENTINEL; crate::pear::BODY_OFFSET];
        data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 2]);
        let table = Format::Pear
            .decode(&[data.as_slice()], &SixtysixOptions::default())
            .unwrap();
        assert_eq!(table.row(0).unwrap(), &[1.0, 2.0]);
    }
}
