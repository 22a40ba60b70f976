//! Axis labels and header-driven axis derivation

use serde::Serialize;
use std::fmt;

use crate::{Error, Result};

/// One axis label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label (wavelength, m/z channel, record position)
    Int(i64),
    /// Fractional label (retention time in minutes)
    Float(f64),
    /// Named column
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u16> for Label {
    fn from(v: u16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// An ordered, named label sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub name: String,
    pub labels: Vec<Label>,
}

impl Axis {
    pub fn new(name: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    /// Labels `0..len` for axes keyed only by position
    pub fn positions(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, (0..len as i64).map(Label::Int).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn position(&self, label: &Label) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// Arithmetic label sequence `first, first + step, ...` up to and including `last`
///
/// The result has `(last - first) / step + 1` entries. A zero step or a
/// `last` below `first` cannot describe an axis.
pub fn y_axis(first: u16, last: u16, step: u16) -> Result<Vec<u16>> {
    if step == 0 || last < first {
        return Err(Error::InvalidAxis { first, last, step });
    }
    Ok((first..=last).step_by(usize::from(step)).collect())
}

/// Milliseconds to minutes, rounded half away from zero to 4 decimals
///
/// Ten-thousandths of a minute are `ms / 6`, so the rounding is done on
/// integers and never lands on the wrong side of a half.
pub fn minutes_from_ms(ms: u32) -> f64 {
    let ten_thousandths = (u64::from(ms) + 3) / 6;
    ten_thousandths as f64 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_axis_inclusive() {
        assert_eq!(y_axis(200, 210, 2).unwrap(), vec![200, 202, 204, 206, 208, 210]);
        assert_eq!(y_axis(5, 5, 1).unwrap(), vec![5]);
    }

    #[test]
    fn test_y_axis_length_formula() {
        for (first, last, step) in [(190u16, 600u16, 10u16), (0, 7, 3), (1, 100, 7), (250, 251, 5)] {
            let axis = y_axis(first, last, step).unwrap();
            assert_eq!(axis.len(), usize::from((last - first) / step + 1));
            assert_eq!(axis[0], first);
            assert!(*axis.last().unwrap() <= last);
        }
    }

    #[test]
    fn test_y_axis_rejects_bad_triples() {
        assert_eq!(
            y_axis(10, 20, 0),
            Err(Error::InvalidAxis {
                first: 10,
                last: 20,
                step: 0
            })
        );
        assert!(y_axis(20, 10, 1).is_err());
    }

    #[test]
    fn test_minutes_from_ms() {
        assert_eq!(minutes_from_ms(0), 0.0);
        assert_eq!(minutes_from_ms(11), 0.0002);
        assert_eq!(minutes_from_ms(60_000), 1.0);
        assert_eq!(minutes_from_ms(90_000), 1.5);
    }

    #[test]
    fn test_minutes_from_ms_rounds_half_away() {
        // 3 ms = 0.00005 min
        assert_eq!(minutes_from_ms(3), 0.0001);
        assert_eq!(minutes_from_ms(2), 0.0);
        assert_eq!(minutes_from_ms(u32::MAX), 71582.7883);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Int(306).to_string(), "306");
        assert_eq!(Label::Float(0.0002).to_string(), "0.0002");
        assert_eq!(Label::from("intensity").to_string(), "intensity");
    }

    #[test]
    fn test_axis_position() {
        let axis = Axis::new("m/z", vec![Label::from(306u16), Label::from(316u16)]);
        assert_eq!(axis.position(&Label::Int(316)), Some(1));
        assert_eq!(axis.position(&Label::Int(1)), None);
        assert_eq!(Axis::positions("record", 3).labels[2], Label::Int(2));
    }
}
