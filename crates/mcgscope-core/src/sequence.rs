//! Materialized sequences and their fixed-width bit expansion.

use std::ops::Deref;

use serde::Serialize;

use crate::error::{BatteryError, Result};

/// Ordered, immutable run of generator outputs, each in `[0, N)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Sequence(Vec<u64>);

impl Sequence {
    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }

    /// Values as `f64`, for the real-valued estimators.
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&v| v as f64).collect()
    }

    /// Expand to a [`BitSequence`] of `width` bits per value.
    pub fn to_bits(&self, width: u32) -> Result<BitSequence> {
        BitSequence::expand(&self.0, width)
    }
}

impl From<Vec<u64>> for Sequence {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}

impl Deref for Sequence {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.0
    }
}

/// Bits (0/1) of a sequence, MSB first per value, concatenated in order.
/// Length is always `values * width`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<u8>,
    width: u32,
}

impl BitSequence {
    /// Expand every value into exactly `width` bits, zero-padded on the left.
    ///
    /// Fails with `RangeError` if a value needs more than `width` bits, and
    /// with `InvalidArgument` if `width` is 0 or above 64.
    pub fn expand(values: &[u64], width: u32) -> Result<Self> {
        check_width(width)?;
        let mut bits = Vec::with_capacity(values.len() * width as usize);
        for &value in values {
            check_fits(value, width)?;
            for shift in (0..width).rev() {
                bits.push(((value >> shift) & 1) as u8);
            }
        }
        Ok(Self { bits, width })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bits
    }
}

impl Deref for BitSequence {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bits
    }
}

pub(crate) fn check_width(width: u32) -> Result<()> {
    if width == 0 || width > u64::BITS {
        return Err(BatteryError::invalid_argument(format!(
            "bit width must be in 1..=64, got {width}"
        )));
    }
    Ok(())
}

pub(crate) fn check_fits(value: u64, width: u32) -> Result<()> {
    if width < u64::BITS && value >> width != 0 {
        return Err(BatteryError::out_of_range(
            value,
            format!("does not fit in {width} bits"),
        ));
    }
    Ok(())
}

/// Zero-padded binary string of `value` in exactly `width` digits.
pub fn bit_string(value: u64, width: u32) -> Result<String> {
    check_width(width)?;
    check_fits(value, width)?;
    Ok(format!("{value:0w$b}", w = width as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn test_expand_msb_first() {
        let bits = BitSequence::expand(&[0b101, 0b001], 3).unwrap();
        assert_eq!(bits.as_slice(), &[1, 0, 1, 0, 0, 1]);
        assert_eq!(bits.width(), 3);
    }

    #[test]
    fn test_expand_length_invariant() {
        let seq = Generator::reference().generate_sequence(40);
        let bits = seq.to_bits(31).unwrap();
        assert_eq!(bits.len(), 40 * 31);
        assert!(bits.iter().all(|&b| b <= 1));
    }

    #[test]
    fn test_expand_rejects_wide_value() {
        let err = BitSequence::expand(&[5, 1 << 31], 31).unwrap_err();
        assert!(matches!(err, BatteryError::RangeError { .. }));
    }

    #[test]
    fn test_expand_rejects_zero_width() {
        assert!(matches!(
            BitSequence::expand(&[1], 0),
            Err(BatteryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_full_width_accepts_max() {
        let bits = BitSequence::expand(&[u64::MAX], 64).unwrap();
        assert_eq!(bits.len(), 64);
        assert!(bits.iter().all(|&b| b == 1));
    }

    #[test]
    fn test_bit_string() {
        assert_eq!(bit_string(121, 10).unwrap(), "0001111001");
        assert_eq!(bit_string(0, 3).unwrap(), "000");
        assert!(bit_string(8, 3).is_err());
    }

    #[test]
    fn test_sequence_views() {
        let seq = Sequence::from(vec![1, 2, 3]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.to_f64(), vec![1.0, 2.0, 3.0]);
        assert_eq!(seq.into_vec(), vec![1, 2, 3]);
    }
}
