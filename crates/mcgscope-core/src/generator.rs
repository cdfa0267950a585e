//! Multiplicative congruential generator.
//!
//! The recurrence is `x ← (a·x + c) mod N`. The generator is an owned state
//! machine: every consumer that needs a reproducible stream either holds its
//! own instance or calls [`Generator::reset`] before drawing.

use serde::{Deserialize, Serialize};

use crate::error::{BatteryError, Result};
use crate::sequence::Sequence;

/// Modulus of the reference configuration, `2^31`.
pub const REFERENCE_MODULUS: u64 = 1 << 31;

/// Parameter `q` of the reference configuration; `a = x0 = 2q + 3`.
pub const REFERENCE_Q: u64 = 4;

/// Largest `f64` strictly below 1, `1 - 2^-53`.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Construction parameters `{N, a, c, x0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    pub modulus: u64,
    pub multiplier: u64,
    pub increment: u64,
    pub seed: u64,
}

impl GeneratorParams {
    /// `N = 2^31`, `a = x0 = 11`, `c = 0`.
    pub fn reference() -> Self {
        Self::from_q(REFERENCE_Q)
    }

    /// Reference family with `a = x0 = 2q + 3` over `N = 2^31`, `c = 0`.
    pub fn from_q(q: u64) -> Self {
        let a = 2 * q + 3;
        Self {
            modulus: REFERENCE_MODULUS,
            multiplier: a,
            increment: 0,
            seed: a,
        }
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self::reference()
    }
}

/// Deterministic MCG state `{N, a, c, x, x0}` with `0 <= x < N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    modulus: u64,
    multiplier: u64,
    increment: u64,
    current: u64,
    seed: u64,
}

impl Generator {
    /// Build a generator. Fails with `InvalidParameter` if `N == 0` or the
    /// seed does not lie in `[0, N)`.
    pub fn new(modulus: u64, multiplier: u64, increment: u64, seed: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(BatteryError::InvalidParameter(
                "modulus must be positive".to_string(),
            ));
        }
        if seed >= modulus {
            return Err(BatteryError::InvalidParameter(format!(
                "seed {seed} must be below modulus {modulus}"
            )));
        }
        Ok(Self::unchecked(&GeneratorParams {
            modulus,
            multiplier,
            increment,
            seed,
        }))
    }

    fn unchecked(params: &GeneratorParams) -> Self {
        Self {
            modulus: params.modulus,
            multiplier: params.multiplier,
            increment: params.increment,
            current: params.seed,
            seed: params.seed,
        }
    }

    pub fn from_params(params: &GeneratorParams) -> Result<Self> {
        Self::new(
            params.modulus,
            params.multiplier,
            params.increment,
            params.seed,
        )
    }

    /// Generator with the reference parameters.
    pub fn reference() -> Self {
        // Reference parameters are valid by construction.
        Self::unchecked(&GeneratorParams::reference())
    }

    pub fn params(&self) -> GeneratorParams {
        GeneratorParams {
            modulus: self.modulus,
            multiplier: self.multiplier,
            increment: self.increment,
            seed: self.seed,
        }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Current state `x`.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Bits needed to represent any value in `[0, N)`, i.e. `⌈log2 N⌉`
    /// (31 for the reference modulus). At least 1.
    pub fn bit_width(&self) -> u32 {
        if self.modulus <= 2 {
            1
        } else {
            u64::BITS - (self.modulus - 1).leading_zeros()
        }
    }

    /// Apply one step of the recurrence and return the new state.
    pub fn advance(&mut self) -> u64 {
        let n = self.modulus as u128;
        let next = (self.multiplier as u128 * self.current as u128 + self.increment as u128) % n;
        self.current = next as u64;
        self.current
    }

    /// `advance() / N`, in `[0, 1)`.
    ///
    /// Above `N = 2^53` the quotient can round up to 1.0; it is clamped to
    /// the largest `f64` below 1.
    pub fn normalized_advance(&mut self) -> f64 {
        (self.advance() as f64 / self.modulus as f64).min(BELOW_ONE)
    }

    /// Restore `x ← x0`.
    pub fn reset(&mut self) {
        self.current = self.seed;
    }

    /// Exactly `length` successive `advance()` results.
    pub fn generate_sequence(&mut self, length: usize) -> Sequence {
        Sequence::from((0..length).map(|_| self.advance()).collect::<Vec<_>>())
    }

    /// Exactly `length` successive `normalized_advance()` results.
    pub fn normalized_sequence(&mut self, length: usize) -> Vec<f64> {
        (0..length).map(|_| self.normalized_advance()).collect()
    }
}

impl Iterator for Generator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_first_values() {
        let mut g = Generator::reference();
        assert_eq!(g.advance(), 121);
        assert_eq!(g.advance(), 1331);
        assert_eq!(g.advance(), 14641);
    }

    #[test]
    fn test_reference_params() {
        let p = GeneratorParams::reference();
        assert_eq!(p.modulus, 2_147_483_648);
        assert_eq!(p.multiplier, 11);
        assert_eq!(p.seed, 11);
        assert_eq!(p.increment, 0);
        assert_eq!(Generator::from_params(&p).unwrap(), Generator::reference());
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let err = Generator::new(0, 11, 0, 0).unwrap_err();
        assert!(matches!(err, BatteryError::InvalidParameter(_)));
    }

    #[test]
    fn test_seed_outside_modulus_rejected() {
        let err = Generator::new(16, 5, 1, 16).unwrap_err();
        assert!(matches!(err, BatteryError::InvalidParameter(_)));
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut g = Generator::reference();
        let first = g.generate_sequence(20);
        assert_ne!(g.current(), 11);
        g.reset();
        assert_eq!(g.current(), 11);
        assert_eq!(g.generate_sequence(20), first);
    }

    #[test]
    fn test_values_stay_below_modulus() {
        let mut g = Generator::new(1000, 7919, 13, 1).unwrap();
        for _ in 0..10_000 {
            assert!(g.advance() < 1000);
        }
        let mut g = Generator::reference();
        assert!(g.generate_sequence(5000).iter().all(|&v| v < REFERENCE_MODULUS));
    }

    #[test]
    fn test_no_overflow_on_wide_modulus() {
        let mut g = Generator::new(u64::MAX, u64::MAX - 1, u64::MAX - 2, u64::MAX - 3).unwrap();
        for _ in 0..100 {
            assert!(g.advance() < u64::MAX);
        }
    }

    #[test]
    fn test_normalized_in_unit_interval() {
        let mut g = Generator::reference();
        for v in g.normalized_sequence(1000) {
            assert!((0.0..1.0).contains(&v));
        }
        g.reset();
        assert_eq!(g.normalized_advance(), 121.0 / 2_147_483_648.0);
    }

    #[test]
    fn test_normalized_stays_below_one_on_wide_modulus() {
        let mut g = Generator::new(u64::MAX, 1, 1, u64::MAX - 2).unwrap();
        let v = g.normalized_advance();
        assert!(v < 1.0, "got {v}");
        assert_eq!(v, BELOW_ONE);
        assert!(crate::analysis::histogram(&[v], 10).is_ok());
    }

    #[test]
    fn test_reference_matches_params() {
        assert_eq!(Generator::reference().params(), GeneratorParams::reference());
    }

    #[test]
    fn test_bit_width() {
        assert_eq!(Generator::reference().bit_width(), 31);
        assert_eq!(Generator::new(1000, 3, 0, 1).unwrap().bit_width(), 10);
        assert_eq!(Generator::new(1024, 3, 0, 1).unwrap().bit_width(), 10);
        assert_eq!(Generator::new(1, 3, 0, 0).unwrap().bit_width(), 1);
    }

    #[test]
    fn test_zero_length_sequence() {
        let mut g = Generator::reference();
        assert!(g.generate_sequence(0).is_empty());
        assert_eq!(g.current(), 11);
    }

    #[test]
    fn test_iterator_matches_advance() {
        let a: Vec<u64> = Generator::reference().take(10).collect();
        let mut g = Generator::reference();
        assert_eq!(a, g.generate_sequence(10).into_vec());
    }
}
