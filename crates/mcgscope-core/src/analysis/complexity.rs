//! Linear complexity over GF(2) via Berlekamp–Massey.
//!
//! [`LinearComplexity`] consumes bits one at a time and tracks the length of
//! the shortest LFSR that generates the prefix seen so far. Feeding a whole
//! sequence through it yields the complexity profile in a single O(n²) pass;
//! each value equals what a fresh run over that prefix would return.
//!
//! The update is the standard `C(x) += x^(i-m)·B(x)`, so every profile value
//! is the true shortest-LFSR length of its prefix.

use serde::Serialize;

use crate::error::{BatteryError, Result};
use crate::sequence::BitSequence;

/// Incremental Berlekamp–Massey synthesizer with fixed-capacity buffers.
///
/// `c` is the current connection polynomial, `b` the polynomial at the last
/// length change. `snapshot` holds the copy of `c` taken before an update;
/// it is swapped into `b` when the length changes, so the three buffers
/// never alias. Entries above `c_deg` in `c` are zero; entries above `b_deg`
/// in `b` and `snapshot` are never read.
#[derive(Debug, Clone)]
pub struct LinearComplexity {
    capacity: usize,
    bits: Vec<u8>,
    c: Vec<u8>,
    b: Vec<u8>,
    snapshot: Vec<u8>,
    c_deg: usize,
    b_deg: usize,
    l: usize,
    m: isize,
}

impl LinearComplexity {
    /// Synthesizer for sequences of at most `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        // Slot 0 always exists so C(x) = B(x) = 1 even for an empty input.
        let slots = capacity.max(1);
        let mut c = vec![0u8; slots];
        let mut b = vec![0u8; slots];
        c[0] = 1;
        b[0] = 1;
        Self {
            capacity,
            bits: Vec::with_capacity(capacity),
            c,
            b,
            snapshot: vec![0u8; slots],
            c_deg: 0,
            b_deg: 0,
            l: 0,
            m: -1,
        }
    }

    /// Feed the next bit and return the linear complexity of the prefix
    /// including it.
    pub fn push(&mut self, bit: u8) -> Result<usize> {
        if bit > 1 {
            return Err(BatteryError::out_of_range(bit, "not a binary digit"));
        }
        let i = self.bits.len();
        if i == self.capacity {
            return Err(BatteryError::invalid_argument(format!(
                "synthesizer capacity of {} bits exhausted",
                self.capacity
            )));
        }
        self.bits.push(bit);

        let mut d = bit;
        for j in 1..=self.l {
            d ^= self.c[j] & self.bits[i - j];
        }

        if d == 1 {
            let saved_deg = self.c_deg;
            self.snapshot[..=saved_deg].copy_from_slice(&self.c[..=saved_deg]);
            // C(x) += x^(i-m) * B(x), truncated to capacity.
            let shift = (i as isize - self.m) as usize;
            let top = (self.b_deg + shift).min(self.c.len() - 1);
            for k in shift..=top {
                self.c[k] ^= self.b[k - shift];
            }
            if shift <= top {
                self.c_deg = self.c_deg.max(top);
            }
            if self.l <= i / 2 {
                self.l = i + 1 - self.l;
                self.m = i as isize;
                std::mem::swap(&mut self.b, &mut self.snapshot);
                self.b_deg = saved_deg;
            }
        }

        Ok(self.l)
    }

    /// Linear complexity of everything pushed so far.
    pub fn complexity(&self) -> usize {
        self.l
    }

    /// Number of bits consumed.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Coefficients `c[0..=L]` of the current connection polynomial.
    pub fn connection_polynomial(&self) -> &[u8] {
        &self.c[..=self.l.min(self.c.len() - 1)]
    }
}

/// Linear complexity of the whole of `bits`.
pub fn linear_complexity(bits: &[u8]) -> Result<usize> {
    let mut lc = LinearComplexity::with_capacity(bits.len());
    for &bit in bits {
        lc.push(bit)?;
    }
    Ok(lc.complexity())
}

/// Complexity of every prefix `bits[..k]`, `k = 1..=n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComplexityProfile(Vec<usize>);

impl ComplexityProfile {
    pub fn values(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Complexity of the full sequence (0 for an empty profile).
    pub fn final_complexity(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }

    /// Mean of `|L_k - k/2|` over all prefixes.
    pub fn mean_deviation_from_ideal(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .0
            .iter()
            .enumerate()
            .map(|(i, &l)| (l as f64 - (i + 1) as f64 / 2.0).abs())
            .sum();
        total / self.0.len() as f64
    }
}

/// Profile of `bits` in one incremental pass.
pub fn complexity_profile(bits: &[u8]) -> Result<ComplexityProfile> {
    let mut lc = LinearComplexity::with_capacity(bits.len());
    let mut profile = Vec::with_capacity(bits.len());
    for &bit in bits {
        profile.push(lc.push(bit)?);
    }
    Ok(ComplexityProfile(profile))
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplexityResult {
    pub integers: usize,
    pub bit_width: u32,
    pub bit_length: usize,
    pub final_complexity: usize,
    /// Mean absolute distance from the ideal line `k/2`.
    pub mean_deviation: f64,
    pub profile: ComplexityProfile,
}

/// Expand `values` to `bit_width` bits each and profile the result.
pub fn linear_complexity_analysis(values: &[u64], bit_width: u32) -> Result<ComplexityResult> {
    if values.is_empty() {
        return Err(BatteryError::invalid_argument(
            "linear complexity needs at least one value",
        ));
    }
    let bits = BitSequence::expand(values, bit_width)?;
    let profile = complexity_profile(&bits)?;
    log::debug!(
        "linear complexity: {} bits, final L={}",
        bits.len(),
        profile.final_complexity()
    );
    Ok(ComplexityResult {
        integers: values.len(),
        bit_width,
        bit_length: bits.len(),
        final_complexity: profile.final_complexity(),
        mean_deviation: profile.mean_deviation_from_ideal(),
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Bits of the LFSR `s[t+4] = s[t+1] ^ s[t]` (primitive x^4 + x + 1).
    fn lfsr4(len: usize) -> Vec<u8> {
        let mut s = vec![0u8, 0, 0, 1];
        while s.len() < len {
            let t = s.len() - 4;
            s.push(s[t + 1] ^ s[t]);
        }
        s.truncate(len);
        s
    }

    fn random_bits(n: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.random_range(0..2u8)).collect()
    }

    #[test]
    fn test_all_zero_has_zero_complexity() {
        for n in [1, 2, 17, 200] {
            let profile = complexity_profile(&vec![0u8; n]).unwrap();
            assert!(profile.values().iter().all(|&l| l == 0));
        }
    }

    #[test]
    fn test_single_one() {
        assert_eq!(linear_complexity(&[1]).unwrap(), 1);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(linear_complexity(&[]).unwrap(), 0);
        assert!(complexity_profile(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_golden_1101() {
        // s2 = s1 ^ s0 and s3 = s2 ^ s1 hold, s = s_prev fails at s2.
        assert_eq!(linear_complexity(&[1, 1, 0, 1]).unwrap(), 2);
        let profile = complexity_profile(&[1, 1, 0, 1]).unwrap();
        assert_eq!(profile.values(), &[1, 1, 2, 2]);
    }

    #[test]
    fn test_late_one_needs_full_length() {
        // 0^(k-1) 1 has complexity k.
        assert_eq!(linear_complexity(&[0, 0, 0, 1]).unwrap(), 4);
        assert_eq!(linear_complexity(&[0, 0, 0, 0, 0, 0, 1]).unwrap(), 7);
    }

    #[test]
    fn test_alternating_bits() {
        let bits: Vec<u8> = (0..50).map(|i| (i % 2) as u8).collect();
        assert_eq!(linear_complexity(&bits).unwrap(), 2);
    }

    #[test]
    fn test_lfsr_profile_converges_to_degree() {
        let bits = lfsr4(60);
        let profile = complexity_profile(&bits).unwrap();
        assert_eq!(profile.final_complexity(), 4);
        assert!(profile.values().iter().all(|&l| l <= 15));
        assert!(profile.values()[8..].iter().all(|&l| l == 4));
    }

    #[test]
    fn test_profile_is_non_decreasing_and_bounded() {
        let bits = random_bits(500, 7);
        let profile = complexity_profile(&bits).unwrap();
        for (k, w) in profile.values().windows(2).enumerate() {
            assert!(w[0] <= w[1], "profile decreased at {k}");
        }
        for (i, &l) in profile.values().iter().enumerate() {
            assert!(l <= i + 1);
        }
    }

    #[test]
    fn test_incremental_matches_per_prefix_runs() {
        let bits = random_bits(120, 42);
        let profile = complexity_profile(&bits).unwrap();
        for k in 1..=bits.len() {
            assert_eq!(
                profile.values()[k - 1],
                linear_complexity(&bits[..k]).unwrap(),
                "prefix {k}"
            );
        }
    }

    #[test]
    fn test_long_sequence_matches_lfsr_degree() {
        // Long input, short register: updates stay within the live degree.
        let bits = lfsr4(20_000);
        assert_eq!(linear_complexity(&bits).unwrap(), 4);
        let random = random_bits(4_000, 9);
        let l = linear_complexity(&random).unwrap();
        assert!((1_990..=2_010).contains(&l), "L={l}");
    }

    #[test]
    fn test_connection_polynomial_reproduces_sequence() {
        let bits = random_bits(64, 3);
        let mut lc = LinearComplexity::with_capacity(bits.len());
        for &b in &bits {
            lc.push(b).unwrap();
        }
        let c = lc.connection_polynomial().to_vec();
        let l = lc.complexity();
        assert_eq!(c.len(), l + 1);
        assert_eq!(c[0], 1);
        for i in l..bits.len() {
            let mut predicted = 0u8;
            for j in 1..=l {
                predicted ^= c[j] & bits[i - j];
            }
            assert_eq!(predicted, bits[i], "bit {i}");
        }
    }

    #[test]
    fn test_capacity_and_bit_checks() {
        let mut lc = LinearComplexity::with_capacity(1);
        assert!(lc.is_empty());
        assert_eq!(lc.push(1).unwrap(), 1);
        assert_eq!(lc.len(), 1);
        assert!(matches!(lc.push(0), Err(BatteryError::InvalidArgument(_))));
        let mut lc = LinearComplexity::with_capacity(4);
        assert!(matches!(lc.push(2), Err(BatteryError::RangeError { .. })));
    }

    #[test]
    fn test_mean_deviation() {
        let profile = complexity_profile(&[1, 1, 0, 1]).unwrap();
        // |1-0.5| + |1-1| + |2-1.5| + |2-2| = 1.0 over 4 prefixes
        assert!((profile.mean_deviation_from_ideal() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_analysis_on_generator_output() {
        let seq = crate::generator::Generator::reference().generate_sequence(10);
        let result = linear_complexity_analysis(&seq, 31).unwrap();
        assert_eq!(result.bit_length, 310);
        assert_eq!(result.profile.len(), 310);
        assert_eq!(result.final_complexity, result.profile.final_complexity());
        assert!(result.final_complexity <= 310);
    }

    #[test]
    fn test_analysis_rejects_empty_and_wide() {
        assert!(linear_complexity_analysis(&[], 31).is_err());
        assert!(matches!(
            linear_complexity_analysis(&[1 << 31], 31),
            Err(BatteryError::RangeError { .. })
        ));
    }
}
