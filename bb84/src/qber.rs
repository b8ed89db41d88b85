//! Quantum bit error rate estimation on a publicly disclosed sample of the
//! sifted key, and the abort decision that follows from it.

use std::fmt;

use log::debug;
use rand::seq::index;
use rand::Rng;

use crate::config::{validate_sample_fraction, SampleSelection};
use crate::errors::{Bb84Error, Result};

/// Outcome of comparing the disclosed positions of both sifted keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorEstimate {
    pub mismatches: usize,
    pub sampled: usize,
    /// `mismatches / sampled`, in `[0, 1]`.
    pub rate: f64,
}

impl ErrorEstimate {
    pub fn percent(&self) -> f64 {
        self.rate * 100.0
    }
}

impl fmt::Display for ErrorEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QBER = {:.1}% ({}/{} disclosed bits differ)",
            self.percent(),
            self.mismatches,
            self.sampled
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Secure,
    /// Error rate too high. Eavesdropping and channel noise look the same here.
    CompromisedOrNoisy,
}

impl Verdict {
    pub fn is_secure(self) -> bool {
        self == Verdict::Secure
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Secure => write!(f, "SECURE"),
            Verdict::CompromisedOrNoisy => write!(f, "COMPROMISED OR NOISY"),
        }
    }
}

/// `Secure` iff `rate < threshold`.
pub fn decide_security(rate: f64, threshold: f64) -> Verdict {
    if rate < threshold {
        Verdict::Secure
    } else {
        Verdict::CompromisedOrNoisy
    }
}

/// Compares the two sifted keys at `sample_indices`. Repeated indices count once.
pub fn estimate_error_rate(
    sender_sifted: &[bool],
    receiver_sifted: &[bool],
    sample_indices: &[usize],
) -> Result<ErrorEstimate> {
    if sender_sifted.len() != receiver_sifted.len() {
        return Err(Bb84Error::KeyLengthMismatch {
            sender: sender_sifted.len(),
            receiver: receiver_sifted.len(),
        });
    }
    if sender_sifted.is_empty() || sample_indices.is_empty() {
        return Err(Bb84Error::EmptySample);
    }

    let sample = normalize_indices(sample_indices, sender_sifted.len())?;
    let mismatches = sample
        .iter()
        .filter(|&&i| sender_sifted[i] != receiver_sifted[i])
        .count();
    let sampled = sample.len();
    let estimate = ErrorEstimate {
        mismatches,
        sampled,
        rate: mismatches as f64 / sampled as f64,
    };
    debug!("{}", estimate);
    Ok(estimate)
}

/// Picks the disclosed positions of a sifted key of length `len`.
/// The result is sorted, unique and in range.
pub fn select_sample<R: Rng + ?Sized>(
    len: usize,
    selection: &SampleSelection,
    rng: &mut R,
) -> Result<Vec<usize>> {
    match selection {
        SampleSelection::All => Ok((0..len).collect()),
        SampleSelection::First(n) => Ok((0..(*n).min(len)).collect()),
        SampleSelection::Indices(indices) => normalize_indices(indices, len),
        SampleSelection::RandomFraction(fraction) => {
            validate_sample_fraction(*fraction)?;
            if len == 0 {
                return Ok(Vec::new());
            }
            let amount = ((len as f64 * fraction).round() as usize).clamp(1, len);
            let mut picked = index::sample(rng, len, amount).into_vec();
            picked.sort_unstable();
            Ok(picked)
        }
    }
}

/// The key with the disclosed positions removed, order preserved.
pub fn discard_sample(key: &[bool], sample: &[usize]) -> Vec<bool> {
    let mut disclosed = vec![false; key.len()];
    for &i in sample {
        if let Some(slot) = disclosed.get_mut(i) {
            *slot = true;
        }
    }
    key.iter()
        .zip(disclosed)
        .filter(|(_, gone)| !gone)
        .map(|(&bit, _)| bit)
        .collect()
}

/// Sifted positions where the two keys disagree.
pub fn mismatch_positions(sender_sifted: &[bool], receiver_sifted: &[bool]) -> Vec<usize> {
    sender_sifted
        .iter()
        .zip(receiver_sifted)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

fn normalize_indices(indices: &[usize], len: usize) -> Result<Vec<usize>> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if let Some(&index) = sorted.last() {
        if index >= len {
            return Err(Bb84Error::SampleIndexOutOfRange { index, len });
        }
    }
    Ok(sorted)
}
