//! Basis reconciliation.
//!
//! After the quantum phase both parties announce their bases over the public
//! channel and keep only the positions where the bases agree.

use log::{debug, warn};

use crate::bb84_states::MeasurementBasis;
use crate::errors::Result;
use crate::trial::{check_shape, Trial};

/// Index-aligned sifted keys. `sender[k]` and `receiver[k]` both come from
/// original position `matching_indices[k]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiftedKeys {
    pub matching_indices: Vec<usize>,
    pub sender: Vec<bool>,
    pub receiver: Vec<bool>,
}

impl SiftedKeys {
    pub fn len(&self) -> usize {
        self.matching_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matching_indices.is_empty()
    }

    /// Fraction of the raw positions that survived sifting.
    pub fn sift_ratio(&self, raw_len: usize) -> f64 {
        if raw_len == 0 {
            0.0
        } else {
            self.len() as f64 / raw_len as f64
        }
    }
}

/// Sifts raw sequences. Fails with `ShapeMismatch` unless all four share one
/// non-zero length. No matching positions yields empty keys, not an error.
pub fn sift(
    sender_bases: &[MeasurementBasis],
    sender_bits: &[bool],
    receiver_bases: &[MeasurementBasis],
    receiver_bits: &[bool],
) -> Result<SiftedKeys> {
    check_shape(sender_bases, sender_bits, receiver_bases, receiver_bits)?;

    let matching_indices: Vec<usize> = sender_bases
        .iter()
        .zip(receiver_bases)
        .enumerate()
        .filter(|(_, (a, b))| a == b)
        .map(|(i, _)| i)
        .collect();

    let sender = matching_indices.iter().map(|&i| sender_bits[i]).collect();
    let receiver = matching_indices.iter().map(|&i| receiver_bits[i]).collect();

    debug!(
        "sifted {} of {} positions",
        matching_indices.len(),
        sender_bases.len()
    );
    if matching_indices.is_empty() {
        warn!("no basis matches in {} positions; sifted key is empty", sender_bases.len());
    }

    Ok(SiftedKeys {
        matching_indices,
        sender,
        receiver,
    })
}

pub fn sift_trial(trial: &Trial) -> Result<SiftedKeys> {
    sift(
        trial.sender_bases(),
        trial.sender_bits(),
        trial.receiver_bases(),
        trial.receiver_bits(),
    )
}
