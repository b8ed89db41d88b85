//! Per-run protocol data: what the sender prepared and what the receiver read out.

use crate::bb84_states::{parse_bases, parse_bits, MeasurementBasis};
use crate::errors::{Bb84Error, Result};

/// One BB84 run of N positions. All four sequences have the same non-zero length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    sender_bases: Vec<MeasurementBasis>,
    sender_bits: Vec<bool>,
    receiver_bases: Vec<MeasurementBasis>,
    receiver_bits: Vec<bool>,
}

impl Trial {
    pub fn new(
        sender_bases: Vec<MeasurementBasis>,
        sender_bits: Vec<bool>,
        receiver_bases: Vec<MeasurementBasis>,
        receiver_bits: Vec<bool>,
    ) -> Result<Self> {
        check_shape(&sender_bases, &sender_bits, &receiver_bases, &receiver_bits)?;
        Ok(Self {
            sender_bases,
            sender_bits,
            receiver_bases,
            receiver_bits,
        })
    }

    /// Builds a trial from `Z`/`X` and `0`/`1` strings.
    pub fn parse(
        sender_bases: &str,
        sender_bits: &str,
        receiver_bases: &str,
        receiver_bits: &str,
    ) -> Result<Self> {
        Self::new(
            parse_bases(sender_bases)?,
            parse_bits(sender_bits)?,
            parse_bases(receiver_bases)?,
            parse_bits(receiver_bits)?,
        )
    }

    /// The eight-position run shown in the protocol-flow figure. The receiver's
    /// bases are the exact complement of the sender's, so nothing survives sifting.
    pub fn worked_example() -> Self {
        use MeasurementBasis::{Diagonal as X, Rectilinear as Z};
        Self {
            sender_bases: vec![Z, X, X, Z, Z, X, X, Z],
            sender_bits: vec![true, false, true, true, false, false, true, false],
            receiver_bases: vec![X, Z, Z, X, X, Z, Z, X],
            receiver_bits: vec![true, true, true, true, false, false, true, false],
        }
    }

    pub fn len(&self) -> usize {
        self.sender_bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender_bases.is_empty()
    }

    pub fn sender_bases(&self) -> &[MeasurementBasis] {
        &self.sender_bases
    }

    pub fn sender_bits(&self) -> &[bool] {
        &self.sender_bits
    }

    pub fn receiver_bases(&self) -> &[MeasurementBasis] {
        &self.receiver_bases
    }

    pub fn receiver_bits(&self) -> &[bool] {
        &self.receiver_bits
    }
}

pub(crate) fn check_shape(
    sender_bases: &[MeasurementBasis],
    sender_bits: &[bool],
    receiver_bases: &[MeasurementBasis],
    receiver_bits: &[bool],
) -> Result<()> {
    let n = sender_bases.len();
    if n == 0 || sender_bits.len() != n || receiver_bases.len() != n || receiver_bits.len() != n {
        return Err(Bb84Error::ShapeMismatch {
            sender_bases: n,
            sender_bits: sender_bits.len(),
            receiver_bases: receiver_bases.len(),
            receiver_bits: receiver_bits.len(),
        });
    }
    Ok(())
}
