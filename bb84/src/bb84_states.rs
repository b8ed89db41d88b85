use std::fmt;

use rand::Rng;

use crate::errors::{Bb84Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BB84State {
    QubitZero,
    QubitOne,
    QubitPlus,  // Represents the |+> state
    QubitMinus, // Represents the |-> state
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementBasis {
    /// Z basis, |0> and |1>.
    Rectilinear,
    /// X basis, |+> and |->.
    Diagonal,
}

pub type Basis = MeasurementBasis;

impl MeasurementBasis {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen() {
            MeasurementBasis::Diagonal
        } else {
            MeasurementBasis::Rectilinear
        }
    }

    pub fn symbol(self) -> char {
        match self {
            MeasurementBasis::Rectilinear => 'Z',
            MeasurementBasis::Diagonal => 'X',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol {
            'Z' | 'z' | '+' => Ok(MeasurementBasis::Rectilinear),
            'X' | 'x' | '×' => Ok(MeasurementBasis::Diagonal),
            other => Err(Bb84Error::InvalidBasis(other)),
        }
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl BB84State {
    /// Encodes `bit` in `basis`.
    pub fn prepare(bit: bool, basis: MeasurementBasis) -> Self {
        match (basis, bit) {
            (MeasurementBasis::Rectilinear, false) => BB84State::QubitZero,
            (MeasurementBasis::Rectilinear, true) => BB84State::QubitOne,
            (MeasurementBasis::Diagonal, false) => BB84State::QubitPlus,
            (MeasurementBasis::Diagonal, true) => BB84State::QubitMinus,
        }
    }

    pub fn basis(self) -> MeasurementBasis {
        match self {
            BB84State::QubitZero | BB84State::QubitOne => MeasurementBasis::Rectilinear,
            BB84State::QubitPlus | BB84State::QubitMinus => MeasurementBasis::Diagonal,
        }
    }

    /// Bit value read out when measured in the preparation basis.
    pub fn bit(self) -> bool {
        matches!(self, BB84State::QubitOne | BB84State::QubitMinus)
    }

    /// Projective measurement. A conjugate basis gives a uniformly random outcome.
    pub fn measure<R: Rng + ?Sized>(self, basis: MeasurementBasis, rng: &mut R) -> bool {
        if self.basis() == basis {
            self.bit()
        } else {
            rng.gen()
        }
    }

    /// Bit-flip error within the same basis.
    pub fn flip(self) -> Self {
        match self {
            BB84State::QubitZero => BB84State::QubitOne,
            BB84State::QubitOne => BB84State::QubitZero,
            BB84State::QubitPlus => BB84State::QubitMinus,
            BB84State::QubitMinus => BB84State::QubitPlus,
        }
    }
}

pub fn random_bit<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen()
}

/// Parses a string of `Z`/`X` symbols, ignoring whitespace.
pub fn parse_bases(text: &str) -> Result<Vec<MeasurementBasis>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(MeasurementBasis::from_symbol)
        .collect()
}

/// Parses a string of `0`/`1` digits, ignoring whitespace.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Bb84Error::InvalidBit(other)),
        })
        .collect()
}

pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

pub fn format_bases(bases: &[MeasurementBasis]) -> String {
    bases.iter().map(|b| b.symbol()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_prepare_table() {
        assert_eq!(BB84State::prepare(false, Basis::Rectilinear), BB84State::QubitZero);
        assert_eq!(BB84State::prepare(true, Basis::Rectilinear), BB84State::QubitOne);
        assert_eq!(BB84State::prepare(false, Basis::Diagonal), BB84State::QubitPlus);
        assert_eq!(BB84State::prepare(true, Basis::Diagonal), BB84State::QubitMinus);
    }

    #[test]
    fn test_matching_basis_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        for &basis in &[Basis::Rectilinear, Basis::Diagonal] {
            for &bit in &[false, true] {
                let state = BB84State::prepare(bit, basis);
                for _ in 0..32 {
                    assert_eq!(state.measure(basis, &mut rng), bit);
                }
            }
        }
    }

    #[test]
    fn test_conjugate_basis_is_random() {
        let mut rng = StdRng::seed_from_u64(11);
        let state = BB84State::QubitZero;
        let ones = (0..2000)
            .filter(|_| state.measure(Basis::Diagonal, &mut rng))
            .count();
        assert!(ones > 850 && ones < 1150, "ones: {}", ones);
    }

    #[test]
    fn test_flip_stays_in_basis() {
        for state in [
            BB84State::QubitZero,
            BB84State::QubitOne,
            BB84State::QubitPlus,
            BB84State::QubitMinus,
        ] {
            assert_eq!(state.flip().basis(), state.basis());
            assert_ne!(state.flip().bit(), state.bit());
            assert_eq!(state.flip().flip(), state);
        }
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(
            parse_bases("Z X x z").unwrap(),
            vec![Basis::Rectilinear, Basis::Diagonal, Basis::Diagonal, Basis::Rectilinear]
        );
        assert_eq!(parse_bits("1 0 1").unwrap(), vec![true, false, true]);
        assert_eq!(parse_bases("ZQ"), Err(Bb84Error::InvalidBasis('Q')));
        assert_eq!(parse_bits("012"), Err(Bb84Error::InvalidBit('2')));
        assert_eq!(format_bits(&[true, false, false, true]), "1001");
        assert_eq!(format_bases(&[Basis::Diagonal, Basis::Rectilinear]), "XZ");
    }
}
