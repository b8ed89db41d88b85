use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Bb84Error {
    #[error("Sequence lengths disagree: sender bases {sender_bases}, sender bits {sender_bits}, receiver bases {receiver_bases}, receiver bits {receiver_bits}")]
    ShapeMismatch {
        sender_bases: usize,
        sender_bits: usize,
        receiver_bases: usize,
        receiver_bits: usize,
    },

    #[error("Sifted keys are not index-aligned: sender has {sender} bits, receiver has {receiver}")]
    KeyLengthMismatch { sender: usize, receiver: usize },

    #[error("Error rate requested on an empty disclosed sample")]
    EmptySample,

    #[error("Sample index {index} is outside the sifted key of length {len}")]
    SampleIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid threshold: {0}. Must be in (0.0, 1.0]")]
    InvalidThreshold(f64),

    #[error("Invalid probability: {0}. Must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    #[error("Invalid sample fraction: {0}. Must be in (0.0, 1.0]")]
    InvalidSampleFraction(f64),

    #[error("Key distillation requires a non-empty key")]
    EmptyKey,

    #[error("Unknown basis symbol: {0:?}")]
    InvalidBasis(char),

    #[error("Unknown bit symbol: {0:?}")]
    InvalidBit(char),
}

pub type Result<T> = std::result::Result<T, Bb84Error>;
