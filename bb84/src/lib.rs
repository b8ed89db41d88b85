//! # bb84
//!
//! BB84 basis reconciliation (sifting), quantum bit error rate estimation on a
//! disclosed sample, and the threshold decision that ends a run.
//!
//! A [`Trial`] carries both parties' bases and bits. [`sift`] keeps the
//! positions where the bases agree, [`estimate_error_rate`] compares a disclosed
//! subset of the sifted keys, and [`decide_security`] checks the rate against
//! the abort bound (11% by default). [`run_protocol`] chains these with a
//! pluggable [`KeyDistiller`] for error correction and privacy amplification.
//!
//! Randomized pieces take an explicit `&mut impl Rng`, so runs are reproducible
//! from a seed.

pub mod bb84_protocol;
pub mod bb84_states;
pub mod config;
pub mod distill;
pub mod error_correction;
pub mod errors;
pub mod privacy_amplification;
pub mod qber;
pub mod sifting;
pub mod simulation;
pub mod trial;

pub use bb84_protocol::{run_protocol, ProtocolReport};
pub use bb84_states::{BB84State, Basis, MeasurementBasis};
pub use config::{ChannelModel, DistillerConfig, EstimatorConfig, SampleSelection};
pub use distill::{CascadeToeplitz, FinalKey, KeyDistiller};
pub use errors::{Bb84Error, Result};
pub use qber::{decide_security, estimate_error_rate, ErrorEstimate, Verdict};
pub use sifting::{sift, sift_trial, SiftedKeys};
pub use simulation::simulate_trial;
pub use trial::Trial;

pub mod prelude {
    pub use crate::bb84_protocol::*;
    pub use crate::bb84_states::*;
    pub use crate::config::*;
    pub use crate::distill::*;
    pub use crate::errors::Bb84Error;
    pub use crate::qber::*;
    pub use crate::sifting::*;
    pub use crate::simulation::*;
    pub use crate::trial::*;
}
