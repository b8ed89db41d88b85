use crate::errors::{Bb84Error, Result};

/// Conventional BB84 abort bound on the quantum bit error rate.
pub const DEFAULT_QBER_THRESHOLD: f64 = 0.11;

/// Which sifted positions are disclosed for error estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSelection {
    /// Disclose the whole sifted key.
    All,
    /// Disclose exactly these sifted positions.
    Indices(Vec<usize>),
    /// Disclose the first `n` sifted positions (fewer if the key is shorter).
    First(usize),
    /// Disclose a random subset of this fraction of the key, at least one position.
    /// The fraction must lie in `(0.0, 1.0]`.
    RandomFraction(f64),
}

impl Default for SampleSelection {
    fn default() -> Self {
        SampleSelection::RandomFraction(0.5)
    }
}

/// Configuration for error estimation and the security decision.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Runs with a QBER at or above this value are rejected.
    pub threshold: f64,
    pub sample: SampleSelection,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QBER_THRESHOLD,
            sample: SampleSelection::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_sample(mut self, sample: SampleSelection) -> Self {
        self.sample = sample;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        if let SampleSelection::RandomFraction(fraction) = self.sample {
            validate_sample_fraction(fraction)?;
        }
        Ok(())
    }
}

/// Channel between sender and receiver in a simulated run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelModel {
    /// Probability that a qubit suffers a bit flip in transit.
    pub noise: f64,
    /// Probability that an intercept-resend attacker measures a qubit.
    pub eavesdrop_ratio: f64,
}

impl Default for ChannelModel {
    fn default() -> Self {
        Self {
            noise: 0.0,
            eavesdrop_ratio: 0.0,
        }
    }
}

impl ChannelModel {
    pub fn noisy(noise: f64) -> Self {
        Self {
            noise,
            ..Self::default()
        }
    }

    pub fn intercepted(eavesdrop_ratio: f64) -> Self {
        Self {
            eavesdrop_ratio,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_probability(self.noise)?;
        validate_probability(self.eavesdrop_ratio)
    }
}

/// Parameters of the reference error-correction and privacy-amplification step.
#[derive(Debug, Clone, PartialEq)]
pub struct DistillerConfig {
    /// Initial cascade block size; 0 sizes it from the estimated error rate.
    pub block_size: usize,
    /// Fraction of the reconciled key kept before subtracting leaked parities.
    pub compression: f64,
    /// Public seed both parties expand into the same Toeplitz matrix.
    pub seed: u64,
}

impl Default for DistillerConfig {
    fn default() -> Self {
        Self {
            block_size: 0,
            compression: 0.5,
            seed: 0x5eed_bb84,
        }
    }
}

impl DistillerConfig {
    pub fn validate(&self) -> Result<()> {
        validate_probability(self.compression)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(Bb84Error::InvalidThreshold(threshold));
    }
    Ok(())
}

pub(crate) fn validate_sample_fraction(fraction: f64) -> Result<()> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(Bb84Error::InvalidSampleFraction(fraction));
    }
    Ok(())
}

pub(crate) fn validate_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Bb84Error::InvalidProbability(p));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.threshold, 0.11);
        assert_eq!(config.sample, SampleSelection::RandomFraction(0.5));
        assert!(config.validate().is_ok());
        assert!(ChannelModel::default().validate().is_ok());
        assert!(DistillerConfig::default().validate().is_ok());
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-0.1 ; "negative")]
    #[test_case(1.5 ; "above one")]
    #[test_case(f64::NAN ; "nan")]
    fn test_rejects_threshold(threshold: f64) {
        let config = EstimatorConfig::default().with_threshold(threshold);
        assert!(matches!(config.validate(), Err(Bb84Error::InvalidThreshold(_))));
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        assert_eq!(
            ChannelModel::noisy(1.2).validate(),
            Err(Bb84Error::InvalidProbability(1.2))
        );
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-0.5 ; "negative")]
    #[test_case(1.5 ; "above one")]
    #[test_case(f64::NAN ; "nan")]
    fn test_rejects_sample_fraction(fraction: f64) {
        let config = EstimatorConfig::default().with_sample(SampleSelection::RandomFraction(fraction));
        assert!(matches!(
            config.validate(),
            Err(Bb84Error::InvalidSampleFraction(_))
        ));
    }

    #[test_case(0.01 ; "tiny")]
    #[test_case(1.0 ; "whole key")]
    fn test_accepts_sample_fraction(fraction: f64) {
        let config = EstimatorConfig::default().with_sample(SampleSelection::RandomFraction(fraction));
        assert!(config.validate().is_ok());
    }
}
