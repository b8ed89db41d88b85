//! Turning the post-disclosure sifted key into a shared final key.

use log::{debug, info, warn};

use crate::config::DistillerConfig;
use crate::error_correction::{cascade_correction, initial_block_size};
use crate::errors::{Bb84Error, Result};
use crate::privacy_amplification::{apply_privacy_amplification, bools_to_bytes, key_digest};

/// Keys both parties end up with after distillation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalKey {
    pub sender: Vec<bool>,
    pub receiver: Vec<bool>,
    pub leaked_parities: usize,
    /// Whether the confirmation digests of both keys agree.
    pub confirmed: bool,
}

impl FinalKey {
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bools_to_bytes(&self.sender)
    }
}

/// Error correction plus privacy amplification. Consumes the sifted keys with
/// the disclosed sample already removed, and the error rate estimated on that
/// sample.
pub trait KeyDistiller {
    fn distill(&self, sender: &[bool], receiver: &[bool], qber: f64) -> Result<FinalKey>;
}

/// Cascade reconciliation followed by Toeplitz hashing.
#[derive(Debug, Clone, Default)]
pub struct CascadeToeplitz {
    config: DistillerConfig,
}

impl CascadeToeplitz {
    pub fn new(config: DistillerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DistillerConfig {
        &self.config
    }

    /// First Cascade block size: the configured one, or one sized for `qber`.
    pub fn block_size(&self, key_len: usize, qber: f64) -> usize {
        match self.config.block_size {
            0 => initial_block_size(key_len, qber),
            size => size,
        }
    }

    /// Output length: the compressed length minus everything the reconciliation leaked.
    pub fn final_length(&self, key_len: usize, leaked_parities: usize) -> usize {
        ((key_len as f64 * self.config.compression).floor() as usize)
            .saturating_sub(leaked_parities)
    }
}

impl KeyDistiller for CascadeToeplitz {
    fn distill(&self, sender: &[bool], receiver: &[bool], qber: f64) -> Result<FinalKey> {
        if sender.len() != receiver.len() {
            return Err(Bb84Error::KeyLengthMismatch {
                sender: sender.len(),
                receiver: receiver.len(),
            });
        }
        if sender.is_empty() {
            return Err(Bb84Error::EmptyKey);
        }

        let block_size = self.block_size(sender.len(), qber);
        debug!("reconciling {} bits with blocks of {}", sender.len(), block_size);
        let reconciliation = cascade_correction(sender, receiver, block_size, self.config.seed)?;
        let out_len = self.final_length(sender.len(), reconciliation.leaked_parities);
        if out_len == 0 {
            warn!(
                "{} leaked parities consume the whole {}-bit key",
                reconciliation.leaked_parities,
                sender.len()
            );
        }

        let amplification_seed = self.config.seed.wrapping_add(1);
        let sender_final = apply_privacy_amplification(sender, out_len, amplification_seed);
        let receiver_final =
            apply_privacy_amplification(&reconciliation.corrected, out_len, amplification_seed);
        let confirmed = key_digest(&sender_final) == key_digest(&receiver_final);

        if confirmed {
            info!(
                "distilled {} bits from {} ({} parities leaked)",
                out_len,
                sender.len(),
                reconciliation.leaked_parities
            );
        } else {
            warn!("final keys disagree after reconciliation");
        }

        Ok(FinalKey {
            sender: sender_final,
            receiver: receiver_final,
            leaked_parities: reconciliation.leaked_parities,
            confirmed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_clean_key_distills() {
        let mut rng = StdRng::seed_from_u64(21);
        let key: Vec<bool> = (0..1000).map(|_| rng.gen()).collect();
        let distiller = CascadeToeplitz::default();
        let final_key = distiller.distill(&key, &key, 0.0).unwrap();
        assert!(final_key.confirmed);
        assert_eq!(final_key.sender, final_key.receiver);
        assert_eq!(
            final_key.len(),
            distiller.final_length(1000, final_key.leaked_parities)
        );
        assert!(final_key.len() > 400);
        assert_eq!(final_key.to_bytes().len(), (final_key.len() + 7) / 8);
    }

    #[test]
    fn test_single_error_is_reconciled() {
        let mut rng = StdRng::seed_from_u64(22);
        let key: Vec<bool> = (0..512).map(|_| rng.gen()).collect();
        let mut noisy = key.clone();
        noisy[77] = !noisy[77];
        let final_key = CascadeToeplitz::default()
            .distill(&key, &noisy, 1.0 / 512.0)
            .unwrap();
        assert!(final_key.confirmed);
        assert_eq!(final_key.sender, final_key.receiver);
    }

    #[test]
    fn test_noisy_key_distills_to_shared_key() {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(300 + seed);
            let key: Vec<bool> = (0..1000).map(|_| rng.gen()).collect();
            let noisy: Vec<bool> = key
                .iter()
                .map(|&b| if rng.gen_bool(0.03) { !b } else { b })
                .collect();
            let distiller = CascadeToeplitz::default();
            let final_key = distiller.distill(&key, &noisy, 0.03).unwrap();
            assert!(final_key.confirmed, "seed {}", seed);
            assert_eq!(final_key.sender, final_key.receiver);
            assert!(!final_key.is_empty(), "seed {}", seed);
        }
    }

    #[test]
    fn test_block_size_follows_qber() {
        let distiller = CascadeToeplitz::default();
        assert_eq!(distiller.block_size(1000, 0.03), 25);
        assert_eq!(distiller.block_size(1000, 0.1), 8);
        let fixed = CascadeToeplitz::new(DistillerConfig {
            block_size: 16,
            ..DistillerConfig::default()
        })
        .unwrap();
        assert_eq!(fixed.block_size(1000, 0.03), 16);
    }

    #[test]
    fn test_rejects_empty_and_unaligned() {
        let distiller = CascadeToeplitz::default();
        assert_eq!(distiller.distill(&[], &[], 0.0), Err(Bb84Error::EmptyKey));
        assert_eq!(
            distiller.distill(&[true], &[true, false], 0.0),
            Err(Bb84Error::KeyLengthMismatch {
                sender: 1,
                receiver: 2
            })
        );
    }

    #[test]
    fn test_rejects_bad_compression() {
        let config = DistillerConfig {
            compression: 1.5,
            ..DistillerConfig::default()
        };
        assert!(matches!(
            CascadeToeplitz::new(config),
            Err(Bb84Error::InvalidProbability(_))
        ));
    }
}
