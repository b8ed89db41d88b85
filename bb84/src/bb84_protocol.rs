use log::{info, warn};
use rand::Rng;

use crate::config::EstimatorConfig;
use crate::distill::{FinalKey, KeyDistiller};
use crate::errors::Result;
use crate::qber::{
    decide_security, discard_sample, estimate_error_rate, select_sample, ErrorEstimate, Verdict,
};
use crate::sifting::{sift_trial, SiftedKeys};
use crate::trial::Trial;

/// Everything derived from one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolReport {
    pub raw_len: usize,
    pub sifted: SiftedKeys,
    /// Disclosed positions, as indices into the sifted key.
    pub sample: Vec<usize>,
    pub estimate: ErrorEstimate,
    pub verdict: Verdict,
    /// Sender's sifted key without the disclosed positions.
    pub remaining_sender: Vec<bool>,
    /// Receiver's sifted key without the disclosed positions.
    pub remaining_receiver: Vec<bool>,
    /// Present only for secure runs that leave key material after disclosure.
    pub final_key: Option<FinalKey>,
}

/// Sifts, estimates the error rate on a disclosed sample, decides, and on a
/// secure verdict hands the undisclosed key and the estimated rate to `distiller`.
///
/// Fails with `EmptySample` when sifting leaves nothing to disclose.
pub fn run_protocol<D, R>(
    trial: &Trial,
    config: &EstimatorConfig,
    distiller: &D,
    rng: &mut R,
) -> Result<ProtocolReport>
where
    D: KeyDistiller + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;

    let sifted = sift_trial(trial)?;
    let sample = select_sample(sifted.len(), &config.sample, rng)?;
    let estimate = estimate_error_rate(&sifted.sender, &sifted.receiver, &sample)?;
    let verdict = decide_security(estimate.rate, config.threshold);

    let remaining_sender = discard_sample(&sifted.sender, &sample);
    let remaining_receiver = discard_sample(&sifted.receiver, &sample);

    let final_key = match verdict {
        Verdict::Secure if !remaining_sender.is_empty() => {
            Some(distiller.distill(&remaining_sender, &remaining_receiver, estimate.rate)?)
        }
        Verdict::Secure => {
            warn!("disclosure consumed the whole sifted key; nothing left to distill");
            None
        }
        Verdict::CompromisedOrNoisy => {
            warn!(
                "aborting: {} is not below threshold {:.1}%",
                estimate,
                config.threshold * 100.0
            );
            None
        }
    };

    info!(
        "{} raw -> {} sifted -> {} disclosed, {}: {}",
        trial.len(),
        sifted.len(),
        sample.len(),
        estimate,
        verdict
    );

    Ok(ProtocolReport {
        raw_len: trial.len(),
        sifted,
        sample,
        estimate,
        verdict,
        remaining_sender,
        remaining_receiver,
        final_key,
    })
}
