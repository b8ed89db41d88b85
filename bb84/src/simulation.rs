//! Randomized BB84 runs over a classical model of the quantum channel.
//!
//! Each position: the sender picks a random bit and basis and prepares the
//! matching state. With probability `eavesdrop_ratio` an intercept-resend
//! attacker measures it in a random basis and resends what they saw. With
//! probability `noise` the channel flips it. The receiver measures in a random
//! basis.
//!
//! Full interception costs the attacker a wrong basis half the time, and a wrong
//! basis gives the receiver a random bit, so the sifted error rate sits near 25%.

use log::debug;
use rand::Rng;

use crate::bb84_states::{random_bit, BB84State, MeasurementBasis};
use crate::config::ChannelModel;
use crate::errors::{Bb84Error, Result};
use crate::trial::Trial;

/// Sends one prepared qubit through the channel and returns what the receiver reads.
pub fn transmit<R: Rng + ?Sized>(
    mut state: BB84State,
    receiver_basis: MeasurementBasis,
    channel: &ChannelModel,
    rng: &mut R,
) -> bool {
    if channel.eavesdrop_ratio > 0.0 && rng.gen_bool(channel.eavesdrop_ratio) {
        let eve_basis = MeasurementBasis::random(rng);
        let eve_bit = state.measure(eve_basis, rng);
        state = BB84State::prepare(eve_bit, eve_basis);
    }
    if channel.noise > 0.0 && rng.gen_bool(channel.noise) {
        state = state.flip();
    }
    state.measure(receiver_basis, rng)
}

/// Generates an `n`-position trial.
pub fn simulate_trial<R: Rng + ?Sized>(
    n: usize,
    channel: &ChannelModel,
    rng: &mut R,
) -> Result<Trial> {
    channel.validate()?;
    if n == 0 {
        return Err(Bb84Error::ShapeMismatch {
            sender_bases: 0,
            sender_bits: 0,
            receiver_bases: 0,
            receiver_bits: 0,
        });
    }

    let mut sender_bases = Vec::with_capacity(n);
    let mut sender_bits = Vec::with_capacity(n);
    let mut receiver_bases = Vec::with_capacity(n);
    let mut receiver_bits = Vec::with_capacity(n);

    for _ in 0..n {
        let bit = random_bit(rng);
        let basis = MeasurementBasis::random(rng);
        let receiver_basis = MeasurementBasis::random(rng);
        let received = transmit(BB84State::prepare(bit, basis), receiver_basis, channel, rng);

        sender_bits.push(bit);
        sender_bases.push(basis);
        receiver_bases.push(receiver_basis);
        receiver_bits.push(received);
    }

    debug!(
        "simulated {} positions (noise {}, eavesdrop ratio {})",
        n, channel.noise, channel.eavesdrop_ratio
    );
    Trial::new(sender_bases, sender_bits, receiver_bases, receiver_bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qber::mismatch_positions;
    use crate::sifting::sift_trial;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sifted_error_rate(channel: &ChannelModel, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let trial = simulate_trial(4000, channel, &mut rng).unwrap();
        let sifted = sift_trial(&trial).unwrap();
        mismatch_positions(&sifted.sender, &sifted.receiver).len() as f64 / sifted.len() as f64
    }

    #[test]
    fn test_clean_channel_has_no_errors() {
        assert_eq!(sifted_error_rate(&ChannelModel::default(), 1), 0.0);
    }

    #[test]
    fn test_noise_shows_up_in_sifted_key() {
        let rate = sifted_error_rate(&ChannelModel::noisy(0.1), 2);
        assert!(rate > 0.06 && rate < 0.14, "rate: {}", rate);
    }

    #[test]
    fn test_intercept_resend_gives_quarter_errors() {
        let rate = sifted_error_rate(&ChannelModel::intercepted(1.0), 3);
        assert!(rate > 0.2 && rate < 0.3, "rate: {}", rate);
    }

    #[test]
    fn test_about_half_survives_sifting() {
        let mut rng = StdRng::seed_from_u64(4);
        let trial = simulate_trial(4000, &ChannelModel::default(), &mut rng).unwrap();
        let ratio = sift_trial(&trial).unwrap().sift_ratio(trial.len());
        assert!(ratio > 0.45 && ratio < 0.55, "ratio: {}", ratio);
    }

    #[test]
    fn test_rejects_bad_channel() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            simulate_trial(10, &ChannelModel::intercepted(2.0), &mut rng),
            Err(Bb84Error::InvalidProbability(2.0))
        );
        assert!(simulate_trial(0, &ChannelModel::default(), &mut rng).is_err());
    }
}
