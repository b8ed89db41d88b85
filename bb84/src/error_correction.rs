use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::errors::{Bb84Error, Result};

/// Passes always run, whatever they find.
const PASSES: usize = 4;
/// Upper bound on passes once extra ones are being added.
const MAX_PASSES: usize = 16;
/// Consecutive passes without a correction that end the run.
const QUIET_PASSES: usize = 2;
/// Error rate assumed when the caller leaves the block size to us.
const ASSUMED_QBER: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Receiver key after correction, index-aligned with the sender key.
    pub corrected: Vec<bool>,
    /// Parity bits announced over the public channel.
    pub leaked_parities: usize,
}

// One Cascade pass: a public permutation cut into blocks.
struct Pass {
    blocks: Vec<Vec<usize>>,
    block_of: Vec<usize>,
    parity_known: Vec<bool>,
}

impl Pass {
    fn new(order: &[usize], block_size: usize) -> Self {
        let blocks: Vec<Vec<usize>> = order.chunks(block_size).map(<[usize]>::to_vec).collect();
        let mut block_of = vec![0; order.len()];
        for (b, block) in blocks.iter().enumerate() {
            for &i in block {
                block_of[i] = b;
            }
        }
        let parity_known = vec![false; blocks.len()];
        Self {
            blocks,
            block_of,
            parity_known,
        }
    }
}

/// First-pass block size for a key of `len` bits at error rate `qber`.
///
/// Aims for about 0.73 expected errors per block, floored at a 1% rate and
/// kept between 2 and half the key.
pub fn initial_block_size(len: usize, qber: f64) -> usize {
    let size = (0.73 / qber.max(0.01)).ceil() as usize;
    size.clamp(2, (len / 2).max(2))
}

/// Cascade reconciliation of the receiver's key against the sender's.
///
/// Pass 0 cuts the key into blocks of `block_size` (0 derives one from an
/// assumed 5% error rate); later passes reshuffle positions from `seed` and
/// double the block size up to half the key. Every block whose parities differ
/// is bisected and the located bit flipped. A flip changes the parity of the
/// blocks holding that position in every other pass, so those blocks are
/// queued again and any error they were hiding is corrected in turn.
///
/// At least four passes run; further passes are added until two in a row
/// correct nothing. Each block parity counts as leaked once, each bisection
/// step once.
pub fn cascade_correction(
    alice_bits: &[bool],
    bob_bits: &[bool],
    block_size: usize,
    seed: u64,
) -> Result<Reconciliation> {
    if alice_bits.len() != bob_bits.len() {
        return Err(Bb84Error::KeyLengthMismatch {
            sender: alice_bits.len(),
            receiver: bob_bits.len(),
        });
    }

    let len = alice_bits.len();
    let mut corrected_bits = bob_bits.to_vec();
    let mut leaked_parities = 0;
    if len == 0 {
        return Ok(Reconciliation {
            corrected: corrected_bits,
            leaked_parities,
        });
    }

    let first_block = if block_size == 0 {
        initial_block_size(len, ASSUMED_QBER)
    } else {
        block_size
    };
    let max_block = first_block.min(len).max((len + 1) / 2);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..len).collect();
    let mut passes: Vec<Pass> = Vec::new();
    let mut quiet = 0;

    for pass in 0..MAX_PASSES {
        if pass > 0 {
            order.shuffle(&mut rng);
        }
        let size = first_block.saturating_mul(1 << pass.min(3)).min(max_block);
        passes.push(Pass::new(&order, size));

        let mut queue: VecDeque<(usize, usize)> =
            (0..passes[pass].blocks.len()).map(|b| (pass, b)).collect();
        let mut corrections = 0;

        while let Some((p, b)) = queue.pop_front() {
            if !passes[p].parity_known[b] {
                passes[p].parity_known[b] = true;
                leaked_parities += 1;
            }
            let block = &passes[p].blocks[b];
            if calculate_parity(alice_bits, block) == calculate_parity(&corrected_bits, block) {
                continue;
            }
            let (index, queries) = locate_error(alice_bits, &corrected_bits, block);
            leaked_parities += queries;
            corrected_bits[index] = !corrected_bits[index];
            corrections += 1;

            for (other, earlier) in passes.iter().enumerate() {
                if other != p {
                    queue.push_back((other, earlier.block_of[index]));
                }
            }
        }

        quiet = if corrections == 0 { quiet + 1 } else { 0 };
        if pass + 1 >= PASSES && quiet >= QUIET_PASSES {
            break;
        }
    }

    Ok(Reconciliation {
        corrected: corrected_bits,
        leaked_parities,
    })
}

// Bisects a block whose parities differ. Returns the erroneous position and the
// number of extra parities disclosed on the way.
fn locate_error(alice_bits: &[bool], bob_bits: &[bool], block: &[usize]) -> (usize, usize) {
    let mut window = block;
    let mut queries = 0;
    while window.len() > 1 {
        let (left, right) = window.split_at(window.len() / 2);
        queries += 1;
        window = if calculate_parity(alice_bits, left) != calculate_parity(bob_bits, left) {
            left
        } else {
            right
        };
    }
    (window[0], queries)
}

fn calculate_parity(bits: &[bool], positions: &[usize]) -> bool {
    positions.iter().fold(false, |acc, &i| acc ^ bits[i])
}
