use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ring::digest::{Context, SHA256};

fn hash_chunk(chunk: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(chunk);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// Packs bits little-endian within each byte; the last byte is zero-padded.
pub fn bools_to_bytes(bools: &[bool]) -> Vec<u8> {
    bools
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &bit)| acc | ((bit as u8) << i))
        })
        .collect()
}

/// SHA-256 over the bit length followed by the packed bits. Both parties
/// publish this to confirm they hold the same key.
pub fn key_digest(key: &[bool]) -> Vec<u8> {
    let mut message = (key.len() as u64).to_be_bytes().to_vec();
    message.extend(bools_to_bytes(key));
    hash_chunk(&message)
}

// Row i, column j of the Toeplitz matrix is diagonal[i + n - 1 - j], so the
// whole out_len x n matrix is fixed by n + out_len - 1 bits.
fn toeplitz_hash(shared_key: &[bool], diagonal: &[bool], out_len: usize) -> Vec<bool> {
    let n = shared_key.len();
    (0..out_len)
        .map(|i| {
            shared_key
                .iter()
                .enumerate()
                .fold(false, |hash_bit, (j, &key_bit)| {
                    hash_bit ^ (key_bit & diagonal[i + n - 1 - j])
                })
        })
        .collect()
}

fn generate_toeplitz_diagonal(n: usize, out_len: usize, seed: u64) -> Vec<bool> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..(n + out_len).saturating_sub(1)).map(|_| rng.gen()).collect()
}

/// Compresses `shared_key` to `out_len` bits with a Toeplitz matrix expanded
/// from the public `seed`. Identical inputs give identical outputs on both sides.
pub fn apply_privacy_amplification(shared_key: &[bool], out_len: usize, seed: u64) -> Vec<bool> {
    if shared_key.is_empty() || out_len == 0 {
        return Vec::new();
    }
    let diagonal = generate_toeplitz_diagonal(shared_key.len(), out_len, seed);
    toeplitz_hash(shared_key, &diagonal, out_len)
}
