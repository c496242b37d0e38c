use sha2::{Digest, Sha256};

use crate::types::Participant;

/// Uniform index into a pool of `pool_len` entries.
///
/// `index = uint128(sha256(entropy)[0..16]) % pool_len`. Returns `None` for
/// an empty pool.
pub fn pick_index(entropy: &[u8], pool_len: usize) -> Option<usize> {
    if pool_len == 0 {
        return None;
    }
    let digest: [u8; 32] = Sha256::digest(entropy).into();
    let mut ticket_bytes = [0u8; 16];
    ticket_bytes.copy_from_slice(&digest[0..16]);
    let ticket = u128::from_be_bytes(ticket_bytes);
    Some((ticket % pool_len as u128) as usize)
}

pub fn pick_winner<'a>(pool: &'a [Participant], entropy: &[u8]) -> Option<&'a Participant> {
    pick_index(entropy, pool.len()).map(|i| &pool[i])
}

/// Entropy for a draw: the caller-supplied seed bound to the game and to the
/// number of draws already made in it, so reusing a seed does not replay the
/// same pick.
pub fn draw_entropy(seed: &[u8], game_id: u64, draw_count: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(game_id.to_be_bytes());
    hasher.update(draw_count.to_be_bytes());
    hasher.finalize().into()
}
