use super::{Block, Chain};

/// Longest-chain rule over already-fetched peer snapshots. Returns the
/// snapshot to adopt, or `None` when the local chain stays canonical. A peer
/// chain must be strictly longer than the current best to win, so
/// equal-length chains are never adopted and the first of several maxima in
/// iteration order takes precedence.
pub fn resolve(local: &Chain, peer_snapshots: &[Vec<Block>]) -> Option<Vec<Block>> {
    let mut best_len = local.len();
    let mut longest: Option<&Vec<Block>> = None;
    for snapshot in peer_snapshots {
        if snapshot.len() > best_len {
            best_len = snapshot.len();
            longest = Some(snapshot);
        }
    }
    longest.cloned()
}
