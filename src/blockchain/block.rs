use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::blockchain::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// Payload of a block: the puzzle solution that gated its creation plus the
/// transactions it records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub proof_of_work: u64,
    pub transactions: Vec<Transaction>,
}

/// A single block in the chain, hashed once at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub data: BlockData,
    pub previous_hash: String,
    pub hash: String, // Cached hash of the block
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(
            0,
            BlockData {
                proof_of_work: GENESIS_PROOF,
                transactions: Vec::new(),
            },
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Create a new block, stamping the current time and computing its hash.
    pub fn new(index: u64, data: BlockData, previous_hash: String) -> Self {
        let mut block = Self {
            index,
            timestamp: Utc::now().timestamp(),
            data,
            previous_hash,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the SHA-256 hash of this block using its fields (excluding the
    /// `hash` field itself). The payload is serialized deterministically as
    /// JSON and included in the preimage; any change in this formatting
    /// changes every resulting hash, so keep it stable.
    pub fn compute_hash(&self) -> String {
        let data_json = serde_json::to_string(&self.data).expect("serialize block data");
        let preimage = format!(
            "{}:{}:{}:{}",
            self.index, self.timestamp, data_json, self.previous_hash
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest)
    }

    /// True iff this block is the direct successor of `previous`.
    pub fn is_linked_to(&self, previous: &Block) -> bool {
        self.previous_hash == previous.hash && self.index == previous.index + 1
    }
}
