pub mod block;
pub mod consensus;
pub mod miner;
pub mod model;

pub use block::{Block, BlockData};
pub use model::{Chain, ChainError};

/// Puzzle solution baked into the genesis payload.
pub const GENESIS_PROOF: u64 = 42;

/// Previous-hash sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Sender identifier used for mining rewards.
pub const NETWORK_ADDRESS: &str = "network";

/// Amount paid to the miner per mined block.
pub const REWARD_AMOUNT: u64 = 42;

/// Default cap on puzzle-search steps before mining gives up.
/// Keeps a pathological last proof from pinning a blocking thread forever.
pub const PUZZLE_STEP_BUDGET: u64 = 10_000_000;
