use log::debug;
use thiserror::Error;

use super::{Block, BlockData, Chain, ChainError, NETWORK_ADDRESS, REWARD_AMOUNT};
use crate::transaction::{Transaction, TxPool};

#[derive(Debug, Error, PartialEq)]
pub enum MineError {
    /// The puzzle search exceeded its step budget. Reported as a mining
    /// failure instead of hanging the node on an adversarial last proof.
    #[error("puzzle search gave up after {steps} steps (last_proof={last_proof})")]
    PuzzleExhausted { last_proof: u64, steps: u64 },
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Find the proof of work for the next block: starting at `last_proof + 1`,
/// return the first integer divisible by both 42 and `last_proof`. This is a
/// toy puzzle, not a security mechanism; the search cost grows with
/// `lcm(42, last_proof)`, hence the step budget.
pub fn solve_puzzle(last_proof: u64, max_steps: u64) -> Result<u64, MineError> {
    let mut i = last_proof + 1;
    let mut steps: u64 = 0;
    loop {
        // checked_rem: a zero last proof never divides anything, so it
        // burns the budget instead of panicking.
        if i % 42 == 0 && i.checked_rem(last_proof) == Some(0) {
            return Ok(i);
        }
        steps += 1;
        if steps >= max_steps {
            return Err(MineError::PuzzleExhausted { last_proof, steps });
        }
        i += 1;
    }
}

/// Mine one block: solve the puzzle seeded by the tail's proof, reward the
/// miner, drain the whole pool into the new block, and append it. The caller
/// holds exclusive access to both the chain and the pool for the duration,
/// which serializes mining and makes the drain atomic with the append.
pub fn mine(
    chain: &mut Chain,
    pool: &mut TxPool,
    miner_address: &str,
    puzzle_budget: u64,
) -> Result<Block, MineError> {
    let (last_proof, next_index, previous_hash) = {
        let tail = chain.tail();
        (tail.data.proof_of_work, tail.index + 1, tail.hash.clone())
    };

    let proof = solve_puzzle(last_proof, puzzle_budget)?;
    debug!("MINER - solved puzzle: last_proof={last_proof} proof={proof}");

    // Reward goes through the pool so it rides in the same drain as the
    // pending transactions.
    pool.submit(Transaction {
        from: NETWORK_ADDRESS.to_string(),
        to: miner_address.to_string(),
        amount: REWARD_AMOUNT,
    });
    let transactions = pool.drain_all();

    let block = Block::new(
        next_index,
        BlockData {
            proof_of_work: proof,
            transactions,
        },
        previous_hash,
    );
    chain.append(block.clone())?;
    Ok(block)
}
