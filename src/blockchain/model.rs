use thiserror::Error;

use super::Block;
use crate::blockchain::GENESIS_PREVIOUS_HASH;

#[derive(Debug, Error, PartialEq)]
pub enum ChainError {
    /// A constructed block does not chain to the current tail. The miner
    /// always builds a correctly linked block, so hitting this indicates an
    /// internal logic error (or a chain swap between build and append).
    #[error("block #{index} does not link to the current tail")]
    InvalidLinkage { index: u64 },
    /// A candidate chain failed structural validation before a wholesale swap.
    #[error("candidate chain is invalid: {0}")]
    InvalidChain(&'static str),
}

/// Simple in-memory chain, always holding at least the genesis block.
#[derive(Debug)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Initialize a new chain seeded with a genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Return the last block in the chain.
    pub fn tail(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain should always have at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Append a block that must be the direct successor of the current tail.
    pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
        if !block.is_linked_to(self.tail()) {
            return Err(ChainError::InvalidLinkage { index: block.index });
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Swap the entire chain for `blocks`, refusing structurally invalid
    /// candidates. Used by consensus when a strictly longer peer chain wins.
    pub fn replace(&mut self, blocks: Vec<Block>) -> Result<(), ChainError> {
        Self::validate(&blocks)?;
        self.blocks = blocks;
        Ok(())
    }

    /// Structural validation of a block sequence: genesis shape, pairwise
    /// linkage, and hash integrity of every block. Peer genesis timestamps
    /// differ from ours, so this checks shape, not equality with the local
    /// genesis.
    pub fn validate(blocks: &[Block]) -> Result<(), ChainError> {
        let genesis = blocks
            .first()
            .ok_or(ChainError::InvalidChain("chain is empty"))?;
        if genesis.index != 0 || genesis.previous_hash != GENESIS_PREVIOUS_HASH {
            return Err(ChainError::InvalidChain("bad genesis block"));
        }
        if genesis.hash != genesis.compute_hash() {
            return Err(ChainError::InvalidChain("genesis hash mismatch"));
        }

        for pair in blocks.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if !current.is_linked_to(prev) {
                return Err(ChainError::InvalidChain("broken linkage"));
            }
            if current.hash != current.compute_hash() {
                return Err(ChainError::InvalidChain("block hash mismatch"));
            }
        }

        Ok(())
    }

    /// Validate this chain's own structure.
    pub fn is_valid(&self) -> bool {
        Self::validate(&self.blocks).is_ok()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
