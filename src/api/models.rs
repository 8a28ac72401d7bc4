use crate::blockchain::{Block, BlockData, Chain, PUZZLE_STEP_BUDGET};
use crate::transaction::{Transaction, TxPool};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::sync::Mutex;
use std::time::Duration;

/// Runtime knobs read from the environment at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Cap on puzzle-search steps per mining request (`PUZZLE_BUDGET`).
    pub puzzle_budget: u64,
    /// Per-peer timeout for consensus fetches (`PEER_TIMEOUT_SECS`).
    pub peer_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let puzzle_budget = env::var("PUZZLE_BUDGET")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.puzzle_budget);
        let peer_timeout = env::var("PEER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.peer_timeout);
        Self {
            puzzle_budget,
            peer_timeout,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle_budget: PUZZLE_STEP_BUDGET,
            peer_timeout: Duration::from_secs(5),
        }
    }
}

/// Peer id -> base URL of the peer's API. Populated only via the
/// registration endpoint; consensus reads it to know whom to query.
pub type PeerSet = HashMap<String, String>;

/// Shared application state: the in-memory chain, the pending-transaction
/// pool and the peer set, each behind its own mutex.
pub struct AppState {
    pub chain: Mutex<Chain>,
    pub pool: Mutex<TxPool>,
    pub peers: Mutex<PeerSet>,
    pub http: reqwest::Client,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let http = reqwest::Client::builder()
            .timeout(settings.peer_timeout)
            .build()
            .expect("build http client");
        Self {
            chain: Mutex::new(Chain::new()),
            pool: Mutex::new(TxPool::new()),
            peers: Mutex::new(PeerSet::new()),
            http,
            settings,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/* ---------- Chain API Models ---------- */

/// Full chain, previous_hash included. Also the shape peers fetch and decode
/// during consensus, so it derives both serde directions.
#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Legacy external read shape: one block without its previous_hash.
#[derive(Serialize, Deserialize)]
pub struct BlockView {
    pub index: u64,
    pub timestamp: i64,
    pub data: BlockData,
    pub hash: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Deserialize)]
pub struct MineRequest {
    pub miner_address: String,
}

/// Legacy mine contract: `hash` carries the hash of the block *preceding*
/// the mined one, not the mined block's own hash.
#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub index: u64,
    pub timestamp: i64,
    pub data: BlockData,
    pub hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub accepted: bool,
    pub pending: usize,
}

#[derive(Serialize)]
pub struct PoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Peer / Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterPeerRequest {
    pub id: String,
    pub address: String,
}

#[derive(Serialize)]
pub struct PeersResponse {
    pub count: usize,
    pub peers: PeerSet,
}

#[derive(Serialize, Deserialize)]
pub struct ConsensusResponse {
    pub replaced: bool,
    pub length: usize,
    pub peers_queried: usize,
    pub peers_failed: usize,
}
