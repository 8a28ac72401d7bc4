use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};
use thiserror::Error;

use super::models::{
    AppState, ChainResponse, ConsensusResponse, PeersResponse, RegisterPeerRequest,
};
use crate::blockchain::{Block, Chain, ChainError, consensus};

#[derive(Debug, Error)]
pub enum PeerError {
    /// Transport-level failure: connect error, timeout, non-2xx status.
    #[error("peer unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    /// The peer answered but its chain could not be decoded or failed
    /// structural validation.
    #[error("peer returned a malformed chain: {0}")]
    Malformed(String),
}

/// Register a peer's API base URL under an identifier. Re-registering an id
/// overwrites its address.
#[post("/peers/")]
pub async fn register_peer(
    state: web::Data<AppState>,
    body: web::Json<RegisterPeerRequest>,
) -> impl Responder {
    let id = body.id.trim().to_string();
    let address = body.address.trim().to_string();
    if id.is_empty() || address.is_empty() {
        return HttpResponse::BadRequest().body("id and address required");
    }

    let count = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        peers.insert(id.clone(), address.clone());
        peers.len()
    };
    info!("PEERS - registered {id} at {address} ({count} total)");
    HttpResponse::Ok().json(serde_json::json!({ "registered": id, "count": count }))
}

/// List the known peers.
#[get("/peers/")]
pub async fn list_peers(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PeersResponse {
        count: peers.len(),
        peers: peers.clone(),
    })
}

/// Fetch one peer's chain snapshot and structurally validate it. Any failure
/// here only excludes this peer from the current consensus round.
async fn fetch_peer_chain(http: &reqwest::Client, base: &str) -> Result<Vec<Block>, PeerError> {
    let url = format!("{}/api/v1/chain/", base.trim_end_matches('/'));
    let resp = http.get(&url).send().await?.error_for_status()?;
    let body: ChainResponse = resp
        .json()
        .await
        .map_err(|e| PeerError::Malformed(e.to_string()))?;
    Chain::validate(&body.chain).map_err(|e: ChainError| PeerError::Malformed(e.to_string()))?;
    Ok(body.chain)
}

/// Run one consensus round: snapshot every registered peer's chain (failing
/// peers are skipped), apply the longest-chain rule, and swap in a strictly
/// longer winner. All network traffic happens before any lock is taken.
#[post("/consensus/")]
pub async fn run_consensus(state: web::Data<AppState>) -> impl Responder {
    let peers: Vec<(String, String)> = {
        let peers = state.peers.lock().expect("mutex poisoned");
        peers.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    };

    let mut snapshots = Vec::new();
    let mut failed = 0usize;
    for (id, address) in &peers {
        match fetch_peer_chain(&state.http, address).await {
            Ok(chain) => {
                debug!("CONSENSUS - peer {id} answered with length {}", chain.len());
                snapshots.push(chain);
            }
            Err(e) => {
                warn!("CONSENSUS - skipping peer {id}: {e}");
                failed += 1;
            }
        }
    }

    let (replaced, length) = {
        let mut chain = state.chain.lock().expect("mutex poisoned");
        match consensus::resolve(&chain, &snapshots) {
            Some(longer) => match chain.replace(longer) {
                Ok(()) => {
                    info!("CONSENSUS - adopted peer chain of length {}", chain.len());
                    (true, chain.len())
                }
                Err(e) => {
                    // Snapshots were validated on receipt, so this is a
                    // should-not-happen guard.
                    warn!("CONSENSUS - refusing winning chain: {e}");
                    (false, chain.len())
                }
            },
            None => {
                debug!("CONSENSUS - local chain stays canonical");
                (false, chain.len())
            }
        }
    };

    HttpResponse::Ok().json(ConsensusResponse {
        replaced,
        length,
        peers_queried: peers.len(),
        peers_failed: failed,
    })
}

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::api::models::{AppState, ConsensusResponse};
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn register_peer_stores_address() {
        let state = web::Data::new(AppState::default());
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(api::init_routes))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/peers/")
            .set_json(serde_json::json!({ "id": "n2", "address": "http://127.0.0.1:8081" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let peers = state.peers.lock().unwrap();
        assert_eq!(peers.get("n2").map(String::as_str), Some("http://127.0.0.1:8081"));
    }

    #[actix_web::test]
    async fn consensus_with_unreachable_peer_keeps_local_chain() {
        let state = web::Data::new(AppState::default());
        state.peers.lock().unwrap().insert(
            "dead".into(),
            // Reserved port on localhost; the fetch fails fast and the peer
            // is skipped rather than failing the round.
            "http://127.0.0.1:1".into(),
        );
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(api::init_routes))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/consensus/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: ConsensusResponse =
            serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert!(!body.replaced);
        assert_eq!(body.length, 1);
        assert_eq!(body.peers_queried, 1);
        assert_eq!(body.peers_failed, 1);
    }
}
