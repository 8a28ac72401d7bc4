use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, NewTxRequest, NewTxResponse, PoolResponse};
use crate::transaction::Transaction;

/// Submit a new transaction into the pool. No validation of sender,
/// recipient or amount is performed; submission always succeeds.
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let tx = Transaction {
        from: body.from.clone(),
        to: body.to.clone(),
        amount: body.amount,
    };

    let pending = {
        let mut pool = state.pool.lock().expect("mutex poisoned");
        pool.submit(tx);
        pool.len()
    };

    info!(
        "TX - accepted {} -> {} ({}); pool size now {}",
        body.from, body.to, body.amount, pending
    );
    HttpResponse::Ok().json(NewTxResponse {
        accepted: true,
        pending,
    })
}

/// List transactions still waiting to be mined.
#[get("/pool/")]
pub async fn get_pool(state: web::Data<AppState>) -> impl Responder {
    let pool = state.pool.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PoolResponse {
        size: pool.len(),
        transactions: pool.pending().to_vec(),
    })
}
