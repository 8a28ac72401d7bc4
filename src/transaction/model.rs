use serde::{Deserialize, Serialize};

/// A transfer record. No ownership or signature validation happens anywhere
/// in this node; whatever is submitted is recorded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

/// Pending transactions awaiting inclusion in the next mined block, in
/// arrival order. Shared access goes through the `Mutex` in `AppState`, so a
/// drain is atomic with respect to concurrent submitters.
#[derive(Debug, Default)]
pub struct TxPool {
    pending: Vec<Transaction>,
}

impl TxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transaction unconditionally.
    pub fn submit(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Take every queued transaction, leaving the pool empty. Called exactly
    /// once per mined block so no transaction is counted twice.
    pub fn drain_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Transaction, TxPool};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn tx(n: u64) -> Transaction {
        Transaction {
            from: format!("sender-{n}"),
            to: "B".into(),
            amount: n,
        }
    }

    #[test]
    fn submit_keeps_arrival_order() {
        let mut pool = TxPool::new();
        pool.submit(tx(1));
        pool.submit(tx(2));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.pending()[0], tx(1));
        assert_eq!(pool.pending()[1], tx(2));
    }

    #[test]
    fn second_drain_is_empty() {
        let mut pool = TxPool::new();
        pool.submit(tx(1));
        pool.submit(tx(2));
        assert_eq!(pool.drain_all().len(), 2);
        assert!(pool.drain_all().is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn concurrent_submits_racing_drains_lose_nothing() {
        const SUBMITTERS: u64 = 4;
        const PER_SUBMITTER: u64 = 250;

        let pool = Arc::new(Mutex::new(TxPool::new()));
        let mut handles = Vec::new();
        for s in 0..SUBMITTERS {
            let pool = Arc::clone(&pool);
            handles.push(thread::spawn(move || {
                for n in 0..PER_SUBMITTER {
                    pool.lock().unwrap().submit(tx(s * PER_SUBMITTER + n));
                }
            }));
        }

        // Drain repeatedly while the submitters run.
        let mut drained = Vec::new();
        for _ in 0..50 {
            drained.extend(pool.lock().unwrap().drain_all());
            thread::yield_now();
        }
        for handle in handles {
            handle.join().unwrap();
        }
        drained.extend(pool.lock().unwrap().drain_all());

        // Every submitted transaction ends up in exactly one drain.
        assert_eq!(drained.len() as u64, SUBMITTERS * PER_SUBMITTER);
        let amounts: HashSet<u64> = drained.iter().map(|t| t.amount).collect();
        assert_eq!(amounts.len() as u64, SUBMITTERS * PER_SUBMITTER);
    }
}
