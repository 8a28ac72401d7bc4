pub mod model;

pub use model::{Transaction, TxPool};
