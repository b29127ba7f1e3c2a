// Application layer - the ledger use cases on top of a document store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
