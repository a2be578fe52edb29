//! Session data stores
//!
//! Two independent append-only ledgers (pages, links) plus an unrelated
//! ad hoc record store for user data captured during event callbacks.
//! Each has its own explicit clear operation; none of them share state.

pub mod export;
pub mod links;
pub mod pages;
pub mod records;

pub use export::export_jsonl;
pub use links::LinkLedger;
pub use pages::PageLedger;
pub use records::RecordStore;
