//! Domain logic
//!
//! `hotspot` is the pure detector. `alert`, `filter` and `enrichment` are
//! caller-side helpers the HTTP layer applies around it.

pub mod hotspot;
pub mod alert;
pub mod filter;
pub mod enrichment;
