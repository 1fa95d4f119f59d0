//! Domain types and pure logic for the dynamic report platform.
//!
//! Everything in this crate is deterministic and I/O-free: schema
//! definitions and validation, Excel field inference, record coercion,
//! column statistics, chart-spec heuristics, and the clarification
//! state machine. Persistence lives in `informes-db`, HTTP in
//! `informes-api`.

pub mod charts;
pub mod clarification;
pub mod error;
pub mod inference;
pub mod pagination;
pub mod records;
pub mod roles;
pub mod schema;
pub mod stats;
pub mod types;
