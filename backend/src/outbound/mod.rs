//! Outbound adapters implementing the storage ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a bb8 pool.
//! - **memory**: a process-local store used when no database is configured.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
