//! Inbound adapters translating external requests into driving-port calls.
//!
//! [`http`] serves the REST API; [`csv`] decodes uploaded files and encodes
//! exports for it and for the import binary.

pub mod csv;
pub mod http;
