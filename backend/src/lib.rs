//! Sleep tracking backend.
//!
//! Users log sleep sessions and a sleep goal; every read derives duration and
//! goal attainment. The crate is laid out hexagonally: [`domain`] holds the
//! model, ports and services, [`inbound`] the HTTP and CSV adapters, and
//! [`outbound`] the PostgreSQL and in-memory storage adapters.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
