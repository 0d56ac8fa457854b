//! Async client for the OESS circuit provisioning backend.
//!
//! OESS exposes its data model through a handful of CGI endpoints
//! (`data.cgi`, `interface.cgi`, `circuit.cgi`). Every read wraps its
//! payload in a `{ "results": [...] }` envelope and is loose about whether
//! numbers arrive as JSON numbers or strings. This crate hides both:
//!
//! - **[`OessClient`]**: workgroup-scoped HTTP client with basic auth and a
//!   per-request timeout taken from [`TransportConfig`].
//! - **[`models`]**: raw response records, deserialized leniently.
//! - **[`Error`]**: every failure mode of the transport and the envelope.

pub mod client;
mod de;
pub mod error;
pub mod models;
pub mod transport;

pub use client::OessClient;
pub use error::Error;
pub use models::{
    OessCircuit, OessEndpoint, OessInterface, OessLink, OessNode, ProvisionCircuit,
    ProvisionEndpoint, StateFields,
};
pub use transport::{BasicAuth, TlsMode, TransportConfig};
