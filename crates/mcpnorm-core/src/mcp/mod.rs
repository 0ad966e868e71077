//! MCP (Model Context Protocol) server configuration normalization
//!
//! Turns a server description written in any of the common tool conventions
//! into the canonical schema described by [`NormalizedServerConfig`]. The
//! pipeline is pure: extract candidates, classify each one's transport, build
//! the canonical entry, name it.

pub mod builder;
pub mod candidate;
pub mod coerce;
pub mod keys;
pub mod normalizer;
pub mod spec;
pub mod transport;

pub use builder::SkipReason;
pub use candidate::{Candidate, ExtractionStrategy, extract_candidates};
pub use normalizer::{normalize_document, normalize_to_array, resolve_name};
pub use spec::{Endpoint, NormalizedServerConfig, to_json_array};
pub use transport::{Transport, classify};
