//! JSON-RPC API definitions for serving indexed pods.
//!
//! The server implementation lives in `tracks-core`; enable the `client`
//! feature to generate the matching `TracksApiClient`.

mod jsonrpsee;
#[cfg(feature = "client")]
pub use jsonrpsee::TracksApiClient;
pub use jsonrpsee::TracksApiServer;
