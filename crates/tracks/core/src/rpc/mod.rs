//! JSON-RPC serving of the pod log.

mod server;
pub use server::TracksRpc;
