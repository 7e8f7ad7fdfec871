//! Shared types used across all courier crates.

pub mod types;

pub use types::{Peer, PeerType, RpcMetadata};
