//! Network layer - server list fetching
//!
//! The Network actor receives fetch commands and sends back decoded lists.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::FetchError;
