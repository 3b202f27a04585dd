//! HTTP surface of the relay: webhook verify/receive, conversation and
//! message queries, and the send endpoint.

pub mod api;
pub mod server;
pub mod state;
pub mod webhook;

pub use {
    server::{build_app, start_gateway},
    state::AppState,
};
