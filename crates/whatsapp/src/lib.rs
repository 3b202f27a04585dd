//! WhatsApp Cloud API adapter: inbound webhook normalization and the
//! outbound send client.
//!
//! The inbound side flattens the platform's nested event-notification
//! JSON into per-contact messages; the outbound side is a thin reqwest
//! wrapper around `POST /<version>/<phone_number_id>/messages` that
//! reports the upstream status and body verbatim.

pub mod client;
pub mod error;
pub mod inbound;
pub mod verify;

pub use {
    client::{CloudApiClient, SendResponse},
    error::{Error, Result},
    inbound::{NormalizedMessage, extract_messages, normalize},
    verify::verify_webhook_subscription,
};
