//! Data Transfer Objects (DTOs) for the chat relay.
//!
//! DTOs are organized by protocol:
//! - `http`: request bodies and JSON responses of the HTTP API
//! - `websocket`: events pushed to and received from live connections

pub mod conversion;
pub mod http;
pub mod websocket;
