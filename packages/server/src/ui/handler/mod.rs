//! Request handlers.

mod error;
mod http;
mod websocket;

pub use http::{
    drain_nudges, health_check, list_direct_messages, list_messages, list_users, login,
    register, send_direct_message, send_message, send_nudge, update_profile,
};
pub use websocket::websocket_handler;
