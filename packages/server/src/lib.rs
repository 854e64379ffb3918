//! Tsunagi chat relay server library.
//!
//! A broadcast channel, direct messages and nudges over HTTP and WebSocket,
//! backed by a concurrent in-memory store with write-through JSON persistence.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
