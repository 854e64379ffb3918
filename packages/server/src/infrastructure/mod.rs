//! Infrastructure layer: implementations of the domain traits.

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod persistence;
pub mod repository;
