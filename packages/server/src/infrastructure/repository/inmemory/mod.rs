//! In-memory authoritative chat store with write-through persistence.

mod chat;
mod collection;

pub use chat::InMemoryChatRepository;
