//! ChatRepository implementations.

pub mod inmemory;

pub use inmemory::InMemoryChatRepository;
