pub mod blocks;
pub mod document;
pub mod entities;
pub mod error;
pub mod posts;
pub mod slug;
