pub mod categories;
pub mod editor;
pub mod error;
pub mod posts;
pub mod related;
pub mod repos;
