pub mod chat;
pub mod upload;
pub mod viewer;
