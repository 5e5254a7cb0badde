pub mod document_repository;
pub mod session_repository;
