pub mod decoder;
pub mod domain;
pub mod infrastructure;
pub mod vocabulary;
