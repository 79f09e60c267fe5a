// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod catalog_repository;
pub mod memory_store;
pub mod review_repository;
pub mod schema;
pub mod store;
pub mod user_repository;

pub use catalog_repository::*;
pub use memory_store::*;
pub use review_repository::*;
pub use store::*;
pub use user_repository::*;
