// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod catalog_service;
pub mod review_service;
pub mod review_validator;

pub use catalog_service::*;
pub use review_service::*;
pub use review_validator::*;
