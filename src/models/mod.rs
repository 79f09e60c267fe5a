// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod book;
pub mod movie;
pub mod review;
pub mod user;

pub use book::*;
pub use movie::*;
pub use review::*;
pub use user::*;
