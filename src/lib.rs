// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: User reviews of books and movies, kept unique by the application
// validator and by the user_reviews_unique index

pub mod config;
pub mod db;
pub mod demo;
pub mod errors;
pub mod models;
pub mod services;
