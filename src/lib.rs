// src/lib.rs
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod templates;
pub mod web;
