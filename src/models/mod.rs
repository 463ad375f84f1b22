// src/models/mod.rs
pub mod assignment;
pub mod feedback;
pub mod student;
pub mod submission;
pub mod user;
