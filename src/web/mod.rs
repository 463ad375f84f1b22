// src/web/mod.rs
pub mod auth_handlers;
pub mod mw_auth;
pub mod mw_teacher;
pub mod routes;
pub mod teacher_handlers;
pub mod tracker_handlers;
