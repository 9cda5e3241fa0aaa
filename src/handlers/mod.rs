//! HTTP handlers

pub mod health;
pub mod stops;
pub mod dashboard;
pub mod queries;
pub mod predict;
