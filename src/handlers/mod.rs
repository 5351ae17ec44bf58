//! HTTP handlers: generic resource CRUD plus the fixed per-kind listings.

pub mod fixed;
pub mod resource;
