//! Row types and DTOs, one module per table.

pub mod session;
pub mod subscription;
pub mod template;
pub mod user;
