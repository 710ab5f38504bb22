//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Turn screen actions into validated repository calls.
//! - Keep FFI callers away from SQL and row layout.

pub mod category_service;
pub mod quote_service;
pub mod seed;
pub mod settings_service;
