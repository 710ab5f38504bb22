//! Flutter-facing bridge for the AIspiration core.

pub mod api;
