//! Presentation helpers shared by every shell.
//!
//! Color and font values are stored as plain strings on quotes and settings;
//! these modules turn them into something a renderer can use.

pub mod color;
pub mod font;
pub mod share;
