//! Reusable UI component modules.

pub mod can;
