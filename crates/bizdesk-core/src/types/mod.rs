//! Shared plain types.

pub mod pagination;
