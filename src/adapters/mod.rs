// Adapters: concrete implementations of the domain ports and data sources.

pub mod ai;
pub mod catalog;
pub mod lunar;
