//! Body data: kinds, orbital elements, validated snapshots and the built-in catalog.

pub mod body;
pub mod catalog;
pub mod snapshot;
