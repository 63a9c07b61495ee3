//! Paramguard Core Types
//!
//! This crate provides the foundational types used throughout paramguard:
//! - Value types (the Value enum with all scalar types and lists)
//! - Type tags (runtime type classification for type constraints)
//! - The Params ordered parameter map and the params! macro

mod value;

pub use value::*;
