//! # swatch-core
//!
//! Core types, ID prefixes, and error types for Swatch, plus the two pieces
//! of pure business logic every other crate leans on:
//! - [`color`]: hex → HSL conversion and color-family classification
//! - [`placement`]: grid bounds/occupancy validation and bulk-import planning
//!
//! Nothing in this crate performs I/O. Persistence lives in `swatch-db`,
//! which feeds the placement rules an [`placement::InventorySnapshot`].

pub mod color;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod import;
pub mod placement;
pub mod responses;
