//! Repository modules implementing operations for all Swatch entities.
//!
//! Each module adds methods to `SwatchService` via `impl SwatchService` blocks.

pub mod audit;
pub mod brand;
pub mod grid;
pub mod import;
pub mod marker;
pub mod page;
pub mod snapshot;
pub mod storage;
pub mod user;
