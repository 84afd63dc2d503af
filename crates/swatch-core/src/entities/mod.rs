//! Entity structs for all Swatch domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `swatch-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod audit;
mod brand;
mod grid;
mod marker;
mod page;
mod storage;
mod user;

pub use audit::AuditEntry;
pub use brand::{Brand, BrandRef};
pub use grid::Grid;
pub use marker::{Marker, MarkerStorage};
pub use page::{ColorPage, PageColor};
pub use storage::SimpleStorage;
pub use user::User;
