mod brand;
mod color;
mod grid;
mod marker;
mod page;
mod storage;
mod user;

pub use brand::BrandCommands;
pub use color::ColorCommands;
pub use grid::GridCommands;
pub use marker::{MarkerAddArgs, MarkerCommands, MarkerListArgs, MarkerUpdateArgs, PlacementArgs};
pub use page::PageCommands;
pub use storage::StorageCommands;
pub use user::UserCommands;
