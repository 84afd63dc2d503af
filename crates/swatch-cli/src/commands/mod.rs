pub mod audit;
pub mod brand;
pub mod color;
pub mod dispatch;
pub mod grid;
pub mod import;
pub mod marker;
pub mod page;
pub mod shared;
pub mod storage;
pub mod user;
