//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some` fields
//! generate SET clauses in the dynamic UPDATE SQL. The update struct is serialized
//! as the audit `detail` payload (changed fields only).

pub mod grid;
pub mod marker;
pub mod storage;
