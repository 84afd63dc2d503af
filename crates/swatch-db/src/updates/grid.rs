//! Grid update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GridUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl GridUpdate {
    /// Whether the update changes the grid's dimensions.
    #[must_use]
    pub const fn resizes(&self) -> bool {
        self.columns.is_some() || self.rows.is_some()
    }
}

#[derive(Default)]
pub struct GridUpdateBuilder(GridUpdate);

impl GridUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(GridUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn columns(mut self, val: u32) -> Self {
        self.0.columns = Some(val);
        self
    }

    #[must_use]
    pub fn rows(mut self, val: u32) -> Self {
        self.0.rows = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> GridUpdate {
        self.0
    }
}
