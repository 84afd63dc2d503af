//! Simple storage update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

#[derive(Default)]
pub struct StorageUpdateBuilder(StorageUpdate);

impl StorageUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(StorageUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> StorageUpdate {
        self.0
    }
}
