//! Marker update builder.
//!
//! Storage changes go through `SwatchService::move_marker`, which runs the
//! placement rules; this builder covers everything else.

use serde::Serialize;
use swatch_core::entities::BrandRef;
use swatch_core::enums::ColorFamily;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MarkerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<BrandRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_override: Option<Option<ColorFamily>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

#[derive(Default)]
pub struct MarkerUpdateBuilder(MarkerUpdate);

impl MarkerUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(MarkerUpdate::default())
    }

    #[must_use]
    pub fn number(mut self, val: impl Into<String>) -> Self {
        self.0.number = Some(val.into());
        self
    }

    #[must_use]
    pub fn color_name(mut self, val: impl Into<String>) -> Self {
        self.0.color_name = Some(val.into());
        self
    }

    #[must_use]
    pub fn hex(mut self, val: impl Into<String>) -> Self {
        self.0.hex = Some(val.into());
        self
    }

    #[must_use]
    pub fn brand(mut self, val: Option<BrandRef>) -> Self {
        self.0.brand = Some(val);
        self
    }

    #[must_use]
    pub fn family_override(mut self, val: Option<ColorFamily>) -> Self {
        self.0.family_override = Some(val);
        self
    }

    #[must_use]
    pub fn notes(mut self, val: Option<String>) -> Self {
        self.0.notes = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> MarkerUpdate {
        self.0
    }
}
