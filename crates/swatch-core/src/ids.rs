//! ID prefix constants.
//!
//! IDs are generated by the database as `{prefix}-{8 hex chars}`,
//! e.g. `mkr-a3f8b2c1`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_BRAND: &str = "brd";
pub const PREFIX_GRID: &str = "grd";
pub const PREFIX_STORAGE: &str = "sto";
pub const PREFIX_MARKER: &str = "mkr";
pub const PREFIX_PAGE: &str = "pag";
pub const PREFIX_AUDIT: &str = "aud";

/// Every prefix in use, for tests and ID sniffing.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_BRAND,
    PREFIX_GRID,
    PREFIX_STORAGE,
    PREFIX_MARKER,
    PREFIX_PAGE,
    PREFIX_AUDIT,
];

/// Whether `value` has the shape of an ID with the given prefix.
#[must_use]
pub fn has_prefix(value: &str, prefix: &str) -> bool {
    value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_generated_ids() {
        assert!(has_prefix("grd-0a1b2c3d", PREFIX_GRID));
        assert!(!has_prefix("grd-0a1b2c3", PREFIX_GRID));
        assert!(!has_prefix("sto-0a1b2c3d", PREFIX_GRID));
        assert!(!has_prefix("Top Drawer", PREFIX_GRID));
    }
}
