//! Line-oriented bulk import format.
//!
//! Each non-blank line is `number,color_name,hex,brand,location[,column,row]`.
//! Five fields place the marker in the simple storage named by `location`;
//! seven fields place it at `(column, row)` in the grid named by `location`.
//! Lines starting with `#` are comments. A brand written `id:<brand-id>`
//! refers to an existing brand by ID.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::entities::BrandRef;
use crate::placement::{ImportError, ImportRow, PlacementErrorKind, PlacementRequest};

const SIMPLE_FIELDS: usize = 5;
const GRID_FIELDS: usize = 7;

/// How import text is split into fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportOptions {
    pub delimiter: char,
    /// Skip the first non-blank, non-comment line.
    pub has_header: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: false,
        }
    }
}

/// Parse import text into rows.
///
/// Every line is checked; problems from all lines are reported together.
///
/// # Errors
///
/// [`PlacementErrorKind::Ambiguous`] for a line with the wrong number of
/// fields, [`PlacementErrorKind::Malformed`] for a bad hex color, blank
/// required field, or non-numeric position. The kind of the first problem
/// is reported.
pub fn parse_import(text: &str, options: &ImportOptions) -> Result<Vec<ImportRow>, ImportError> {
    let mut rows = Vec::new();
    let mut problems = Vec::new();
    let mut kind = None;
    let mut header_pending = options.has_header;

    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }

        match parse_line(idx + 1, trimmed, options.delimiter) {
            Ok(row) => rows.push(row),
            Err((problem_kind, problem)) => {
                kind.get_or_insert(problem_kind);
                problems.push(format!("Row {}: {problem}", idx + 1));
            }
        }
    }

    match kind {
        Some(kind) => Err(ImportError { kind, problems }),
        None => Ok(rows),
    }
}

fn parse_line(
    line: usize,
    text: &str,
    delimiter: char,
) -> Result<ImportRow, (PlacementErrorKind, String)> {
    let fields: Vec<&str> = text.split(delimiter).map(str::trim).collect();
    if fields.len() != SIMPLE_FIELDS && fields.len() != GRID_FIELDS {
        return Err((
            PlacementErrorKind::Ambiguous,
            format!(
                "expected {SIMPLE_FIELDS} or {GRID_FIELDS} fields, found {}",
                fields.len()
            ),
        ));
    }

    let number = required(fields[0], "marker number")?;
    let color_name = required(fields[1], "color name")?;
    let hex = color::normalize_hex(fields[2])
        .map_err(|err| (PlacementErrorKind::Malformed, err.to_string()))?;
    let brand = BrandRef::parse(fields[3]);
    let location = required(fields[4], "location")?;

    let placement = if fields.len() == GRID_FIELDS {
        let column = position(fields[5], "column")?;
        let row = position(fields[6], "row")?;
        PlacementRequest::grid(location, column, row)
    } else {
        PlacementRequest::simple(location)
    };

    Ok(ImportRow {
        line,
        number,
        color_name,
        hex,
        brand,
        placement,
    })
}

fn required(value: &str, what: &str) -> Result<String, (PlacementErrorKind, String)> {
    if value.is_empty() {
        Err((PlacementErrorKind::Malformed, format!("{what} is empty")))
    } else {
        Ok(value.to_string())
    }
}

fn position(value: &str, what: &str) -> Result<u32, (PlacementErrorKind, String)> {
    value.parse::<u32>().map_err(|_| {
        (
            PlacementErrorKind::Malformed,
            format!("{what} must be a whole number, got '{value}'"),
        )
    })
}
