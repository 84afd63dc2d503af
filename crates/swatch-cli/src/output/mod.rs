use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let options = table_options();
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items, options)),
        Value::Object(map) => {
            let headers = ["key", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&headers, &rows, options))
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&headers, &rows, options))
        }
    }
}

fn render_array_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&headers, &rows, options);
    }

    // Column order follows the first row, so `id` and `number` lead.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Object(map) => storage_cell(map).unwrap_or_else(|| compact_json(value)),
        Value::Array(_) => compact_json(value),
    }
}

/// `grid grd-… (2, 3)` / `simple sto-…` for serialized marker storage.
fn storage_cell(map: &serde_json::Map<String, Value>) -> Option<String> {
    match map.get("mode")?.as_str()? {
        "grid" => Some(format!(
            "grid {} ({}, {})",
            map.get("grid_id")?.as_str()?,
            map.get("column")?,
            map.get("row")?
        )),
        "simple" => Some(format!("simple {}", map.get("storage_id")?.as_str()?)),
        _ => None,
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("<invalid-json>"))
}
