//! Helpers shared by unit tests.

pub mod socket_guard;

/// Body of one EIA page: `rows` data rows, a total, and an optional version.
#[must_use]
pub fn page_body(total: u64, rows: usize, api_version: Option<&str>) -> String {
    let data: Vec<serde_json::Value> = (0..rows)
        .map(|row| serde_json::json!({"period": format!("{}", 2001 + row), "receipts-btu": row}))
        .collect();
    let mut body = serde_json::json!({
        "response": {"total": total, "dateFormat": "YYYY", "frequency": "annual", "data": data},
        "request": {"command": "/v2/electricity/electric-power-operational-data/data/", "params": {}},
    });
    if let Some(version) = api_version {
        body["apiVersion"] = serde_json::Value::String(version.to_string());
    }
    body.to_string()
}
