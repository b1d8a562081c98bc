//! Text rendering of server results for the REPL

use launcher_client::ClientError;
use serde_json::Value;

fn check(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        "✗"
    }
}

fn count(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}

/// Error line with the server-side detail appended when present.
pub fn error(e: &ClientError) -> String {
    match e.details() {
        Some(details) => format!("✗ {}: {}", e, details),
        None => format!("✗ {}", e),
    }
}

pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Plain strings without quotes, everything else as pretty JSON.
pub fn content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => pretty(other),
    }
}

pub fn file_list(fs_name: Option<&str>, files: &Value) -> String {
    let mut out = format!("Files ({}):", fs_name.unwrap_or("local"));
    match files.as_array() {
        Some(items) if !items.is_empty() => {
            for item in items {
                out.push_str(&format!("\n  - {}", content(item)));
            }
        }
        _ => out.push_str("\n  (empty)"),
    }
    out
}

pub fn file_info(path: &str, info: &Value) -> String {
    format!(
        "File info ({}):\n  Size: {} bytes\n  Created: {}\n  Modified: {}",
        path,
        info["size"],
        content(&info["created"]),
        content(&info["modified"]),
    )
}

pub fn fs_stats(fs_name: Option<&str>, stats: &Value) -> String {
    format!(
        "File system stats ({}):\n  Files: {}\n  Total size: {} bytes\n  Average size: {:.2} bytes",
        fs_name.unwrap_or("local"),
        stats["fileCount"].as_u64().unwrap_or(0),
        stats["totalSize"].as_u64().unwrap_or(0),
        stats["averageSize"].as_f64().unwrap_or(0.0),
    )
}

/// Render `{ <key>: [ {id|name, status} ], count }` listings.
pub fn entries(title: &str, listing: &Value, key: &str) -> String {
    let mut out = format!("{}:", title);
    match listing[key].as_array() {
        Some(items) if !items.is_empty() => {
            for item in items {
                let label = item
                    .get("id")
                    .or_else(|| item.get("name"))
                    .map(content)
                    .unwrap_or_default();
                out.push_str(&format!("\n  - {}: {}", label, content(&item["status"])));
            }
        }
        _ => out.push_str("\n  (none)"),
    }
    out
}

pub fn system_status(status: &Value) -> String {
    let mut out = format!(
        "System status:\n  Initialized: {}\n  File systems: {}\n  Components: {}",
        check(status["initialized"].as_bool().unwrap_or(false)),
        count(&status["fsServices"]),
        count(&status["components"]),
    );
    if let Some(fs) = status["fsServices"].as_array() {
        for entry in fs {
            out.push_str(&format!("\n    - {}", content(&entry["name"])));
        }
    }
    out
}

pub fn server_info(info: &Value) -> String {
    let mut out = format!(
        "Server info:\n  Connected: {}\n  Server initialized: {}\n  \
         File systems: {}\n  Components: {}",
        check(info["client"]["connected"].as_bool().unwrap_or(false)),
        check(info["status"]["initialized"].as_bool().unwrap_or(false)),
        count(&info["fsList"]),
        count(&info["components"]),
    );

    out.push_str("\n\nAvailable file systems:");
    for fs in info["fsList"].as_array().into_iter().flatten() {
        out.push_str(&format!(
            "\n  - {} ({})",
            content(&fs["name"]),
            content(&fs["type"])
        ));
    }

    out.push_str("\n\nAvailable components:");
    for component in info["components"].as_array().into_iter().flatten() {
        out.push_str(&format!("\n  - {}", content(component)));
    }

    out.push_str(&format!(
        "\n\nConnection:\n  Endpoint: {}\n  Requests sent: {}",
        content(&info["client"]["endpoint"]),
        info["client"]["requestCount"],
    ));
    out
}
