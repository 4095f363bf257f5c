//! Severity mapping from the six-level scale to vendor names.

use serde_json::Value;

/// Map a level name to the vendor severity string. Both vendor shapes use
/// the same names (GCP's spelling): trace/debug→DEBUG, info→INFO,
/// warn→WARNING, error→ERROR, fatal→CRITICAL, anything else→DEFAULT.
pub fn map_severity(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" => "DEBUG",
        "info" => "INFO",
        "warn" => "WARNING",
        "error" => "ERROR",
        "fatal" => "CRITICAL",
        _ => "DEFAULT",
    }
}

/// Severity for a record's `level` field, which may be a name or an
/// internal numeric level (10/20/30/40/50/60 for
/// trace/debug/info/warn/error/fatal).
pub fn severity_for(level: Option<&Value>) -> &'static str {
    match level {
        Some(Value::String(name)) => map_severity(name),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(10) | Some(20) => "DEBUG",
            Some(30) => "INFO",
            Some(40) => "WARNING",
            Some(50) => "ERROR",
            Some(60) => "CRITICAL",
            _ => "DEFAULT",
        },
        _ => "DEFAULT",
    }
}
