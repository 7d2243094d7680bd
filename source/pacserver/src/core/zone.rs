//! Zone loader (C2): parses the CSV-shaped zone feed.
//!
//! Grounded in `original_source/internal/ProviderIPMap.py`: per-line CSV
//! parsing with 3 required fields, comment/blank-line skipping, and
//! warn-and-skip recovery for malformed lines.

use std::io::BufRead;
use std::path::Path;

use crate::core::error::LoadError;
use crate::core::prefix::Ipv4Prefix;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub prefix: Ipv4Prefix,
    pub template_name: String,
}

/// Parse zone records out of any line-oriented byte source. Malformed lines
/// are logged and skipped rather than failing the whole parse.
pub fn parse_zones<R: std::io::Read>(reader: R) -> Vec<Zone> {
    let mut zones = Vec::new();
    let buffered = std::io::BufReader::new(reader);

    for (line_no, raw_line) in buffered.lines().enumerate() {
        let Ok(raw_line) = raw_line else {
            tracing::warn!(line = line_no, "unable to read zone line, skipping");
            continue;
        };
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with('/') {
            continue;
        }

        match parse_zone_line(line) {
            Ok(zone) => zones.push(zone),
            Err(message) => {
                tracing::warn!(line = line_no, %message, "malformed zone line, skipping");
            }
        }
    }

    zones
}

fn parse_zone_line(line: &str) -> Result<Zone, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(line.as_bytes());

    let record = reader
        .records()
        .next()
        .ok_or_else(|| "empty CSV record".to_string())?
        .map_err(|e| format!("unable to parse CSV: {e}"))?;

    if record.len() != 3 {
        return Err(format!("expected 3 fields, got {}", record.len()));
    }

    let ip_str = record[0].trim();
    let len_str = record[1].trim();
    let template_name = record[2].trim().to_string();

    let prefix = Ipv4Prefix::from_strings(ip_str, len_str).map_err(|e| e.to_string())?;

    Ok(Zone { prefix, template_name })
}

/// Load the zone file at `path`. Failure to open the file is fatal (§7,
/// `ZonesLoadIO`); malformed individual lines are not.
pub async fn load_zones(path: &Path) -> Result<Vec<Zone>, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::ZonesIo {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_zones(std::io::Cursor::new(bytes)))
}
