//! Загрузка набора фоновых маркеров из JSON.
//!
//! Формат файла — массив определений:
//! ```json
//! [
//!   { "delta_to_payload": 336, "hex": "01 00 00 00 80 08 00 00" },
//!   { "delta_to_payload": 332, "hex": "80 08 00 00 02 00 00 00" }
//! ]
//! ```

use std::{fs, path::Path};

use log::info;
use srs_types::{Marker, MarkerDef};

use crate::{ExtractError, ExtractResult};

/// Разбирает JSON набора маркеров.
pub fn parse_marker_set(json: &str) -> ExtractResult<Vec<Marker>> {
    let defs: Vec<MarkerDef> = serde_json::from_str(json)?;

    if defs.is_empty() {
        return Err(ExtractError::invalid_input(
            "marker set is empty; at least one background marker is required",
        ));
    }

    Ok(Marker::parse_all(&defs)?)
}

/// Читает и разбирает файл набора маркеров.
pub fn load_marker_set<P: AsRef<Path>>(path: P) -> ExtractResult<Vec<Marker>> {
    let path = path.as_ref();
    let markers = parse_marker_set(&fs::read_to_string(path)?)?;

    info!("Loaded {} background marker(s) from {path:?}", markers.len());

    Ok(markers)
}

/// Эталонный набор в том же JSON-формате.
pub fn reference_marker_json() -> ExtractResult<String> {
    Ok(serde_json::to_string_pretty(&MarkerDef::reference_set())?)
}
