// JSON export of collected hotels

use crate::error::Result;
use hotelmap_scanner::Hotel;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;
use tracing::info;

const INDENT: &[u8] = b"    ";

/// Serialize `hotels` as a JSON array indented by four spaces.
pub fn hotels_to_json(hotels: &[Hotel]) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    hotels.serialize(&mut serializer)?;

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Replace the file at `path` with the JSON array of `hotels`.
///
/// The document is built in memory before the file is touched, so a
/// serialization failure leaves an existing file as it was.
pub fn write_hotels_json(path: &Path, hotels: &[Hotel]) -> Result<()> {
    let json = hotels_to_json(hotels)?;
    fs::write(path, json)?;
    info!("Wrote {} hotels to {}", hotels.len(), path.display());
    Ok(())
}

pub fn read_hotels_json(path: &Path) -> Result<Vec<Hotel>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
