//! Synthetic-data filter
//!
//! Rows whose description carries a demo/test marker never reach the
//! ledger unless the settings file sets `demo_mode`. Runs after the
//! duplicate guard and before persistence.

/// Markers that flag a row as synthetic. Matched as case-insensitive
/// substrings of the description.
pub const SYNTHETIC_MARKERS: [&str; 6] =
    ["demo", "test", "sample", "ejemplo", "ficticio", "prueba"];

/// Return the marker that flags this description as synthetic, if any
pub fn find_synthetic_marker(description: &str) -> Option<&'static str> {
    let lowered = description.to_lowercase();
    SYNTHETIC_MARKERS
        .iter()
        .find(|marker| lowered.contains(*marker))
        .copied()
}
