//! Common routines for handling input data.
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// The key which selects the variant of an internally tagged table
const MODEL_TAG: &str = "model";

/// Recursively overlay the keys of `overrides` onto `base`.
///
/// Nested tables are merged key by key; any other value (including arrays) replaces the value in
/// `base` outright. A nested table which sets a different `model` from the one in `base` also
/// replaces it outright, as the fields of one model don't apply to another.
pub fn merge_toml_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (value, base.get_mut(&key)) {
            (toml::Value::Table(table), Some(toml::Value::Table(base_table)))
                if !switches_model(base_table, &table) =>
            {
                merge_toml_tables(base_table, table);
            }
            (value, _) => {
                base.insert(key, value);
            }
        }
    }
}

/// Whether `overrides` selects a different model from `base`
fn switches_model(base: &toml::Table, overrides: &toml::Table) -> bool {
    overrides
        .get(MODEL_TAG)
        .is_some_and(|model| base.get(MODEL_TAG) != Some(model))
}

/// Convert a TOML table into the given type
pub fn deserialise_table<T: DeserializeOwned>(table: &toml::Table) -> Result<T> {
    let raw = toml::to_string(table)?;
    Ok(toml::from_str(&raw)?)
}
