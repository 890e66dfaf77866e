use schemars::schema_for;

use super::loader::SettingsFile;

/// JSON schema of the settings file, pretty printed.
pub fn settings_schema() -> serde_json::Result<String> {
    let schema = schema_for!(SettingsFile);
    serde_json::to_string_pretty(&schema)
}
