use schemars::schema::RootSchema;
use schemars::schema_for;

use horizon_common::Snapshot;

/// JSON Schema describing `news_data.json`.
pub fn snapshot_schema() -> RootSchema {
    schema_for!(Snapshot)
}

pub fn snapshot_schema_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&snapshot_schema())
}
