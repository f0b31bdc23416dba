use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct YmlSettings {
    pub alias: String,
    pub description: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub defaults: Map<String, Value>,
}
