use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A single layout control in a report template.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportControl {
    pub control_type: String,
    pub purpose: String,
    pub height: Number,
    pub width: Number,
    /// Fields the service sends that are not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parameter a report accepts, as described by the reporting service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_multiple_values: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_single_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Option<ScalarValue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ReportMetadata {
    #[serde(default)]
    pub controls: Vec<ReportControl>,
    #[serde(default)]
    pub parameters: Vec<ReportParameter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    /// Kept as `serde_json::Number` so integers stay integers on the wire.
    Number(Number),
    String(String),
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value.into())
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

/// Map item reference carried by a map-extent parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapExtentItem {
    #[serde(rename = "type")]
    pub item_type: String,
    /// `[[xmin, ymin], [xmax, ymax]]`
    pub extent: [[Number; 2]; 2],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapExtentValue {
    #[serde(rename = "$type")]
    pub type_name: String,
    pub item: MapExtentItem,
    #[serde(rename = "itemData", default)]
    pub item_data: Value,
}

/// Value submitted for a named report parameter.
///
/// Untagged on the wire: a JSON object is a map extent, an array is a list,
/// anything else is a scalar.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParameterValue {
    MapExtent(MapExtentValue),
    List(Vec<ScalarValue>),
    Scalar(ScalarValue),
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Scalar(value.into())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Scalar(value.into())
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Scalar(value.into())
    }
}

/// Everything a report run accepts besides the item id. Unset fields are left
/// for the service to default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, ParameterValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
