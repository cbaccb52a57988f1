use crate::core::ConsoleError;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A Firestore document as returned by the REST API.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Builds a document body from a JSON object.
    pub fn from_json(data: &JsonValue) -> Result<Self, ConsoleError> {
        Ok(Self {
            fields: json_to_fields(data)?,
            ..Default::default()
        })
    }

    /// The document fields as plain JSON.
    pub fn to_json(&self) -> Result<JsonValue, ConsoleError> {
        fields_to_json(&self.fields)
    }

    /// The last path segment of `name`.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Value {
    #[serde(flatten)]
    pub value_type: ValueType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    StringValue(String),
    // Sent as a decimal string.
    IntegerValue(String),
    DoubleValue(f64),
    BooleanValue(bool),
    MapValue(MapValue),
    ArrayValue(ArrayValue),
    NullValue(()),
    TimestampValue(String),
    GeoPointValue(GeoPoint),
    // base64
    BytesValue(String),
    ReferenceValue(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListCollectionIdsRequest {
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListCollectionIdsResponse {
    #[serde(default)]
    pub collection_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

fn custom(message: String) -> ConsoleError {
    ConsoleError::SerializationError(serde_json::Error::custom(message))
}

/// Converts typed Firestore fields to a JSON object.
///
/// Integers become JSON numbers. Timestamps, bytes and references become strings, and
/// geo points become `{latitude, longitude}` objects.
pub fn fields_to_json(fields: &BTreeMap<String, Value>) -> Result<JsonValue, ConsoleError> {
    let mut map = serde_json::Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), value_to_json(value)?);
    }
    Ok(JsonValue::Object(map))
}

fn value_to_json(value: &Value) -> Result<JsonValue, ConsoleError> {
    Ok(match &value.value_type {
        ValueType::StringValue(s)
        | ValueType::TimestampValue(s)
        | ValueType::BytesValue(s)
        | ValueType::ReferenceValue(s) => JsonValue::String(s.clone()),
        ValueType::IntegerValue(s) => {
            let i: i64 = s
                .parse()
                .map_err(|e| custom(format!("Failed to parse integer string '{}': {}", s, e)))?;
            JsonValue::Number(i.into())
        }
        ValueType::DoubleValue(d) => serde_json::Number::from_f64(*d)
            .map(JsonValue::Number)
            .ok_or_else(|| custom(format!("Invalid f64 value: {}", d)))?,
        ValueType::BooleanValue(b) => JsonValue::Bool(*b),
        ValueType::MapValue(map) => fields_to_json(&map.fields)?,
        ValueType::ArrayValue(array) => JsonValue::Array(
            array
                .values
                .iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        ValueType::NullValue(_) => JsonValue::Null,
        ValueType::GeoPointValue(point) => {
            serde_json::json!({ "latitude": point.latitude, "longitude": point.longitude })
        }
    })
}

/// Converts a JSON object to typed Firestore fields.
pub fn json_to_fields(data: &JsonValue) -> Result<BTreeMap<String, Value>, ConsoleError> {
    match data {
        JsonValue::Object(map) => map
            .iter()
            .map(|(k, v)| Ok::<_, ConsoleError>((k.clone(), json_to_value(v)?)))
            .collect(),
        _ => Err(custom("Can only set objects as documents".to_string())),
    }
}

fn json_to_value(value: &JsonValue) -> Result<Value, ConsoleError> {
    let value_type = match value {
        JsonValue::Null => ValueType::NullValue(()),
        JsonValue::Bool(b) => ValueType::BooleanValue(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueType::IntegerValue(i.to_string())
            } else if let Some(f) = n.as_f64() {
                ValueType::DoubleValue(f)
            } else {
                return Err(custom(format!("Unsupported number type: {}", n)));
            }
        }
        JsonValue::String(s) => ValueType::StringValue(s.clone()),
        JsonValue::Array(values) => ValueType::ArrayValue(ArrayValue {
            values: values.iter().map(json_to_value).collect::<Result<_, _>>()?,
        }),
        JsonValue::Object(_) => ValueType::MapValue(MapValue {
            fields: json_to_fields(value)?,
        }),
    };
    Ok(Value { value_type })
}
