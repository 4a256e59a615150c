//! Description of a backend data store.
//!
//! A [`StoreConfig`] is built from the generic key/value structure found in
//! application config files and can be turned back into it without loss.

use serde_json::{Map, Value};
use thiserror::Error;

pub const KEY_TYPE: &str = "type";
pub const KEY_VERSION: &str = "version";
pub const KEY_URI: &str = "uri";
pub const KEY_UNIQUE_ID: &str = "uniqueid";
pub const KEY_NAME: &str = "name";
pub const KEY_DEFAULT_LAYERS: &str = "defaultLayers";
pub const KEY_STYLE: &str = "style";

/// Malformed structured input for a [`StoreConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key is absent or holds an empty string.
    #[error("Store config is missing required field '{0}'")]
    MissingField(&'static str),

    /// A recognized key holds a value of the wrong JSON type.
    #[error("Store config field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// The structured input is not a JSON object at all.
    #[error("Store config must be an object")]
    NotAnObject,
}

/// An immutable, validated description of a data store.
///
/// `type`, `uri` and `uniqueid` are mandatory. Optional keys that were absent
/// in the input stay absent in [`StoreConfig::to_structured`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    store_type: String,
    version: Option<String>,
    uri: String,
    unique_id: String,
    name: Option<String>,
    default_layers: Option<Vec<String>>,
    style: Option<Vec<Map<String, Value>>>,
}

impl StoreConfig {
    /// Builds a config from its structured form.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::MissingField`] if `type`, `uri` or `uniqueid` is missing or empty.
    /// * [`ValidationError::InvalidField`] if a recognized key has the wrong type.
    pub fn from_structured(dict: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            store_type: required_str(dict, KEY_TYPE)?,
            version: optional_str(dict, KEY_VERSION)?,
            uri: required_str(dict, KEY_URI)?,
            unique_id: required_str(dict, KEY_UNIQUE_ID)?,
            name: optional_str(dict, KEY_NAME)?,
            default_layers: default_layers(dict)?,
            style: style(dict)?,
        })
    }

    /// Same as [`StoreConfig::from_structured`] but accepts any JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(dict) => Self::from_structured(dict),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Reproduces the recognized keys with their original values.
    pub fn to_structured(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert(KEY_TYPE.into(), Value::String(self.store_type.clone()));
        if let Some(version) = &self.version {
            dict.insert(KEY_VERSION.into(), Value::String(version.clone()));
        }
        dict.insert(KEY_URI.into(), Value::String(self.uri.clone()));
        dict.insert(KEY_UNIQUE_ID.into(), Value::String(self.unique_id.clone()));
        if let Some(name) = &self.name {
            dict.insert(KEY_NAME.into(), Value::String(name.clone()));
        }
        if let Some(layers) = &self.default_layers {
            let layers = layers.iter().cloned().map(Value::String).collect();
            dict.insert(KEY_DEFAULT_LAYERS.into(), Value::Array(layers));
        }
        if let Some(style) = &self.style {
            let style = style.iter().cloned().map(Value::Object).collect();
            dict.insert(KEY_STYLE.into(), Value::Array(style));
        }
        dict
    }

    pub fn store_type(&self) -> &str {
        &self.store_type
    }
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
    pub fn uri(&self) -> &str {
        &self.uri
    }
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn default_layers(&self) -> &[String] {
        self.default_layers.as_deref().unwrap_or_default()
    }
    pub fn style(&self) -> &[Map<String, Value>] {
        self.style.as_deref().unwrap_or_default()
    }
}

fn required_str(dict: &Map<String, Value>, key: &'static str) -> Result<String, ValidationError> {
    match optional_str(dict, key)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(key)),
    }
}

fn optional_str(
    dict: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ValidationError> {
    match dict.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            field: key,
            expected: "a string",
        }),
    }
}

fn default_layers(dict: &Map<String, Value>) -> Result<Option<Vec<String>>, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field: KEY_DEFAULT_LAYERS,
        expected: "a list of strings",
    };
    match dict.get(KEY_DEFAULT_LAYERS) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned).ok_or(invalid.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid),
    }
}

fn style(dict: &Map<String, Value>) -> Result<Option<Vec<Map<String, Value>>>, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field: KEY_STYLE,
        expected: "a list of objects",
    };
    match dict.get(KEY_STYLE) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_object().cloned().ok_or(invalid.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn full_store() -> Map<String, Value> {
        object(json!({
            "type": "geojson",
            "version": "1",
            "uri": "all.geojson",
            "uniqueid": "63602599-3ad3-439f-9c49-3c8a7579933b",
            "name": "Simple",
            "defaultLayers": ["points", "lines"],
            "style": [{ "fillColor": "#FF0000", "strokeWidth": 2 }]
        }))
    }

    #[test]
    fn test_full_config_round_trips() {
        let dict = full_store();
        let config = StoreConfig::from_structured(&dict).unwrap();
        assert_eq!(config.store_type(), "geojson");
        assert_eq!(config.default_layers(), ["points", "lines"]);
        assert_eq!(config.style().len(), 1);

        assert_eq!(config.to_structured(), dict);
        let again = StoreConfig::from_structured(&config.to_structured()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_varied_inputs_round_trip() {
        let inputs = [
            json!({ "type": "gpkg", "uri": "haiti.gpkg", "uniqueid": "h" }),
            json!({
                "type": "geojson",
                "uri": "données/île.geojson",
                "uniqueid": "地図-1",
                "name": "Île-à-Vache ✓"
            }),
            json!({
                "type": "wfs",
                "uri": "https://example.org/wfs?service=WFS",
                "uniqueid": "w",
                "defaultLayers": [],
                "style": []
            }),
            json!({
                "type": "geojson",
                "version": "2.1",
                "uri": "a.geojson",
                "uniqueid": "nested",
                "style": [
                    { "rules": [{ "filter": ["==", "kind", "well"], "symbol": { "size": 4.5 } }] },
                    { "visible": false, "opacity": null }
                ]
            }),
            json!({
                "type": "gpkg",
                "uri": "b.gpkg",
                "uniqueid": "layers-only",
                "defaultLayers": ["roads", "roads", ""],
                "ignored": { "deep": true }
            }),
        ];

        for input in inputs {
            let first = StoreConfig::from_value(&input).unwrap();
            let second = StoreConfig::from_structured(&first.to_structured()).unwrap();
            assert_eq!(second, first, "input: {}", input);
            assert_eq!(second.to_structured(), first.to_structured());
        }
    }

    #[test]
    fn test_absent_optional_keys_stay_absent() {
        let dict = object(json!({ "type": "gpkg", "uri": "haiti.gpkg", "uniqueid": "haiti" }));
        let config = StoreConfig::from_structured(&dict).unwrap();
        assert_eq!(config.version(), None);
        assert!(config.default_layers().is_empty());
        assert_eq!(config.to_structured(), dict);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut dict = full_store();
        dict.insert("extra".into(), json!(42));
        let config = StoreConfig::from_structured(&dict).unwrap();
        assert!(!config.to_structured().contains_key("extra"));
    }

    #[test]
    fn test_missing_or_empty_required_fields() {
        for key in [KEY_TYPE, KEY_URI, KEY_UNIQUE_ID] {
            let mut missing = full_store();
            missing.remove(key);
            assert_eq!(
                StoreConfig::from_structured(&missing),
                Err(ValidationError::MissingField(key))
            );

            let mut empty = full_store();
            empty.insert(key.into(), json!(""));
            assert_eq!(
                StoreConfig::from_structured(&empty),
                Err(ValidationError::MissingField(key))
            );
        }
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let mut dict = full_store();
        dict.insert(KEY_DEFAULT_LAYERS.into(), json!(["ok", 3]));
        assert!(matches!(
            StoreConfig::from_structured(&dict),
            Err(ValidationError::InvalidField { field: KEY_DEFAULT_LAYERS, .. })
        ));

        let mut dict = full_store();
        dict.insert(KEY_STYLE.into(), json!("red"));
        assert!(matches!(
            StoreConfig::from_structured(&dict),
            Err(ValidationError::InvalidField { field: KEY_STYLE, .. })
        ));

        assert_eq!(
            StoreConfig::from_value(&json!([1, 2])),
            Err(ValidationError::NotAnObject)
        );
    }
}
