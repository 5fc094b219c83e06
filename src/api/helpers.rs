//! Shared helpers for WASM API operations
//!
//! Serialization across the JS boundary, configuration loading and error
//! conversion used by every exported function.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::layout::LayoutEngine;
use crate::models::TuningCatalog;

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize + ?Sized>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Convert an engine error to a JsValue
pub fn engine_error(err: EngineError) -> JsValue {
    let msg = err.to_string();
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Engine configuration from an optional JS object (`undefined`/`null` → defaults)
pub fn config_from_js(value: JsValue) -> Result<EngineConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EngineConfig::default());
    }
    deserialize(value, "Invalid engine config")
}

/// Parse configuration text; JSON objects and YAML documents are both accepted
pub fn config_from_text(text: &str) -> Result<EngineConfig, EngineError> {
    if text.trim_start().starts_with('{') {
        EngineConfig::from_json_str(text)
    } else {
        EngineConfig::from_yaml_str(text)
    }
}

/// Layout engine over the built-in catalog
pub fn engine_for(config: EngineConfig) -> LayoutEngine {
    LayoutEngine::new(config, TuningCatalog::builtin())
}
