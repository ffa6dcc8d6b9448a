//! JS boundary for the documentation tool.
//!
//! The mapper functions are exported one-to-one for the tool's runtime.
//! Inputs arrive as plain JS values and deserialize through
//! `serde-wasm-bindgen`; outputs serialize in JSON-compatible mode so the
//! tool receives plain objects rather than ES `Map`s. Failures come back as
//! JS error strings; `extractSchemaFromLiquid` keeps its "absent is `null`"
//! contract.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::schema::{self, BlockSchema, ParseOptions, Schema, Setting};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn schema_from_js(value: JsValue) -> Result<Schema, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| JsValue::from_str(&format!("invalid schema: {err}")))
}

#[wasm_bindgen(js_name = parseSchema)]
pub fn parse_schema(schema: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let schema = schema_from_js(schema)?;
    let options: ParseOptions = if options.is_undefined() || options.is_null() {
        ParseOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|err| JsValue::from_str(&format!("invalid options: {err}")))?
    };
    to_js(&schema::parse_schema(&schema, &options))
}

#[wasm_bindgen(js_name = parseSetting)]
pub fn parse_setting(setting: JsValue, category: Option<String>) -> Result<JsValue, JsValue> {
    let setting: Setting = serde_wasm_bindgen::from_value(setting)
        .map_err(|err| JsValue::from_str(&format!("invalid setting: {err}")))?;
    match schema::parse_setting(&setting, category.as_deref()) {
        Some(arg_type) => to_js(&arg_type),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = extractDefaults)]
pub fn extract_defaults(schema: JsValue) -> Result<JsValue, JsValue> {
    let schema = schema_from_js(schema)?;
    to_js(&schema::extract_defaults(&schema))
}

#[wasm_bindgen(js_name = parseBlock)]
pub fn parse_block(block: JsValue) -> Result<JsValue, JsValue> {
    let block: BlockSchema = serde_wasm_bindgen::from_value(block)
        .map_err(|err| JsValue::from_str(&format!("invalid block: {err}")))?;
    to_js(&schema::parse_block(&block))
}

#[wasm_bindgen(js_name = generateStory)]
pub fn generate_story(name: &str, schema: JsValue) -> Result<JsValue, JsValue> {
    let schema = schema_from_js(schema)?;
    to_js(&schema::generate_story(name, &schema))
}

#[wasm_bindgen(js_name = extractSchemaFromLiquid)]
pub fn extract_schema_from_liquid(contents: &str) -> JsValue {
    match schema::extract_schema_from_liquid(contents) {
        Some(value) => to_js(&value).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

#[wasm_bindgen(js_name = validateSchema)]
pub fn validate_schema(value: JsValue) -> bool {
    match serde_wasm_bindgen::from_value::<serde_json::Value>(value) {
        Ok(parsed) => schema::validate_schema(&parsed),
        Err(_) => false,
    }
}
