//! Section-schema to control-metadata mapping for the documentation tool.
//!
//! A section schema is an ordered list of tagged setting descriptors (plus
//! optional block definitions). Each bindable setting maps to one control
//! descriptor: the interactive control kind or configuration, a description
//! derived from the label and info text, the verbatim default, and a
//! type-summary string. Headers group the settings that follow them into a
//! category; paragraphs are skipped entirely.
//!
//! The whole module is pure: no state is held across calls, and nothing
//! here touches the document tree.

use indexmap::IndexMap;
use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// First `settings.<ident>` token inside a conditional-visibility expression,
// e.g. "{{ section.settings.autoplay }}" -> autoplay.
static SETTING_REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"settings\.(\w+)").unwrap());

// The single schema region embedded in a liquid section file.
static SCHEMA_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{%\s*schema\s*%\}(.*?)\{%\s*endschema\s*%\}").unwrap());

/// Ordered mapping from setting identifier to its control descriptor.
pub type ArgTypes = IndexMap<String, ArgType>;

/// A section schema: name, ordered settings, optional block definitions.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub blocks: Vec<BlockSchema>,
}

/// One block definition nested in a schema.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSchema {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

/// One declarative setting, deserialized permissively: the `type` tag stays
/// a string here so an unrecognized kind degrades to a fallback control
/// instead of failing the whole schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Setting {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub label: Option<String>,
    /// Display text for `header` and `paragraph` settings.
    pub content: Option<String>,
    pub info: Option<String>,
    pub default: Option<Value>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Number>,
    pub unit: Option<String>,
    #[serde(default)]
    pub options: Vec<SettingOption>,
    pub visible_if: Option<String>,
}

/// One choice of a `select` or `radio` setting.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingOption {
    pub value: Value,
    pub label: Option<String>,
}

/// The closed set of recognized setting kinds. `parse_setting` matches over
/// this exhaustively, so a kind added here without a mapping is a compile
/// error rather than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Text,
    Url,
    Textarea,
    Richtext,
    Liquid,
    Number,
    Range,
    Select,
    Radio,
    Checkbox,
    Color,
    ColorBackground,
    ImagePicker,
    Video,
    Page,
    Header,
    Paragraph,
}

impl SettingKind {
    pub fn from_type_str(kind: &str) -> Option<Self> {
        Some(match kind {
            "text" => Self::Text,
            "url" => Self::Url,
            "textarea" => Self::Textarea,
            "richtext" => Self::Richtext,
            "liquid" => Self::Liquid,
            "number" => Self::Number,
            "range" => Self::Range,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "color" => Self::Color,
            "color_background" => Self::ColorBackground,
            "image_picker" => Self::ImagePicker,
            "video" => Self::Video,
            "page" => Self::Page,
            "header" => Self::Header,
            "paragraph" => Self::Paragraph,
            _ => return None,
        })
    }
}

/// Interactive control for one setting: either a bare kind or a configured
/// control (range bounds, option lists).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Control {
    Plain(ControlKind),
    Range {
        #[serde(rename = "type")]
        kind: ControlKind,
        min: Number,
        max: Number,
        step: Number,
    },
    Choices {
        #[serde(rename = "type")]
        kind: ControlKind,
        options: Vec<Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Number,
    Range,
    Select,
    Radio,
    Boolean,
    Color,
}

/// Control descriptor produced for one bindable setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgType {
    pub control: Control,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub table: Table,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<VisibleIf>,
}

/// Documentation-table metadata: category grouping plus summary strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub summary: String,
}

impl Summary {
    fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

/// Simple "visible when this other setting is set" condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleIf {
    pub arg: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    pub include_blocks: bool,
}

/// Control descriptors and defaults for one block definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub arg_types: ArgTypes,
    pub defaults: IndexMap<String, Value>,
}

/// One documentation entry composed from a schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub arg_types: ArgTypes,
    pub args: IndexMap<String, Value>,
}

/// Render a default value the way the documentation table displays it:
/// strings verbatim, scalars via display, arrays comma-joined.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn build_description(setting: &Setting) -> String {
    let mut description = setting.label.clone().unwrap_or_default();
    if let Some(info) = &setting.info {
        description.push('\n');
        description.push_str(info);
    }
    description
}

fn option_values(setting: &Setting) -> Vec<Value> {
    setting
        .options
        .iter()
        .map(|option| option.value.clone())
        .collect()
}

fn options_summary(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| format!("\"{}\"", display_value(value)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Map one setting into its control descriptor. `header` and `paragraph`
/// carry no bindable identifier and yield `None`; an unrecognized kind
/// falls back to a plain text control with a diagnostic and the parse
/// continues.
pub fn parse_setting(setting: &Setting, category: Option<&str>) -> Option<ArgType> {
    let kind = SettingKind::from_type_str(&setting.kind).unwrap_or_else(|| {
        warn!("unknown setting type {:?}, using text control", setting.kind);
        SettingKind::Text
    });
    if matches!(kind, SettingKind::Header | SettingKind::Paragraph) {
        return None;
    }

    let mut description = build_description(setting);
    let mut table = Table {
        category: category.map(str::to_string),
        ..Table::default()
    };
    let default_value = setting.default.clone();
    if let Some(default) = &default_value {
        table.default_value = Some(Summary::new(display_value(default)));
    }

    let control = match kind {
        SettingKind::Text | SettingKind::Url => {
            table.kind = Some(Summary::new("string"));
            Control::Plain(ControlKind::Text)
        }
        SettingKind::Textarea | SettingKind::Richtext | SettingKind::Liquid => {
            table.kind = Some(Summary::new("text"));
            Control::Plain(ControlKind::Text)
        }
        SettingKind::Number => {
            table.kind = Some(Summary::new("number"));
            Control::Plain(ControlKind::Number)
        }
        SettingKind::Range => {
            let min = setting.min.clone().unwrap_or_else(|| Number::from(0));
            let max = setting.max.clone().unwrap_or_else(|| Number::from(100));
            let step = setting.step.clone().unwrap_or_else(|| Number::from(1));
            table.kind = Some(Summary::new(format!(
                "number ({min}-{max}, step: {step})"
            )));
            if let Some(unit) = &setting.unit {
                description.push_str(&format!(" ({unit})"));
            }
            Control::Range {
                kind: ControlKind::Range,
                min,
                max,
                step,
            }
        }
        SettingKind::Select => {
            let values = option_values(setting);
            table.kind = Some(Summary::new(options_summary(&values)));
            Control::Choices {
                kind: ControlKind::Select,
                options: values,
            }
        }
        SettingKind::Radio => {
            let values = option_values(setting);
            table.kind = Some(Summary::new(options_summary(&values)));
            Control::Choices {
                kind: ControlKind::Radio,
                options: values,
            }
        }
        SettingKind::Checkbox => {
            table.kind = Some(Summary::new("boolean"));
            Control::Plain(ControlKind::Boolean)
        }
        SettingKind::Color => {
            table.kind = Some(Summary::new("color"));
            Control::Plain(ControlKind::Color)
        }
        SettingKind::ColorBackground => {
            table.kind = Some(Summary::new("gradient"));
            description.push_str(" (CSS gradient or color)");
            Control::Plain(ControlKind::Text)
        }
        SettingKind::ImagePicker => {
            table.kind = Some(Summary::new("image URL"));
            description.push_str(" (Paste image URL)");
            Control::Plain(ControlKind::Text)
        }
        SettingKind::Video => {
            table.kind = Some(Summary::new("video URL"));
            description.push_str(" (Paste video URL)");
            Control::Plain(ControlKind::Text)
        }
        SettingKind::Page => {
            table.kind = Some(Summary::new("page handle"));
            description.push_str(" (Page handle or URL)");
            Control::Plain(ControlKind::Text)
        }
        SettingKind::Header | SettingKind::Paragraph => unreachable!("handled above"),
    };

    let visible_if = setting
        .visible_if
        .as_deref()
        .and_then(|expression| SETTING_REF_REGEX.captures(expression))
        .map(|captures| VisibleIf {
            arg: captures[1].to_string(),
        });

    Some(ArgType {
        control,
        description,
        default_value,
        table,
        visible_if,
    })
}

fn parse_settings(
    settings: &[Setting],
    mut each: impl FnMut(&Setting, ArgType, &str),
) {
    let mut category: Option<String> = None;
    for setting in settings {
        match SettingKind::from_type_str(&setting.kind) {
            Some(SettingKind::Header) => {
                category = setting.content.clone();
                continue;
            }
            Some(SettingKind::Paragraph) => continue,
            _ => {}
        }
        let Some(id) = setting.id.as_deref() else {
            continue;
        };
        if let Some(arg_type) = parse_setting(setting, category.as_deref()) {
            each(setting, arg_type, id);
        }
    }
}

/// Convert a schema's ordered settings into control descriptors keyed by
/// identifier, tracking the running category from the latest header. With
/// [`ParseOptions::include_blocks`], each block's settings merge in keyed
/// `<block type>_<id>` with the category overridden to name the block.
pub fn parse_schema(schema: &Schema, options: &ParseOptions) -> ArgTypes {
    let mut arg_types = ArgTypes::new();
    parse_settings(&schema.settings, |_, arg_type, id| {
        arg_types.insert(id.to_string(), arg_type);
    });

    if options.include_blocks {
        for block in &schema.blocks {
            let config = parse_block(block);
            for (id, mut arg_type) in config.arg_types {
                arg_type.table.category = Some(format!("Block: {}", block.name));
                arg_types.insert(format!("{}_{}", block.kind, id), arg_type);
            }
        }
    }
    arg_types
}

/// Identifier -> default value, for every setting carrying both.
pub fn extract_defaults(schema: &Schema) -> IndexMap<String, Value> {
    let mut defaults = IndexMap::new();
    for setting in &schema.settings {
        if let (Some(id), Some(default)) = (&setting.id, &setting.default) {
            defaults.insert(id.clone(), default.clone());
        }
    }
    defaults
}

/// Parse one block definition: its settings become control descriptors and
/// collected defaults.
pub fn parse_block(block: &BlockSchema) -> BlockConfig {
    let mut arg_types = ArgTypes::new();
    let mut defaults = IndexMap::new();
    parse_settings(&block.settings, |setting, arg_type, id| {
        arg_types.insert(id.to_string(), arg_type);
        if let Some(default) = &setting.default {
            defaults.insert(id.to_string(), default.clone());
        }
    });
    BlockConfig {
        kind: block.kind.clone(),
        name: block.name.clone(),
        arg_types,
        defaults,
    }
}

/// Compose one documentation entry from a schema; the title falls back to
/// `name` when the schema carries no name of its own.
pub fn generate_story(name: &str, schema: &Schema) -> Story {
    let title = if schema.name.is_empty() {
        name.to_string()
    } else {
        schema.name.clone()
    };
    Story {
        title,
        arg_types: parse_schema(schema, &ParseOptions::default()),
        args: extract_defaults(schema),
    }
}

/// Pull the embedded schema out of a liquid section file. No schema block
/// yields `None`; malformed JSON inside the markers is logged and also
/// yields `None` — never an error to the caller.
pub fn extract_schema_from_liquid(contents: &str) -> Option<Value> {
    let captures = SCHEMA_BLOCK_REGEX.captures(contents)?;
    match serde_json::from_str(captures[1].trim()) {
        Ok(value) => Some(value),
        Err(err) => {
            error!("failed to parse embedded section schema: {err}");
            None
        }
    }
}

/// Structural check: a schema is an object with a non-empty string `name`
/// and an array `settings`. Nothing deeper is validated.
pub fn validate_schema(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let name_ok = object
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    let settings_ok = object.get("settings").is_some_and(Value::is_array);
    name_ok && settings_ok
}
