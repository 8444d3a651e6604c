//! Widget configuration
//!
//! A `WidgetConfig` is the raw record a host page supplies: every field is
//! optional so partial JSON deserializes cleanly. `resolve` validates it and
//! fills every default, so the rest of the engine only ever sees a
//! `ResolvedConfig` with concrete values.

mod brands;

pub use brands::{eventitans, preset, ticket99, PRESET_NAMES};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Lead payload keys the engine always sends; form fields may not reuse them.
const RESERVED_FIELD_KEYS: [&str; 5] = ["name", "email", "phone", "type", "brand"];

const DEFAULT_AVATAR: &str = "\u{1F4AC}";
const DEFAULT_TAGLINE: &str = "AI Assistant";
const DEFAULT_PRIMARY: &str = "#2563eb";
const DEFAULT_SECONDARY: &str = "#7c3aed";
const DEFAULT_Z_INDEX: u32 = 99_999;

/// Configuration errors. All of them are fatal: a widget is never mounted
/// from a config that fails to resolve.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
    #[error("prefix may only contain ASCII letters, digits, `-` and `_`, got {0:?}")]
    InvalidPrefix(String),
    #[error("brandKey may only contain ASCII letters, digits, `-` and `_`, got {0:?}")]
    InvalidBrandKey(String),
    #[error("position must be \"left\" or \"right\", got {0:?}")]
    InvalidPosition(String),
    #[error("color `{field}` is not a #rgb or #rrggbb hex color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
    #[error("form `{form}` declares a field with an empty key")]
    EmptyFieldKey { form: String },
    #[error("form `{form}` field `{field}` reuses a built-in lead field name")]
    ReservedFieldKey { form: String, field: String },
    #[error("form `{form}` field `{field}` is a select without options")]
    EmptySelect { form: String, field: String },
    #[error("unknown brand preset {0:?}")]
    UnknownPreset(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Raw configuration
// ============================================================================

/// Configuration as supplied by the host page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub brand_name: Option<String>,
    /// Value sent as `brand` with every lead
    pub brand_key: Option<String>,
    /// Prefix for element ids and CSS classes
    pub prefix: Option<String>,
    pub avatar: Option<String>,
    pub tagline: Option<String>,
    pub colors: ColorConfig,
    pub position: Option<String>,
    pub z_index: Option<u32>,
    pub endpoints: EndpointConfig,
    pub quick_replies: Vec<QuickReply>,
    /// Lead-form schemas keyed by the backend's `showForm` value
    pub forms: BTreeMap<String, FormSchema>,
    /// Schema used for any form type without its own entry
    pub default_form: Option<FormSchema>,
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    /// CSS background for branded surfaces; derived from the two colors when absent
    pub gradient: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub chat: Option<String>,
    pub leads: Option<String>,
    pub clear: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyConfig {
    pub welcome: Option<String>,
    pub generic_failure: Option<String>,
    pub connectivity_failure: Option<String>,
    pub lead_thanks: Option<String>,
    pub lead_fallback: Option<String>,
    pub validation_prompt: Option<String>,
    pub input_placeholder: Option<String>,
    pub powered_by: Option<String>,
}

/// Preset suggestion button; choosing it sends `label` as a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

impl QuickReply {
    #[must_use]
    pub fn new(label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// Lead form layout. Name, email and phone are always present; `fields`
/// lists the extra, brand-specific inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            title: "Get Started".to_string(),
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Key of this value in the lead payload
    pub key: String,
    pub placeholder: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl FormField {
    #[must_use]
    pub fn text(key: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            placeholder: placeholder.into(),
            kind: FieldKind::Text,
            required: false,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn select(
        key: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            key: key.into(),
            placeholder: placeholder.into(),
            kind: FieldKind::Select,
            required: false,
            options,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl WidgetConfig {
    /// Parse a `camelCase` JSON config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if `json` does not match the config shape.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if its contents are not a valid config.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Load from `LEAD_WIDGET_CONFIG` (a JSON file) or, failing that, the
    /// preset named by `LEAD_WIDGET_BRAND` (default `ticket99`).
    ///
    /// # Errors
    ///
    /// Fails like [`WidgetConfig::from_path`] when a file is named, and with
    /// `ConfigError::UnknownPreset` when the brand has no preset.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("LEAD_WIDGET_CONFIG") {
            tracing::info!(path = %path, "Loading widget config from file");
            return Self::from_path(path);
        }
        let name = std::env::var("LEAD_WIDGET_BRAND").unwrap_or_else(|_| "ticket99".to_string());
        preset(&name).ok_or(ConfigError::UnknownPreset(name))
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Left,
    Right,
}

impl Position {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

/// An RGB color parsed from a hex token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb`
    #[must_use]
    pub fn parse_hex(token: &str) -> Option<Self> {
        let digits = token.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibbles: Vec<u8> = digits
            .chars()
            .filter_map(|c| c.to_digit(16))
            .filter_map(|d| u8::try_from(d).ok())
            .collect();
        match nibbles.as_slice() {
            [r, g, b] => Some(Self {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            }),
            [r1, r2, g1, g2, b1, b2] => Some(Self {
                r: r1 * 16 + r2,
                g: g1 * 16 + g2,
                b: b1 * 16 + b2,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` with the alpha given in hundredths
    #[must_use]
    pub fn rgba(self, alpha_percent: u8) -> String {
        let alpha = alpha_percent.min(100);
        format!(
            "rgba({},{},{},{}.{:02})",
            self.r,
            self.g,
            self.b,
            alpha / 100,
            alpha % 100
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub gradient: String,
    pub position: Position,
    pub z_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    pub chat: String,
    pub leads: String,
    /// Reserved; no flow calls it
    pub clear: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyText {
    pub welcome: String,
    pub generic_failure: String,
    pub connectivity_failure: String,
    pub lead_thanks: String,
    pub lead_fallback: String,
    pub validation_prompt: String,
    pub input_placeholder: String,
    pub powered_by: String,
}

/// Fully defaulted, validated configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub brand_name: String,
    pub brand_key: String,
    pub prefix: String,
    pub avatar: String,
    pub tagline: String,
    pub theme: Theme,
    pub endpoints: Endpoints,
    pub quick_replies: Vec<QuickReply>,
    pub copy: CopyText,
    forms: BTreeMap<String, FormSchema>,
    default_form: FormSchema,
}

impl ResolvedConfig {
    /// Schema for a form type; unknown types get the default schema
    #[must_use]
    pub fn form(&self, form_type: &str) -> &FormSchema {
        self.forms.get(form_type).unwrap_or(&self.default_form)
    }
}

/// Validate a raw config and fill every default.
///
/// # Errors
///
/// Returns the first problem found: a missing or blank required field, a
/// brand key or prefix that is not a plain identifier, an unknown position,
/// an unparseable color, or a malformed form schema.
pub fn resolve(config: &WidgetConfig) -> Result<ResolvedConfig, ConfigError> {
    let brand_name = required(config.brand_name.as_deref(), "brandName")?;
    let brand_key = match non_blank(config.brand_key.as_deref()) {
        Some(key) => key,
        None => slug(&brand_name),
    };
    if brand_key.is_empty() {
        return Err(ConfigError::Empty("brandKey"));
    }
    if !is_identifier(&brand_key) {
        return Err(ConfigError::InvalidBrandKey(brand_key));
    }
    // Spliced into element ids and CSS selectors
    let prefix = non_blank(config.prefix.as_deref()).unwrap_or_else(|| brand_key.clone());
    if !is_identifier(&prefix) {
        return Err(ConfigError::InvalidPrefix(prefix));
    }

    let endpoints = Endpoints {
        chat: required(config.endpoints.chat.as_deref(), "endpoints.chat")?,
        leads: required(config.endpoints.leads.as_deref(), "endpoints.leads")?,
        clear: match config.endpoints.clear.as_deref() {
            Some(path) => required(Some(path), "endpoints.clear")?,
            None => "/api/clear".to_string(),
        },
    };

    let position = match config.position.as_deref().map(str::trim) {
        None | Some("right") => Position::Right,
        Some("left") => Position::Left,
        Some(other) => return Err(ConfigError::InvalidPosition(other.to_string())),
    };
    let primary = color(config.colors.primary.as_deref(), DEFAULT_PRIMARY, "colors.primary")?;
    let secondary = color(
        config.colors.secondary.as_deref(),
        DEFAULT_SECONDARY,
        "colors.secondary",
    )?;
    let gradient = non_blank(config.colors.gradient.as_deref()).unwrap_or_else(|| {
        format!(
            "linear-gradient(135deg, {}, {})",
            primary.hex(),
            secondary.hex()
        )
    });

    for (form_type, schema) in &config.forms {
        check_form(form_type, schema)?;
    }
    let default_form = config.default_form.clone().unwrap_or_default();
    check_form("default", &default_form)?;

    let copy = resolve_copy(&config.copy, &brand_name);

    Ok(ResolvedConfig {
        brand_name,
        brand_key,
        prefix,
        avatar: non_blank(config.avatar.as_deref()).unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        tagline: non_blank(config.tagline.as_deref())
            .unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
        theme: Theme {
            primary,
            secondary,
            gradient,
            position,
            z_index: config.z_index.unwrap_or(DEFAULT_Z_INDEX),
        },
        endpoints,
        quick_replies: config
            .quick_replies
            .iter()
            .filter(|reply| !reply.label.trim().is_empty())
            .cloned()
            .collect(),
        copy,
        forms: config.forms.clone(),
        default_form,
    })
}

fn resolve_copy(copy: &CopyConfig, brand_name: &str) -> CopyText {
    CopyText {
        welcome: text_or(copy.welcome.as_deref(), || {
            format!("Hey there! Welcome to {brand_name} \u{1F44B} How can I help you today?")
        }),
        generic_failure: text_or(copy.generic_failure.as_deref(), || {
            "Sorry, something went wrong. Please try again!".to_string()
        }),
        connectivity_failure: text_or(copy.connectivity_failure.as_deref(), || {
            "Connection error. Please check your internet and try again.".to_string()
        }),
        lead_thanks: text_or(copy.lead_thanks.as_deref(), || {
            "Thanks! Our team will reach out within 24 hours. Is there anything else I can help with?"
                .to_string()
        }),
        lead_fallback: text_or(copy.lead_fallback.as_deref(), || {
            "Sorry, couldn't submit your details. Please try again later.".to_string()
        }),
        validation_prompt: text_or(copy.validation_prompt.as_deref(), || {
            "Please enter your name and email.".to_string()
        }),
        input_placeholder: text_or(copy.input_placeholder.as_deref(), || {
            "Type a message...".to_string()
        }),
        powered_by: text_or(copy.powered_by.as_deref(), || "Powered by AI".to_string()),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(field))?;
    non_blank(Some(value)).ok_or(ConfigError::Empty(field))
}

fn text_or(value: Option<&str>, default: impl FnOnce() -> String) -> String {
    non_blank(value).unwrap_or_else(default)
}

fn color(value: Option<&str>, default: &str, field: &'static str) -> Result<Rgb, ConfigError> {
    let token = value.unwrap_or(default);
    Rgb::parse_hex(token).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: token.to_string(),
    })
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn is_identifier(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_form(form_type: &str, schema: &FormSchema) -> Result<(), ConfigError> {
    for field in &schema.fields {
        let key = field.key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyFieldKey {
                form: form_type.to_string(),
            });
        }
        if RESERVED_FIELD_KEYS.contains(&key) {
            return Err(ConfigError::ReservedFieldKey {
                form: form_type.to_string(),
                field: key.to_string(),
            });
        }
        if field.kind == FieldKind::Select && field.options.is_empty() {
            return Err(ConfigError::EmptySelect {
                form: form_type.to_string(),
                field: key.to_string(),
            });
        }
    }
    Ok(())
}
