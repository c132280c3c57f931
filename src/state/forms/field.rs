//! Form field descriptors and value objects

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

/// Semantic kind of a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    /// Calendar date entered as `YYYY-MM-DD`
    Date,
    Boolean,
    SingleChoice(Vec<String>),
    MultiChoice(Vec<String>),
}

impl FieldKind {
    /// The value a field of this kind holds before the user touches it
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldKind::Text | FieldKind::Email | FieldKind::Phone | FieldKind::Date => {
                FieldValue::Text(String::new())
            }
            FieldKind::Boolean => FieldValue::Bool(false),
            FieldKind::SingleChoice(_) => FieldValue::Choice(None),
            FieldKind::MultiChoice(_) => FieldValue::Multi(BTreeSet::new()),
        }
    }

    /// Declared options for choice kinds, empty for everything else
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::SingleChoice(options) | FieldKind::MultiChoice(options) => options,
            _ => &[],
        }
    }

    /// Whether `value` has the shape this kind stores
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (
                FieldKind::Text | FieldKind::Email | FieldKind::Phone | FieldKind::Date,
                FieldValue::Text(_)
            ) | (FieldKind::Boolean, FieldValue::Bool(_))
                | (FieldKind::SingleChoice(_), FieldValue::Choice(_))
                | (FieldKind::MultiChoice(_), FieldValue::Multi(_))
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::SingleChoice(_) => "single-choice",
            FieldKind::MultiChoice(_) => "multi-choice",
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Choice(Option<String>),
    Multi(BTreeSet<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Convenience constructor for text-like values
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Convenience constructor for a selected single choice
    pub fn choice(value: impl Into<String>) -> Self {
        FieldValue::Choice(Some(value.into()))
    }

    /// Build a multi-choice value from any list of options
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Get the text value (returns empty string for non-text values)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Choice(Some(s)) => s,
            _ => "",
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }

    /// Selected set for multi-choice values
    pub fn as_multi(&self) -> Option<&BTreeSet<String>> {
        match self {
            FieldValue::Multi(set) => Some(set),
            _ => None,
        }
    }

    /// True when the value counts as "not filled in"
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Choice(c) => c.as_deref().map_or(true, |s| s.trim().is_empty()),
            FieldValue::Multi(set) => set.is_empty(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(true) => "[x]".to_string(),
            FieldValue::Bool(false) => "[ ]".to_string(),
            FieldValue::Choice(Some(s)) => s.clone(),
            FieldValue::Choice(None) => String::new(),
            FieldValue::Multi(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }

    /// JSON shape sent to the registration endpoint
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.trim().to_string()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Choice(Some(s)) => Value::String(s.clone()),
            FieldValue::Choice(None) => Value::String(String::new()),
            FieldValue::Multi(set) => {
                Value::Array(set.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// A validation rule attached to a field
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be blank
    Required { message: String },
    /// Trimmed value must match the expression
    Pattern { regex: Regex, message: String },
    /// Trimmed, lowercased value must contain one of the suffixes
    AllowedDomains {
        suffixes: Vec<String>,
        message: String,
    },
    /// This date must not be earlier than the date held by `from`
    NotBefore { from: String, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn allowed_domains<I, S>(suffixes: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::AllowedDomains {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
            message: message.into(),
        }
    }

    pub fn not_before(from: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::NotBefore {
            from: from.into(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::Pattern { message, .. }
            | Rule::AllowedDomains { message, .. }
            | Rule::NotBefore { message, .. } => message,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Rule::Required { .. })
    }
}

/// Represents a single form field with its configuration
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<FieldValue>,
    pub rules: Vec<Rule>,
    pub is_multiline: bool,
}

impl FieldSpec {
    fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            default: None,
            rules: Vec::new(),
            is_multiline: false,
        }
    }

    /// Create a new text field
    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    /// Create a new multiline text field
    pub fn multiline(key: &str, label: &str) -> Self {
        Self {
            is_multiline: true,
            ..Self::new(key, label, FieldKind::Text)
        }
    }

    pub fn email(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Email)
    }

    pub fn phone(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Phone)
    }

    pub fn date(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    pub fn boolean(key: &str, label: &str) -> Self {
        Self::new(key, label, FieldKind::Boolean)
    }

    pub fn single_choice(key: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            key,
            label,
            FieldKind::SingleChoice(options.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn multi_choice(key: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            key,
            label,
            FieldKind::MultiChoice(options.iter().map(|s| s.to_string()).collect()),
        )
    }

    /// Attach a validation rule; rules run in the order they are added
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Shorthand for a `Required` rule
    pub fn required(self, message: impl Into<String>) -> Self {
        self.rule(Rule::required(message))
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Value the field resets to
    pub fn default_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(Rule::is_required)
    }
}
