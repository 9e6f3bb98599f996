use serde::Deserialize;

use super::id;

/// A boolean flag as it arrived, before typecasting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Text(String),
    /// Numbers, arrays and objects. Never a boolean literal.
    Other(serde_json::Value),
}

impl RawFlag {
    /// Typecast to a boolean. `None` means the raw value is not a boolean
    /// literal. Blank text casts to `false`.
    #[must_use]
    pub fn cast(&self) -> Option<bool> {
        match self {
            RawFlag::Bool(b) => Some(*b),
            RawFlag::Text(s) if s.trim().is_empty() => Some(false),
            RawFlag::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            RawFlag::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            RawFlag::Text(_) | RawFlag::Other(_) => None,
        }
    }
}

impl From<bool> for RawFlag {
    fn from(value: bool) -> Self {
        RawFlag::Bool(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPortfolio {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub enabled: Option<RawFlag>,
    #[serde(default)]
    pub workflow_ref: Option<String>,
}

impl NewPortfolio {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a portfolio. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub enabled: Option<RawFlag>,
    #[serde(default)]
    pub workflow_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPortfolioItem {
    #[serde(with = "id")]
    pub portfolio_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workflow_ref: Option<String>,
    #[serde(default)]
    pub service_offering_ref: String,
    #[serde(default)]
    pub service_offering_source_ref: Option<String>,
}

/// Partial update of a portfolio item.
///
/// Only the descriptive fields are patchable. Unknown keys in a request
/// body (including `service_offering_ref` and
/// `service_offering_source_ref`) are dropped during deserialization, so a
/// patch that names them still applies its other fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workflow_ref: Option<String>,
}
