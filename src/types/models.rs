use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(with = "id")]
    pub id: i64,
    pub external_tenant: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(with = "id")]
    pub id: i64,
    #[serde(with = "id")]
    pub tenant_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(with = "id")]
    pub id: i64,
    #[serde(with = "id")]
    pub tenant_id: i64,
    #[serde(with = "id")]
    pub portfolio_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_ref: Option<String>,
    pub service_offering_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_offering_source_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}

/// Soft-delete status of a record, derived from its discard timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardState {
    Kept,
    Discarded(DateTime<Utc>),
}

impl DiscardState {
    #[must_use]
    pub fn from_timestamp(discarded_at: Option<DateTime<Utc>>) -> Self {
        match discarded_at {
            Some(at) => DiscardState::Discarded(at),
            None => DiscardState::Kept,
        }
    }

    #[must_use]
    pub fn is_kept(self) -> bool {
        matches!(self, DiscardState::Kept)
    }
}

/// Records that can be soft-deleted.
pub trait Discardable {
    fn discarded_at(&self) -> Option<DateTime<Utc>>;

    fn discard_state(&self) -> DiscardState {
        DiscardState::from_timestamp(self.discarded_at())
    }

    fn is_kept(&self) -> bool {
        self.discard_state().is_kept()
    }
}

impl Discardable for Portfolio {
    fn discarded_at(&self) -> Option<DateTime<Utc>> {
        self.discarded_at
    }
}

impl Discardable for PortfolioItem {
    fn discarded_at(&self) -> Option<DateTime<Utc>> {
        self.discarded_at
    }
}

/// Which discard states a read is allowed to return.
///
/// `Kept` is the default for every lookup and listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Kept,
    WithDiscarded,
}

impl Scope {
    #[must_use]
    pub fn include_discarded(flag: bool) -> Self {
        if flag { Scope::WithDiscarded } else { Scope::Kept }
    }

    /// SQL predicate on `discarded_at` for this scope.
    #[must_use]
    pub fn predicate(self) -> &'static str {
        match self {
            Scope::Kept => "discarded_at IS NULL",
            Scope::WithDiscarded => "1 = 1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(discarded_at: Option<DateTime<Utc>>) -> PortfolioItem {
        let now = Utc::now();
        PortfolioItem {
            id: 7,
            tenant_id: 1,
            portfolio_id: 3,
            name: "db".to_string(),
            description: None,
            workflow_ref: None,
            service_offering_ref: "998".to_string(),
            service_offering_source_ref: Some("568".to_string()),
            created_at: now,
            updated_at: now,
            discarded_at,
        }
    }

    #[test]
    fn test_discard_state_follows_timestamp() {
        assert!(item(None).is_kept());
        let at = Utc::now();
        assert_eq!(item(Some(at)).discard_state(), DiscardState::Discarded(at));
    }

    #[test]
    fn test_scope_from_flag() {
        assert_eq!(Scope::include_discarded(false), Scope::Kept);
        assert_eq!(Scope::include_discarded(true), Scope::WithDiscarded);
        assert_eq!(Scope::WithDiscarded.predicate(), "1 = 1");
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let json = serde_json::to_value(item(None)).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["portfolio_id"], "3");
        assert_eq!(json["service_offering_ref"], "998");
        assert!(json["discarded_at"].is_null());
    }
}
