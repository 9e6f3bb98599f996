use url::Url;

use crate::error::ValidationErrors;
use crate::types::{NewPortfolio, NewPortfolioItem, PortfolioPatch, RawFlag};

pub const BLANK: &str = "can't be blank";
pub const INVALID: &str = "is invalid";
pub const TAKEN: &str = "has already been taken";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Blank values are allowed; anything else must be an absolute URI with no
/// surrounding whitespace. The value is stored as given.
pub fn check_image_url(errors: &mut ValidationErrors, image_url: Option<&str>) {
    match image_url {
        Some(url) if !is_blank(url) && (url.trim() != url || Url::parse(url).is_err()) => {
            errors.add("image_url", INVALID);
        }
        _ => {}
    }
}

pub fn check_enabled(errors: &mut ValidationErrors, enabled: Option<&RawFlag>) {
    if enabled.is_some_and(|flag| flag.cast().is_none()) {
        errors.add("enabled", INVALID);
    }
}

/// Field checks for a new portfolio. Name uniqueness needs the database and
/// is added by the store.
pub fn validate_new_portfolio(attrs: &NewPortfolio) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&attrs.name) {
        errors.add("name", BLANK);
    }
    check_image_url(&mut errors, attrs.image_url.as_deref());
    check_enabled(&mut errors, attrs.enabled.as_ref());
    errors
}

pub fn validate_portfolio_patch(patch: &PortfolioPatch) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if patch.name.as_deref().is_some_and(is_blank) {
        errors.add("name", BLANK);
    }
    check_image_url(&mut errors, patch.image_url.as_deref());
    check_enabled(&mut errors, patch.enabled.as_ref());
    errors
}

pub fn validate_new_portfolio_item(attrs: &NewPortfolioItem) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&attrs.name) {
        errors.add("name", BLANK);
    }
    if is_blank(&attrs.service_offering_ref) {
        errors.add("service_offering_ref", BLANK);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_every_violation() {
        let attrs = NewPortfolio {
            name: "  ".to_string(),
            image_url: Some("not a uri".to_string()),
            enabled: Some(RawFlag::Text("maybe".to_string())),
            ..NewPortfolio::default()
        };

        let errors = validate_new_portfolio(&attrs);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.on("name"), vec![BLANK]);
        assert_eq!(errors.on("image_url"), vec![INVALID]);
        assert_eq!(errors.on("enabled"), vec![INVALID]);
    }

    #[test]
    fn test_accepts_valid_and_blank_optionals() {
        let attrs = NewPortfolio {
            name: "Demo".to_string(),
            image_url: Some("https://example.com/logo.png".to_string()),
            enabled: Some(RawFlag::Text("FALSE".to_string())),
            ..NewPortfolio::default()
        };
        assert!(validate_new_portfolio(&attrs).is_empty());

        let blank = NewPortfolio {
            name: "Demo".to_string(),
            image_url: Some(String::new()),
            enabled: Some(RawFlag::Text(String::new())),
            ..NewPortfolio::default()
        };
        assert!(validate_new_portfolio(&blank).is_empty());
    }

    #[test]
    fn test_image_url_with_surrounding_whitespace_is_invalid() {
        for url in [" https://example.com/logo.png", "https://example.com/logo.png\n"] {
            let mut errors = ValidationErrors::new();
            check_image_url(&mut errors, Some(url));
            assert_eq!(errors.on("image_url"), vec![INVALID], "accepted {url:?}");
        }
    }

    #[test]
    fn test_numeric_enabled_is_invalid() {
        let mut errors = ValidationErrors::new();
        check_enabled(&mut errors, Some(&RawFlag::Other(serde_json::json!(1))));
        assert_eq!(errors.on("enabled"), vec![INVALID]);
    }

    #[test]
    fn test_patch_only_checks_present_fields() {
        assert!(validate_portfolio_patch(&PortfolioPatch::default()).is_empty());

        let patch = PortfolioPatch {
            name: Some(String::new()),
            ..PortfolioPatch::default()
        };
        assert_eq!(validate_portfolio_patch(&patch).on("name"), vec![BLANK]);
    }

    #[test]
    fn test_item_requires_name_and_offering_ref() {
        let errors = validate_new_portfolio_item(&NewPortfolioItem::default());
        assert_eq!(errors.on("name"), vec![BLANK]);
        assert_eq!(errors.on("service_offering_ref"), vec![BLANK]);
    }
}
