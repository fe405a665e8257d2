//! Payloads exchanged with the analysis service and stored in the cache.
//!
//! Page responses are parsed defensively: any shape other than an object
//! with a `coupons` array degrades to an empty list. Form responses are
//! validated strictly: both locators must be present.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// A coupon code and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Coupon {
    pub code: String,
    #[serde(default)]
    pub source: String,
}

/// Result of page analysis for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageAnalysis {
    pub coupons: Vec<Coupon>,
}

impl PageAnalysis {
    /// Normalize a raw `/analyze` response body.
    ///
    /// Records that are not objects with a string `code` are dropped; a
    /// missing or non-string `source` becomes empty.
    pub fn from_response(body: &Value) -> Self {
        let Some(records) = body.get("coupons").and_then(Value::as_array) else {
            return Self::default();
        };

        let coupons = records
            .iter()
            .filter_map(|record| {
                let code = record.get("code")?.as_str()?;
                let source = record.get("source").and_then(Value::as_str).unwrap_or_default();
                Some(Coupon { code: code.to_string(), source: source.to_string() })
            })
            .collect();

        Self { coupons }
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

/// Coupon list stored under the `coupons` kind for display lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DomainCoupons {
    pub coupons: Vec<Coupon>,
    /// Page URL whose analysis produced the list.
    pub url: String,
}

/// CSS locator of a form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Locator {
    pub css_path: String,
}

/// The coupon input and the button that applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormFields {
    pub coupon_input: Locator,
    pub apply_button: Locator,
}

/// Result of form analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormAnalysis {
    pub form_fields: FormFields,
}

impl FormAnalysis {
    /// Validate a raw `/analyze_form` response body.
    ///
    /// Both `form_fields.coupon_input.css_path` and
    /// `form_fields.apply_button.css_path` must be non-empty strings.
    pub fn from_response(body: &Value) -> Result<Self, Error> {
        let fields = body.get("form_fields");
        let coupon_input = required_css_path(fields, "coupon_input")?;
        let apply_button = required_css_path(fields, "apply_button")?;

        Ok(Self {
            form_fields: FormFields {
                coupon_input: Locator { css_path: coupon_input },
                apply_button: Locator { css_path: apply_button },
            },
        })
    }
}

fn required_css_path(fields: Option<&Value>, name: &str) -> Result<String, Error> {
    fields
        .and_then(|f| f.get(name))
        .and_then(|f| f.get("css_path"))
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Validation(format!("missing form_fields.{name}.css_path")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_analysis_well_formed() {
        let body = json!({"coupons": [{"code": "SAVE10", "source": "x"}, {"code": "FREESHIP", "source": "y"}]});
        let analysis = PageAnalysis::from_response(&body);
        assert_eq!(analysis.coupons.len(), 2);
        assert_eq!(analysis.coupons[0], Coupon { code: "SAVE10".into(), source: "x".into() });
    }

    #[test]
    fn test_page_analysis_degrades_to_empty() {
        for body in [
            json!(null),
            json!([]),
            json!("coupons"),
            json!({}),
            json!({"coupons": null}),
            json!({"coupons": "SAVE10"}),
            json!({"coupons": {"code": "SAVE10"}}),
        ] {
            assert!(PageAnalysis::from_response(&body).is_empty(), "{body} should degrade");
        }
    }

    #[test]
    fn test_page_analysis_drops_malformed_records() {
        let body = json!({"coupons": [{"code": "OK"}, {"source": "no code"}, 42, {"code": 7}]});
        let analysis = PageAnalysis::from_response(&body);
        assert_eq!(analysis.coupons, vec![Coupon { code: "OK".into(), source: String::new() }]);
    }

    #[test]
    fn test_form_analysis_valid() {
        let body = json!({
            "form_fields": {
                "coupon_input": {"css_path": "#promo"},
                "apply_button": {"css_path": "button.apply"}
            }
        });
        let analysis = FormAnalysis::from_response(&body).unwrap();
        assert_eq!(analysis.form_fields.coupon_input.css_path, "#promo");
        assert_eq!(analysis.form_fields.apply_button.css_path, "button.apply");
    }

    #[test]
    fn test_form_analysis_missing_apply_button() {
        let body = json!({"form_fields": {"coupon_input": {"css_path": "#promo"}, "apply_button": {}}});
        let err = FormAnalysis::from_response(&body).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("apply_button")));
    }

    #[test]
    fn test_form_analysis_missing_fields() {
        assert!(matches!(FormAnalysis::from_response(&json!({})), Err(Error::Validation(_))));
        assert!(matches!(
            FormAnalysis::from_response(&json!({"form_fields": null})),
            Err(Error::Validation(_))
        ));
        let empty_path = json!({
            "form_fields": {"coupon_input": {"css_path": ""}, "apply_button": {"css_path": "b"}}
        });
        assert!(matches!(FormAnalysis::from_response(&empty_path), Err(Error::Validation(_))));
    }
}
