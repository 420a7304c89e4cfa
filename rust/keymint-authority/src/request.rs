use serde_json::{Map, Value};

use crate::AuthorityError;

/// A request to mint a key delegated from the caller's authority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRequest {
    /// Requested capability data by capability name.
    pub capability_set: Map<String, Value>,
    /// Requested lifetime in seconds, from now.
    pub lifetime: Option<i64>,
    /// Free-form text to store with the key.
    pub description: Option<String>,
}

impl CreateRequest {
    /// Interpret a JSON request body of the form
    /// `{"capabilitySet": {...}, "lifetime"?: number, "description"?: string}`.
    pub fn from_json(body: &Value) -> Result<Self, AuthorityError> {
        let body = body
            .as_object()
            .ok_or_else(|| AuthorityError::invalid("Invalid JSON in request data body"))?;

        let lifetime = lifetime(body)?;

        let description = match body.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                return Err(AuthorityError::invalid(
                    "Invalid API key description in request data body",
                ));
            }
        };

        let capability_set = body
            .get("capabilitySet")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| {
                AuthorityError::invalid("Invalid API key capability set in request data body")
            })?;

        Ok(Self {
            capability_set,
            lifetime,
            description,
        })
    }

    /// A request for `capability_set` with no lifetime or description.
    pub fn new(capability_set: Map<String, Value>) -> Self {
        Self {
            capability_set,
            ..Self::default()
        }
    }

    /// Request a lifetime in seconds.
    pub fn with_lifetime(mut self, seconds: i64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A request to move a key's expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenewRequest {
    /// Requested lifetime in seconds, from now. The authority's own expiry
    /// applies when absent.
    pub lifetime: Option<i64>,
}

impl RenewRequest {
    /// Interpret a JSON request body of the form `{"lifetime"?: number}`.
    pub fn from_json(body: &Value) -> Result<Self, AuthorityError> {
        let body = body
            .as_object()
            .ok_or_else(|| AuthorityError::invalid("Invalid JSON in request data body"))?;

        Ok(Self {
            lifetime: lifetime(body)?,
        })
    }

    /// Request a lifetime in seconds.
    pub fn with_lifetime(seconds: i64) -> Self {
        Self {
            lifetime: Some(seconds),
        }
    }
}

/// Integral numbers are taken as-is, other finite numbers are truncated
/// toward zero. Numbers outside the range of `i64` are rejected.
fn lifetime(body: &Map<String, Value>) -> Result<Option<i64>, AuthorityError> {
    let invalid = || AuthorityError::invalid("Invalid API key lifetime value in request data body");

    match body.get("lifetime") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(seconds) => Ok(Some(seconds)),
            None => number
                .as_f64()
                .filter(|seconds| (i64::MIN as f64..i64::MAX as f64).contains(seconds))
                .map(|seconds| Some(seconds as i64))
                .ok_or_else(invalid),
        },
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;
    use testresult::TestResult;

    #[test]
    fn it_reads_a_complete_create_request() -> TestResult {
        let request = CreateRequest::from_json(&json!({
            "capabilitySet": { "app.foo": { "x": 1 } },
            "lifetime": 60,
            "description": "ci runner"
        }))?;

        assert_eq!(request.lifetime, Some(60));
        assert_eq!(request.description.as_deref(), Some("ci runner"));
        assert_eq!(request.capability_set["app.foo"], json!({ "x": 1 }));

        Ok(())
    }

    #[test]
    fn it_treats_null_fields_as_absent() -> TestResult {
        let request = CreateRequest::from_json(&json!({
            "capabilitySet": {},
            "lifetime": null,
            "description": null
        }))?;

        assert_eq!(request, CreateRequest::default());

        Ok(())
    }

    #[test]
    fn it_truncates_fractional_lifetimes() -> TestResult {
        assert_eq!(
            RenewRequest::from_json(&json!({ "lifetime": 90.9 }))?.lifetime,
            Some(90)
        );
        assert_eq!(
            RenewRequest::from_json(&json!({ "lifetime": -1.5 }))?.lifetime,
            Some(-1)
        );
        assert_eq!(
            RenewRequest::from_json(&json!({ "lifetime": i64::MIN }))?.lifetime,
            Some(i64::MIN)
        );

        Ok(())
    }

    #[test]
    fn it_rejects_lifetimes_outside_the_integer_range() {
        for lifetime in [json!(u64::MAX), json!(1e300), json!(-1e300), json!(9.3e18)] {
            let body = json!({ "capabilitySet": {}, "lifetime": lifetime.clone() });
            let error = CreateRequest::from_json(&body).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidRequest, "{body}");

            let error = RenewRequest::from_json(&json!({ "lifetime": lifetime })).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidRequest, "{lifetime}");
        }
    }

    #[test]
    fn it_rejects_malformed_create_requests() {
        let rejected = [
            json!([]),
            json!({}),
            json!({ "capabilitySet": [] }),
            json!({ "capabilitySet": {}, "lifetime": "60" }),
            json!({ "capabilitySet": {}, "lifetime": true }),
            json!({ "capabilitySet": {}, "description": 7 }),
        ];

        for body in rejected {
            let error = CreateRequest::from_json(&body).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidRequest, "{body}");
        }
    }

    #[test]
    fn it_accepts_an_empty_renew_request() -> TestResult {
        assert_eq!(RenewRequest::from_json(&json!({}))?, RenewRequest::default());
        assert!(RenewRequest::from_json(&json!("60")).is_err());
        Ok(())
    }
}
