//! Payload validation at the HTTP boundary.
//!
//! [`ValidatedJson`] turns a request body into either a typed record or a
//! list of [`FieldViolation`]s, one per offending field; handlers never see
//! invalid input.

use std::collections::HashSet;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use chrono::{DateTime, Utc};
use convert_case::{Case, Casing};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// JSON shape expected for a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Uuid,
    DateTime,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Uuid => value
                .as_str()
                .is_some_and(|s| Uuid::parse_str(s).is_ok()),
            FieldKind::DateTime => value
                .as_str()
                .is_some_and(|s| s.parse::<DateTime<Utc>>().is_ok()),
        }
    }

    fn violation(self, field: &str) -> FieldViolation {
        match self {
            FieldKind::Text => FieldViolation::new(field, "type", format!("{field} must be a string")),
            FieldKind::Uuid => FieldViolation::new(field, "uuid", format!("{field} must be a UUID")),
            FieldKind::DateTime => FieldViolation::new(
                field,
                "date_time",
                format!("{field} must be an RFC 3339 date-time"),
            ),
        }
    }
}

/// A create payload as it arrives on the wire.
///
/// Every field is optional at the serde level so a missing key surfaces as a
/// `required` violation instead of aborting deserialization.
pub trait Payload: DeserializeOwned + Validate + Send {
    /// Record input handed to storage once the payload is valid.
    type Output;

    /// Used in the envelope message, e.g. "Invalid match data".
    const LABEL: &'static str;

    /// Wire names and shapes of the payload fields.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// `None` only if a required field is absent, which `validate` rules out.
    fn into_output(self) -> Option<Self::Output>;
}

/// Flattens validator output into a list sorted by wire field name.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let wire = field.to_case(Case::Camel);
            errs.iter().map(move |e| FieldViolation {
                field: wire.clone(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{wire} is invalid")),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Reports present, non-null fields whose JSON shape is wrong and drops them
/// from `object`, so the remainder still deserializes.
pub fn type_violations(
    object: &mut Map<String, Value>,
    fields: &[(&'static str, FieldKind)],
) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    for &(name, kind) in fields {
        let mistyped = object
            .get(name)
            .is_some_and(|value| !value.is_null() && !kind.accepts(value));
        if mistyped {
            object.remove(name);
            out.push(kind.violation(name));
        }
    }
    out
}

pub fn violations_to_value(list: &[FieldViolation]) -> Value {
    serde_json::to_value(list).unwrap_or(Value::Array(Vec::new()))
}

/// Checks a parsed JSON body against `T` and returns the storage input or
/// every violation found.
pub fn validate_body<T: Payload>(mut body: Value) -> Result<T::Output, Vec<FieldViolation>> {
    let mut found = match body.as_object_mut() {
        Some(object) => type_violations(object, T::FIELDS),
        None => {
            return Err(vec![FieldViolation::new(
                "body",
                "type",
                "request body must be a JSON object",
            )])
        }
    };

    let payload: T = serde_json::from_value(body)
        .map_err(|e| vec![FieldViolation::new("body", "schema", e.to_string())])?;

    if let Err(errors) = payload.validate() {
        // A mistyped field was removed above; its `required` error is noise.
        let reported: HashSet<String> = found.iter().map(|v| v.field.clone()).collect();
        found.extend(
            violations(&errors)
                .into_iter()
                .filter(|v| !reported.contains(&v.field)),
        );
    }

    if !found.is_empty() {
        found.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(found);
    }

    payload.into_output().ok_or_else(|| {
        vec![FieldViolation::new("body", "required", "request body is incomplete")]
    })
}

/// JSON body extractor that runs [`validate_body`] and yields the storage
/// input for `T`.
pub struct ValidatedJson<T: Payload>(pub T::Output);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Payload,
    T::Output: Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let message = format!("Invalid {} data", T::LABEL);

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(message.clone(), violations_to_value(&[body_violation(&rejection)]))
            })?;

        validate_body::<T>(body)
            .map(ValidatedJson)
            .map_err(|list| AppError::validation(message, violations_to_value(&list)))
    }
}

fn body_violation(rejection: &JsonRejection) -> FieldViolation {
    let code = match rejection {
        JsonRejection::MissingJsonContentType(_) => "content_type",
        JsonRejection::JsonSyntaxError(_) => "syntax",
        JsonRejection::JsonDataError(_) => "schema",
        _ => "body",
    };
    FieldViolation::new("body", code, rejection.body_text())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{CreateMatchRequest, PurchaseTicketRequest};

    fn fields(list: &[FieldViolation]) -> Vec<&str> {
        list.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_every_missing_or_empty_field_is_reported() {
        let list = validate_body::<CreateMatchRequest>(json!({
            "homeTeam": "México",
            "stadium": ""
        }))
        .unwrap_err();

        assert_eq!(
            fields(&list),
            vec!["awayTeam", "matchDate", "stadium", "stadiumAddress"]
        );
        let stadium = list.iter().find(|v| v.field == "stadium").unwrap();
        assert_eq!(stadium.code, "length");
        assert_eq!(stadium.message, "stadium is required");
        let away = list.iter().find(|v| v.field == "awayTeam").unwrap();
        assert_eq!(away.code, "required");
    }

    #[test]
    fn test_mistyped_fields_are_reported_once_each() {
        let list = validate_body::<PurchaseTicketRequest>(json!({
            "userId": "not-a-uuid",
            "matchId": 42,
            "seatSection": 102,
            "seatRow": "F",
            "seatNumber": "14",
            "qrCode": "QR"
        }))
        .unwrap_err();

        assert_eq!(fields(&list), vec!["matchId", "seatSection", "userId"]);
        assert_eq!(list[0].code, "uuid");
        assert_eq!(list[1].code, "type");
        assert_eq!(list[2].code, "uuid");
    }

    #[test]
    fn test_bad_match_date_is_a_field_violation() {
        let list = validate_body::<CreateMatchRequest>(json!({
            "homeTeam": "México",
            "awayTeam": "Alemania",
            "matchDate": "next tuesday",
            "stadium": "Estadio BBVA",
            "stadiumAddress": "Monterrey"
        }))
        .unwrap_err();

        assert_eq!(list, vec![FieldViolation::new(
            "matchDate",
            "date_time",
            "matchDate must be an RFC 3339 date-time",
        )]);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let list = validate_body::<CreateMatchRequest>(json!(["México"])).unwrap_err();
        assert_eq!(fields(&list), vec!["body"]);
    }

    #[test]
    fn test_valid_body_yields_storage_input() {
        let new_match = validate_body::<CreateMatchRequest>(json!({
            "homeTeam": "México",
            "awayTeam": "Alemania",
            "matchDate": "2026-06-15T19:00:00Z",
            "stadium": "Estadio BBVA",
            "stadiumAddress": "Monterrey"
        }))
        .unwrap();

        assert_eq!(new_match.away_team, "Alemania");
        assert_eq!(new_match.match_date.to_rfc3339(), "2026-06-15T19:00:00+00:00");
    }
}
