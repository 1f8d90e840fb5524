//! Strict parsing of the create payload and coercion of list query parameters.
//!
//! Both entry points run before any storage access and return either a typed
//! value or a [`ValidationError`] naming the field at fault.

use std::collections::HashMap;
use std::num::IntErrorKind;

use serde_json::{Map, Value};

use crate::contact::{NewContact, EXTERNAL_ID, PHONE_NUMBER};
use crate::error::{ValidationCode, ValidationError};
use crate::gateway::{ContactFilter, Page};

const LIMIT: &str = "limit";
const OFFSET: &str = "offset";
const BODY: &str = "body";

/// Parse a raw request body into a [`NewContact`].
///
/// The body must be a JSON object holding exactly `external_id` (an integer
/// within the 32-bit signed range) and `phone_number` (a non-blank string).
pub fn parse_create_payload(body: &[u8]) -> Result<NewContact, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        ValidationError::new(
            BODY,
            ValidationCode::MalformedBody,
            format!("request body is not valid JSON: {err}"),
        )
    })?;
    let Value::Object(fields) = value else {
        return Err(ValidationError::new(
            BODY,
            ValidationCode::MalformedBody,
            "request body must be a JSON object",
        ));
    };

    if let Some(unknown) = fields
        .keys()
        .find(|key| !matches!(key.as_str(), EXTERNAL_ID | PHONE_NUMBER))
    {
        return Err(ValidationError::new(
            unknown.as_str(),
            ValidationCode::UnknownField,
            format!("unknown field: {unknown}"),
        ));
    }

    let external_id = required_i32(&fields, EXTERNAL_ID)?;
    let phone_number = required_string(&fields, PHONE_NUMBER)?;
    NewContact::new(external_id, phone_number)
}

fn required<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(
            field,
            ValidationCode::MissingField,
            format!("missing required field: {field}"),
        )),
        Some(value) => Ok(value),
    }
}

fn required_i32(fields: &Map<String, Value>, field: &str) -> Result<i32, ValidationError> {
    let value = required(fields, field)?;
    let Some(wide) = value.as_i64() else {
        // u64 values beyond i64::MAX are still integers, just too large.
        let code = if value.is_u64() {
            ValidationCode::OutOfRange
        } else {
            ValidationCode::InvalidType
        };
        return Err(integer_error(field, code));
    };
    i32::try_from(wide).map_err(|_| integer_error(field, ValidationCode::OutOfRange))
}

fn integer_error(field: &str, code: ValidationCode) -> ValidationError {
    let message = match code {
        ValidationCode::OutOfRange => format!("{field} must fit in a 32-bit signed integer"),
        _ => format!("{field} must be an integer"),
    };
    ValidationError::new(field, code, message)
}

fn required_string(fields: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match required(fields, field)? {
        Value::String(text) => Ok(text.clone()),
        _ => Err(ValidationError::new(
            field,
            ValidationCode::InvalidType,
            format!("{field} must be a string"),
        )),
    }
}

/// Validated form of the `GET /contacts` query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: ContactFilter,
    pub page: Page,
}

/// Coerce raw query parameters into filters and a page window.
///
/// Empty values count as absent and unrecognised keys are ignored.
pub fn parse_list_query(params: &HashMap<String, String>) -> Result<ListQuery, ValidationError> {
    let param = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let external_id = param(EXTERNAL_ID)
        .map(|raw| {
            let wide = parse_i64(EXTERNAL_ID, raw)?;
            i32::try_from(wide).map_err(|_| integer_error(EXTERNAL_ID, ValidationCode::OutOfRange))
        })
        .transpose()?;
    let phone_number = param(PHONE_NUMBER).map(str::to_owned);

    let limit = param(LIMIT).map(|raw| parse_i64(LIMIT, raw)).transpose()?;
    let offset = param(OFFSET).map(|raw| parse_i64(OFFSET, raw)).transpose()?;

    Ok(ListQuery {
        filter: ContactFilter {
            external_id,
            phone_number,
        },
        page: Page::new(limit, offset),
    })
}

/// Parse a decimal integer, saturating at the `i64` bounds so that oversized
/// but well-formed numbers still reach the clamps.
fn parse_i64(field: &str, raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Ok(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ValidationError::new(
                field,
                ValidationCode::InvalidType,
                format!("{field} must be an integer, got {raw:?}"),
            )),
        },
    }
}
