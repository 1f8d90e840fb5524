use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::AppState;
use crate::contact::Contact;
use crate::error::ApiError;
use crate::validate::{parse_create_payload, parse_list_query, ListQuery};

/// `POST /contacts`
///
/// The body is read raw so that malformed JSON and a missing content type
/// both surface as validation errors rather than extractor rejections.
pub async fn create_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let new_contact = parse_create_payload(&body)?;
    let inserted = state.contacts.insert(new_contact).await?;
    info!(id = %inserted.id, external_id = inserted.external_id, "contact created");
    Ok((StatusCode::CREATED, Json(inserted)))
}

/// `GET /contacts`
pub async fn get_contacts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let ListQuery { filter, page } = parse_list_query(&params)?;
    let contacts = state.contacts.query(&filter, page).await?;
    Ok(Json(contacts))
}
