//! `/contacts` HTTP handlers
//!
//! Reads are public. `POST`, `PUT` and `DELETE` sit behind [`JwtAuth`], so a
//! request without a valid bearer token gets a 401 before its body is read.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use super::model::{Contact, CreateContactRequest, UpdateContactRequest};
use crate::{
    api_error::{ApiError, ApiOperation},
    middleware::JwtAuth,
    pagination::{Page, PageQuery, Pages},
    state::AppState,
};

/// Contact routes, protected where they mutate
pub fn routes(auth: JwtAuth) -> Router<AppState> {
    let require_auth = || from_fn_with_state(auth.clone(), JwtAuth::middleware);

    Router::new()
        .route(
            "/contacts",
            get(list_contacts).merge(post(create_contact).route_layer(require_auth())),
        )
        .route(
            "/contacts/{id}",
            get(get_contact).merge(
                put(update_contact)
                    .delete(delete_contact)
                    .route_layer(require_auth()),
            ),
        )
}

/// 201 Created with a `Location` header pointing at the new contact
struct Created(Contact);

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        let location = format!("/contacts/{}", self.0.id);
        (
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(self.0),
        )
            .into_response()
    }
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    state
        .contacts()
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(ApiOperation::Get, e))
}

async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Page<Contact>>, ApiError> {
    let query = PageQuery::from_pairs(params);
    let contacts = state.contacts();

    let total = contacts
        .count()
        .await
        .map_err(|e| ApiError::from_service(ApiOperation::List, e))?;

    let pages = Pages::from_query(&query, total, &state.config().pagination);

    let items = contacts
        .query(pages.offset(), pages.limit())
        .await
        .map_err(|e| ApiError::from_service(ApiOperation::List, e))?;

    Ok(Json(pages.wrap(items)))
}

async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<Created, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(ApiOperation::Create, e))?;

    let contact = state
        .contacts()
        .create(input)
        .await
        .map_err(|e| ApiError::from_service(ApiOperation::Create, e))?;

    tracing::info!(contact_id = %contact.id, "contact created");
    Ok(Created(contact))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateContactRequest>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(ApiOperation::Update, e))?;

    state
        .contacts()
        .update(&id, input)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(ApiOperation::Update, e))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .contacts()
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_service(ApiOperation::Delete, e))?;

    tracing::info!(contact_id = %contact.id, "contact deleted");
    Ok(Json(contact))
}
