//! Record routes.
//!
//! One controller, generic over the record kind, covering the whole
//! CRUD surface for every kind on the board:
//!
//! - GET/POST /{kind}/new - Create a record
//! - GET /{kind}/:id - Record detail with comments
//! - GET/POST /{kind}/edit/:id - Edit a record (author only)
//! - GET /{kind}/list - List all records of the kind
//! - GET /{kind}/delete/:id - Delete a record (author only)
//! - GET /{kind}/favorites - Favorite records (kinds that carry the flag)
//!
//! Mutations are gated on ownership: the requester's identity must equal
//! the record's stored author id. The check runs before any form
//! processing, so a non-author never sees an edit form. Denials recover
//! locally with a notice and a redirect; they never surface as errors.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Router,
};
use axum_extra::extract::CookieJar;

use crate::db::{self, RecordWithAuthor};
use crate::middleware::SessionUser;
use crate::models::{self, FieldErrors, FormValues, InputKind, Record, RecordKind};
use crate::services::{flash, ListRow};
use crate::{AppState, Error, Result};

/// Build the CRUD routes for one record kind.
pub fn routes<K: RecordKind>() -> Router<AppState> {
    let mut router = Router::new()
        .route("/new", get(new_record_form::<K>).post(create_record::<K>))
        .route("/list", get(list_records::<K>))
        .route("/:id", get(view_record::<K>))
        .route("/edit/:id", get(edit_record_form::<K>).post(update_record::<K>))
        .route("/delete/:id", get(delete_record::<K>));

    if K::HAS_FAVORITES {
        router = router.route("/favorites", get(favorites_list::<K>));
    }

    router
}

// ============================================================================
// Handlers
// ============================================================================

/// Render the empty input form.
///
/// GET /{kind}/new
async fn new_record_form<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Result<Response> {
    let (jar, notice) = flash::take(jar);
    let body = state.renderer.record_form(
        &format!("New {}", K::LABEL),
        &format!("/{}/new", K::KIND),
        K::schema(),
        &FormValues::new(),
        &FieldErrors::default(),
        Some(&user.display_name),
        notice.as_deref(),
    );
    Ok((jar, Html(body)).into_response())
}

/// Create a record from a submitted form.
///
/// POST /{kind}/new
async fn create_record<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<FormValues>,
) -> Result<Response> {
    match K::parse_form(&form) {
        Ok(fields) => {
            let input = db::CreateRecord {
                id: models::new_id(),
                kind: K::KIND,
                fields: Record::<K>::encode_fields(&fields)?,
                author_id: user.user_id.clone(),
                modify_date: models::now(),
            };
            let row = db::insert_record(&state.db, input).await?;
            Ok(Redirect::to(&detail_path::<K>(&row.id)).into_response())
        }
        Err(errors) => {
            // Invalid submission: no side effect, back to the form
            let body = state.renderer.record_form(
                &format!("New {}", K::LABEL),
                &format!("/{}/new", K::KIND),
                K::schema(),
                &form,
                &errors,
                Some(&user.display_name),
                None,
            );
            Ok(Html(body).into_response())
        }
    }
}

/// Record detail with its comments.
///
/// GET /{kind}/:id
async fn view_record<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response> {
    let record = load::<K>(&state, &id).await?;
    let author_name = match db::get_user(&state.db, &record.author_id).await {
        Ok(author) => author.display_name,
        Err(Error::NotFound(_)) => "unknown".to_string(),
        Err(err) => return Err(err),
    };
    let comments = db::list_comments_for_record(&state.db, K::KIND, &record.id).await?;

    let (jar, notice) = flash::take(jar);
    let body = state.renderer.record_detail(
        K::LABEL,
        K::KIND,
        &record.id,
        &K::title(&record.fields),
        &display_fields::<K>(&record.fields),
        &author_name,
        record.modify_date,
        &comments,
        Some(&user.display_name),
        notice.as_deref(),
    );
    Ok((jar, Html(body)).into_response())
}

/// Render the edit form, pre-populated with the record's current values.
///
/// GET /{kind}/edit/:id
async fn edit_record_form<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response> {
    let record = load::<K>(&state, &id).await?;

    // Ownership check before any form handling; a non-author never
    // sees the edit form.
    if record.author_id != user.user_id {
        let jar = flash::set(jar, &format!("You can't edit a {} you don't own.", K::LABEL));
        return Ok((jar, Redirect::to(&detail_path::<K>(&id))).into_response());
    }

    let (jar, notice) = flash::take(jar);
    let body = state.renderer.record_form(
        &format!("Edit {}", K::LABEL),
        &format!("/{}/edit/{}", K::KIND, id),
        K::schema(),
        &K::form_values(&record.fields),
        &FieldErrors::default(),
        Some(&user.display_name),
        notice.as_deref(),
    );
    Ok((jar, Html(body)).into_response())
}

/// Apply an edit from a submitted form.
///
/// POST /{kind}/edit/:id
async fn update_record<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<FormValues>,
) -> Result<Response> {
    let record = load::<K>(&state, &id).await?;

    if record.author_id != user.user_id {
        let jar = flash::set(jar, &format!("You can't edit a {} you don't own.", K::LABEL));
        return Ok((jar, Redirect::to(&detail_path::<K>(&id))).into_response());
    }

    match K::parse_form(&form) {
        Ok(fields) => {
            // Only the field document and modify date change; the author
            // reference is not part of the update.
            db::update_record(
                &state.db,
                K::KIND,
                &id,
                &Record::<K>::encode_fields(&fields)?,
                models::now(),
            )
            .await?;
            Ok(Redirect::to(&detail_path::<K>(&id)).into_response())
        }
        Err(errors) => {
            let body = state.renderer.record_form(
                &format!("Edit {}", K::LABEL),
                &format!("/{}/edit/{}", K::KIND, id),
                K::schema(),
                &form,
                &errors,
                Some(&user.display_name),
                None,
            );
            Ok(Html(body).into_response())
        }
    }
}

/// List all records of the kind.
///
/// GET /{kind}/list (also reachable via the plural alias)
pub(super) async fn list_records<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Result<Response> {
    let rows = db::list_records(&state.db, K::KIND).await?;
    render_list::<K>(&state, &user, jar, &format!("All {}", K::PLURAL), to_list_rows::<K>(rows)?)
}

/// List the records flagged as favorites.
///
/// GET /{kind}/favorites
async fn favorites_list<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Result<Response> {
    let mut rows = db::list_records(&state.db, K::KIND).await?;
    rows.retain(|row| {
        serde_json::from_str::<K::Fields>(&row.fields)
            .map(|fields| K::is_favorite(&fields))
            .unwrap_or(false)
    });
    render_list::<K>(
        &state,
        &user,
        jar,
        &format!("Favorite {}", K::PLURAL),
        to_list_rows::<K>(rows)?,
    )
}

/// Delete a record, author permitting, and return to the list.
///
/// GET /{kind}/delete/:id
async fn delete_record<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response> {
    let record = load::<K>(&state, &id).await?;

    let jar = if record.author_id == user.user_id {
        db::delete_record(&state.db, K::KIND, &id).await?;
        flash::set(jar, &format!("The {} was deleted.", K::LABEL))
    } else {
        flash::set(jar, &format!("You can't delete a {} you don't own.", K::LABEL))
    };

    // Both branches land on the list, which re-reads the store.
    Ok((jar, Redirect::to(&list_path::<K>())).into_response())
}

// ============================================================================
// Helpers
// ============================================================================

async fn load<K: RecordKind>(state: &AppState, id: &str) -> Result<Record<K>> {
    let row = db::get_record(&state.db, K::KIND, id).await?;
    Record::<K>::from_row(row)
}

fn detail_path<K: RecordKind>(id: &str) -> String {
    format!("/{}/{}", K::KIND, id)
}

fn list_path<K: RecordKind>() -> String {
    format!("/{}/list", K::KIND)
}

/// Field (label, value) pairs for the detail page, in schema order.
fn display_fields<K: RecordKind>(fields: &K::Fields) -> Vec<(&'static str, String)> {
    let values = K::form_values(fields);
    K::schema()
        .iter()
        .map(|field| {
            let raw = values.get(field.name).cloned().unwrap_or_default();
            let shown = match field.input {
                InputKind::Checkbox => {
                    if raw.is_empty() { "no" } else { "yes" }.to_string()
                }
                _ => raw,
            };
            (field.label, shown)
        })
        .collect()
}

fn to_list_rows<K: RecordKind>(rows: Vec<RecordWithAuthor>) -> Result<Vec<ListRow>> {
    rows.into_iter()
        .map(|row| {
            let fields: K::Fields = serde_json::from_str(&row.fields).map_err(|e| {
                Error::Internal(format!("corrupt {} document {}: {}", K::KIND, row.id, e))
            })?;
            Ok(ListRow {
                id: row.id,
                title: K::title(&fields),
                author_name: row.author_name,
                modify_date: row.modify_date,
            })
        })
        .collect()
}

fn render_list<K: RecordKind>(
    state: &AppState,
    user: &SessionUser,
    jar: CookieJar,
    heading: &str,
    rows: Vec<ListRow>,
) -> Result<Response> {
    let (jar, notice) = flash::take(jar);
    let body = state.renderer.record_list(
        heading,
        K::KIND,
        K::LABEL,
        &rows,
        Some(&user.display_name),
        notice.as_deref(),
    );
    Ok((jar, Html(body)).into_response())
}
