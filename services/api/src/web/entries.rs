//! services/api/src/web/entries.rs
//!
//! Contains the Axum handlers for the journal REST endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{NaiveDate, Weekday};
use journal_core::calendar::{self, MonthGrid};
use journal_core::domain::{EntryDetail, EntrySummary, NewEntry};
use journal_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

/// How many points the dashboard mood series carries.
const MOOD_SERIES_LIMIT: u32 = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        create_entry_handler,
        list_entries_handler,
        get_entry_handler,
        delete_entry_handler,
        calendar_handler,
        dashboard_handler,
    ),
    components(schemas(
        crate::web::auth::SignupRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::AuthResponse,
        CreateEntryRequest,
        CreateEntryResponse,
        EntrySummaryResponse,
        EntryDetailResponse,
        DeleteEntryResponse,
        MonthRef,
        CalendarResponse,
        MoodPointResponse,
        DashboardResponse,
    )),
    tags(
        (name = "Journal API", description = "API endpoints for the personal journal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
}

/// The response payload sent after successfully creating an entry.
#[derive(Serialize, ToSchema)]
pub struct CreateEntryResponse {
    pub entry_id: i64,
}

#[derive(Serialize, ToSchema)]
pub struct EntrySummaryResponse {
    pub id: i64,
    pub title: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
    pub created_at: String,
}

impl EntrySummaryResponse {
    fn from_domain(summary: EntrySummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            mood: summary.mood,
            mood_rating: summary.mood_rating,
            created_at: summary.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EntryDetailResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
    pub created_at: String,
}

impl EntryDetailResponse {
    fn from_domain(detail: EntryDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title,
            content: detail.content,
            mood: detail.mood,
            mood_rating: detail.mood_rating,
            created_at: detail.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DeleteEntryResponse {
    pub deleted: bool,
}

#[derive(Serialize, ToSchema)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

/// One month of the calendar: the padded grid, which days have entries, and
/// where the previous/next links lead.
#[derive(Serialize, ToSchema)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    /// Rows of seven cells; `null` cells pad before the 1st and after the last day.
    pub weeks: Vec<Vec<Option<u32>>>,
    pub prev: MonthRef,
    pub next: MonthRef,
    /// ISO dates within the month on which the user has at least one entry.
    pub marked_dates: Vec<String>,
}

impl CalendarResponse {
    fn new(grid: MonthGrid, marked_dates: Vec<String>) -> Self {
        Self {
            year: grid.year,
            month: grid.month,
            month_name: grid.month_name.to_string(),
            weeks: grid.cells.chunks(7).map(<[_]>::to_vec).collect(),
            prev: MonthRef {
                year: grid.prev.0,
                month: grid.prev.1,
            },
            next: MonthRef {
                year: grid.next.0,
                month: grid.next.1,
            },
            marked_dates,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MoodPointResponse {
    pub date: String,
    pub rating: f64,
}

/// The dashboard summary. The series is most-recent-first; a charting client
/// may reverse it for chronological display.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub mood_series: Vec<MoodPointResponse>,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    /// Optional `YYYY-MM-DD` filter.
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Maps a port failure onto its HTTP shape. NotFound stays deliberately
/// uninformative so that foreign entry ids and absent ones look the same.
fn port_error_response(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
        PortError::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string()),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unexpected(msg) => {
            error!("Store operation failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new journal entry.
///
/// The entry id and the creation timestamp are assigned by the server.
#[utoipa::path(
    post,
    path = "/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created successfully", body = CreateEntryResponse),
        (status = 400, description = "Missing or invalid title/content"),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry = NewEntry {
        title: req.title,
        content: req.content,
        mood: req.mood,
        mood_rating: req.mood_rating,
    };

    let entry_id = app_state
        .db
        .create_entry(&owner, entry)
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(CreateEntryResponse { entry_id })))
}

/// List the user's history, most recent first.
///
/// With `?date=YYYY-MM-DD` the list is narrowed to entries created on that
/// calendar day.
#[utoipa::path(
    get,
    path = "/entries",
    params(
        ("date" = Option<String>, Query, description = "Restrict to one calendar day (YYYY-MM-DD).")
    ),
    responses(
        (status = 200, description = "The user's entries", body = [EntrySummaryResponse]),
        (status = 400, description = "Malformed date filter"),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_entries_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summaries = match params.date {
        Some(raw) => {
            let day: NaiveDate = raw.parse().map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("'{}' is not a YYYY-MM-DD date", raw),
                )
            })?;
            app_state.db.list_entries_on(&owner, day).await
        }
        None => app_state.db.list_entries(&owner).await,
    }
    .map_err(port_error_response)?;

    let body: Vec<EntrySummaryResponse> = summaries
        .into_iter()
        .map(EntrySummaryResponse::from_domain)
        .collect();
    Ok(Json(body))
}

/// Fetch one entry in full.
#[utoipa::path(
    get,
    path = "/entries/{id}",
    params(
        ("id" = i64, Path, description = "The entry id.")
    ),
    responses(
        (status = 200, description = "The entry", body = EntryDetailResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such entry for this user"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(entry_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let detail = app_state
        .db
        .get_entry(&owner, entry_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(EntryDetailResponse::from_domain(detail)))
}

/// Delete one entry.
///
/// Deleting an id that is absent (or not yours) reports `deleted: false`
/// rather than failing.
#[utoipa::path(
    delete,
    path = "/entries/{id}",
    params(
        ("id" = i64, Path, description = "The entry id.")
    ),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteEntryResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Path(entry_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = app_state
        .db
        .delete_entry(&owner, entry_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(DeleteEntryResponse { deleted }))
}

/// The calendar month view.
///
/// Missing or malformed `year`/`month` parameters fall back to the current
/// month instead of failing the view.
#[utoipa::path(
    get,
    path = "/calendar",
    params(
        ("year" = Option<i32>, Query, description = "Calendar year."),
        ("month" = Option<u32>, Query, description = "Calendar month, 1-12.")
    ),
    responses(
        (status = 200, description = "The month grid", body = CalendarResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn calendar_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Query(params): Query<CalendarParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (year, month) = calendar::resolve_month(
        params.year.as_deref().and_then(|y| y.parse().ok()),
        params.month.as_deref().and_then(|m| m.parse().ok()),
    );

    let grid = calendar::build(year, month, Weekday::Sun);
    let marked = app_state
        .db
        .dates_with_entries(&owner, year, month)
        .await
        .map_err(port_error_response)?;

    let marked_dates = marked.into_iter().map(|d| d.to_string()).collect();
    Ok(Json(CalendarResponse::new(grid, marked_dates)))
}

/// The dashboard summary: the most recent mood ratings, newest first.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Recent mood series", body = DashboardResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let series = app_state
        .db
        .recent_mood_series(&owner, MOOD_SERIES_LIMIT)
        .await
        .map_err(port_error_response)?;

    let mood_series = series
        .into_iter()
        .map(|p| MoodPointResponse {
            date: p.date.to_string(),
            rating: p.rating,
        })
        .collect();

    Ok(Json(DashboardResponse { mood_series }))
}
