//! HTTP surface: REST handlers over the player store, balancer and auth gate.

use crate::auth::{require_admin, start_session, AuthError, Credentials};
use crate::error::AppError;
use crate::logic::generate_teams;
use crate::models::{PlayerId, PlayerInput, PlayerSummary};
use crate::roster::write_roster;
use crate::store::{PlayerStore, StoreError};
use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use serde::Deserialize;

/// Maximum number of search-as-you-type results.
pub const SEARCH_LIMIT: usize = 10;

/// Shared application state: the store handle and the admin credentials.
pub struct AppState {
    pub store: Box<dyn PlayerStore>,
    pub credentials: Credentials,
}

impl AppState {
    pub fn new(store: impl PlayerStore + 'static, credentials: Credentials) -> Self {
        Self {
            store: Box::new(store),
            credentials,
        }
    }
}

type State = Data<AppState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: String,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(rename = "playerIds", default)]
    player_ids: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Run a store mutation on the blocking pool; file-backed stores write to disk under their lock.
async fn run_store<T, F>(state: &State, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&dyn PlayerStore) -> Result<T, StoreError> + Send + 'static,
{
    let state = state.clone();
    let result = web::block(move || op(&*state.store))
        .await
        .map_err(|e| AppError::Internal(format!("store task failed: {e}")))?;
    Ok(result?)
}

/// Body extraction is deferred so the session gate answers first.
fn admin_body(body: Result<Json<PlayerInput>, actix_web::Error>) -> Result<PlayerInput, AppError> {
    body.map(Json::into_inner)
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Unparseable ids cannot name a stored player.
fn parse_player_id(raw: &str) -> Result<PlayerId, AppError> {
    PlayerId::parse_str(raw).map_err(|_| AppError::NotFound("Player not found".to_string()))
}

/// Single page UI.
#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../templates/index.html"))
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-divider-web",
    })
}

/// All players, sorted by name.
#[get("/api/players")]
async fn api_list_players(state: State) -> Result<HttpResponse, AppError> {
    let players = state.store.list()?;
    Ok(HttpResponse::Ok().json(players))
}

#[post("/api/players")]
async fn api_create_player(state: State, body: Json<PlayerInput>) -> Result<HttpResponse, AppError> {
    let fields = body.validate()?;
    let player = run_store(&state, move |store| store.insert(fields)).await?;
    log::info!("Created player {:?} ({})", player.name, player.id);
    Ok(HttpResponse::Created().json(player))
}

/// Admin only. Full-field update; renaming onto another player's name is a conflict.
#[put("/api/players/{id}")]
async fn api_update_player(
    state: State,
    session: Session,
    path: Path<PlayerPath>,
    body: Result<Json<PlayerInput>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let id = parse_player_id(&path.id)?;
    let fields = admin_body(body)?.validate()?;
    let player = run_store(&state, move |store| store.update(id, fields)).await?;
    log::info!("Updated player {:?} ({})", player.name, player.id);
    Ok(HttpResponse::Ok().json(player))
}

/// Admin only.
#[delete("/api/players/{id}")]
async fn api_delete_player(
    state: State,
    session: Session,
    path: Path<PlayerPath>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let id = parse_player_id(&path.id)?;
    let player = run_store(&state, move |store| store.delete(id)).await?;
    log::info!("Deleted player {:?} ({})", player.name, player.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Player deleted successfully" })))
}

/// Roster as CSV download.
#[get("/api/players/export")]
async fn api_export_players(state: State) -> Result<HttpResponse, AppError> {
    let players = state.store.list()?;
    let mut csv = Vec::new();
    write_roster(&players, &mut csv).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"players.csv\""))
        .body(csv))
}

/// Search-as-you-type: case-insensitive name fragment, up to 10 results.
#[get("/api/search")]
async fn api_search_players(
    state: State,
    params: Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) else {
        return Ok(HttpResponse::Ok().json(Vec::<PlayerSummary>::new()));
    };
    let matches: Vec<PlayerSummary> = state
        .store
        .search(query, SEARCH_LIMIT)?
        .iter()
        .map(|p| p.summary())
        .collect();
    Ok(HttpResponse::Ok().json(matches))
}

/// Split the selected players into two balanced teams.
#[post("/api/generate")]
async fn api_generate_teams(state: State, body: Json<GenerateBody>) -> Result<HttpResponse, AppError> {
    let ids = body.player_ids.as_deref().unwrap_or_default();
    let teams = generate_teams(&*state.store, ids, &mut rand::thread_rng())?;
    log::debug!(
        "Generated teams: {} vs {} (ratings {} vs {})",
        teams.team1.len(),
        teams.team2.len(),
        teams.team1.total_rating,
        teams.team2.total_rating
    );
    Ok(HttpResponse::Ok().json(teams))
}

#[post("/api/auth/login")]
async fn api_login(state: State, session: Session, body: Json<LoginBody>) -> Result<HttpResponse, AppError> {
    let (Some(username), Some(password)) = (
        body.username.as_deref().filter(|u| !u.is_empty()),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    };
    if !state.credentials.verify(username, password) {
        log::warn!("Rejected login for {:?}", username);
        return Err(AuthError::InvalidCredentials.into());
    }
    start_session(&session, &state.credentials.username)
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;
    log::info!("Admin {:?} logged in", username);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "message": "Login successful" })))
}

#[post("/api/auth/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "message": "Logout successful" }))
}

/// Reports whether the caller holds a valid session (401 when not).
#[get("/api/auth/check")]
async fn api_check_session(session: Session) -> HttpResponse {
    match require_admin(&session) {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "authenticated": true })),
        Err(_) => HttpResponse::Unauthorized().json(serde_json::json!({ "authenticated": false })),
    }
}

/// Register the page and every API route, plus JSON/query extractor errors in the `{"error": ...}` shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        AppError::Validation(format!("Invalid query: {err}")).into()
    }))
    .service(index)
    .service(favicon)
    .service(api_health)
    .service(api_list_players)
    .service(api_export_players)
    .service(api_create_player)
    .service(api_update_player)
    .service(api_delete_player)
    .service(api_search_players)
    .service(api_generate_teams)
    .service(api_login)
    .service(api_logout)
    .service(api_check_session);
}
