//! Single binary web server: admin page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DEFAULT_MERIT_SLOTS, DEFAULT_RANDOM_SLOTS.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;
use wnf_selection_web::{
    candidates_from_csv, close_registration, reopen_registration, Candidate, CandidateStats, Game,
    GameId, SelectionResult, ServerConfig,
};

/// Per-game entry: game data + last activity time (for auto-cleanup).
struct GameEntry {
    game: Game,
    last_activity: Instant,
}

/// In-memory state: games by ID. Entries are removed after a day of inactivity.
type AppState = Data<RwLock<HashMap<GameId, GameEntry>>>;

/// Inactivity threshold: games not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(24 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateGameBody {
    date: Option<DateTime<Utc>>,
    merit_slots: Option<i64>,
    random_slots: Option<i64>,
}

#[derive(Deserialize)]
struct SlotsBody {
    merit_slots: i64,
    random_slots: i64,
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    /// Precomputed XP; computed from `stats` when absent.
    xp: Option<u32>,
    #[serde(default)]
    stats: CandidateStats,
}

#[derive(Deserialize)]
struct CloseBody {
    /// Replay a previous draw by passing its seed.
    seed: Option<u64>,
}

#[derive(Serialize)]
struct CloseResponse<'a> {
    game: &'a Game,
    result: SelectionResult,
}

/// Path segment: game id (e.g. /api/games/{id})
#[derive(Deserialize)]
struct GamePath {
    id: GameId,
}

/// Path segments: game id and candidate id (e.g. /api/games/{id}/registrations/{candidate_id})
#[derive(Deserialize)]
struct GameCandidatePath {
    id: GameId,
    candidate_id: Uuid,
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn no_game() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No game" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "wnf-selection-web",
    })
}

#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new game (returns it with id; client stores id for subsequent requests).
#[post("/api/games")]
async fn api_create_game(
    state: AppState,
    config: Data<ServerConfig>,
    body: Option<Json<CreateGameBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner);
    let date = body.as_ref().and_then(|b| b.date).unwrap_or_else(Utc::now);
    let merit = body.as_ref().and_then(|b| b.merit_slots);
    let random = body.as_ref().and_then(|b| b.random_slots);
    let slots = match config.default_slots.with_overrides(merit, random) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let game = Game::new(date, slots);
    let id = game.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(GameEntry {
        game,
        last_activity: Instant::now(),
    });
    log::info!("Created game {}", id);
    HttpResponse::Ok().json(&entry.game)
}

/// Get a game by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/games/{id}")]
async fn api_get_game(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.game)
        }
        None => no_game(),
    }
}

/// Update merit/random slot counts (registration must be open).
#[put("/api/games/{id}/slots")]
async fn api_set_slots(state: AppState, path: Path<GamePath>, body: Json<SlotsBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let game = &mut entry.game;
    match game.set_slots(body.merit_slots, body.random_slots) {
        Ok(()) => HttpResponse::Ok().json(game),
        Err(e) => bad_request(e),
    }
}

/// Register a player (registration must be open).
#[post("/api/games/{id}/registrations")]
async fn api_register(
    state: AppState,
    config: Data<ServerConfig>,
    path: Path<GamePath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let candidate = match body.xp {
        Some(xp) => Candidate::new(body.name, xp).with_stats(body.stats),
        None => Candidate::from_stats(body.name, body.stats, &config.xp_weights),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let game = &mut entry.game;
    match game.register(candidate) {
        Ok(_) => HttpResponse::Ok().json(game),
        Err(e) => bad_request(e),
    }
}

/// Remove a registration (registration must be open).
#[delete("/api/games/{id}/registrations/{candidate_id}")]
async fn api_unregister(state: AppState, path: Path<GameCandidatePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let game = &mut entry.game;
    match game.unregister(path.candidate_id) {
        Ok(()) => HttpResponse::Ok().json(game),
        Err(e) => bad_request(e),
    }
}

/// Register every row of a CSV body. All or nothing: one bad row rejects the whole import.
#[post("/api/games/{id}/registrations/import")]
async fn api_import_registrations(
    state: AppState,
    config: Data<ServerConfig>,
    path: Path<GamePath>,
    body: String,
) -> HttpResponse {
    let candidates = match candidates_from_csv(body.as_bytes(), &config.xp_weights) {
        Ok(c) => c,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let mut updated = entry.game.clone();
    for c in candidates {
        if let Err(e) = updated.register(c) {
            return bad_request(e);
        }
    }
    entry.game = updated;
    HttpResponse::Ok().json(&entry.game)
}

/// Close registration and run selection. Returns the updated game and the selection result.
#[post("/api/games/{id}/close")]
async fn api_close_registration(
    state: AppState,
    path: Path<GamePath>,
    body: Option<Json<CloseBody>>,
) -> HttpResponse {
    let seed = body.and_then(|b| b.seed);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let game = &mut entry.game;
    let result = match seed {
        Some(seed) => close_registration(game, &mut StdRng::seed_from_u64(seed)),
        None => close_registration(game, &mut rand::thread_rng()),
    };
    match result {
        Ok(result) => HttpResponse::Ok().json(CloseResponse { game, result }),
        Err(e) => {
            log::warn!("Failed to close registration for game {}: {}", game.id, e);
            bad_request(e)
        }
    }
}

/// Reopen registration: statuses reset, selection discarded.
#[post("/api/games/{id}/reopen")]
async fn api_reopen_registration(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_game(),
    };
    entry.last_activity = Instant::now();
    let game = &mut entry.game;
    match reopen_registration(game) {
        Ok(()) => HttpResponse::Ok().json(game),
        Err(e) => bad_request(e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let bind = (config.host.clone(), config.port);
    log::info!(
        "Starting server at http://{}:{} (default slots: {} merit, {} random)",
        bind.0,
        bind.1,
        config.default_slots.merit_slots,
        config.default_slots.random_slots
    );

    let state = Data::new(RwLock::new(HashMap::<GameId, GameEntry>::new()));
    let config = Data::new(config);

    // Background task: every 30 minutes, remove games inactive for a day
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive game(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_game)
            .service(api_get_game)
            .service(api_set_slots)
            .service(api_import_registrations)
            .service(api_register)
            .service(api_unregister)
            .service(api_close_registration)
            .service(api_reopen_registration)
            .service(Files::new("/static", "static"))
    })
    .bind((bind.0.as_str(), bind.1))?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
