use runo_core::{Event, EventBus, GameConfig, GameError, ParseCardError, RngState, Session};
use runo_store::{
    generate_code, load_game_config, FileStore, MemoryStore, SessionStore, StoreError,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server, StatusCode};

/// Attempts per request before giving up on a compare-and-swap save.
/// Conflict retries belong to the persistence layer, never the engine.
const SAVE_ATTEMPTS: usize = 3;

fn main() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let server = Server::http(format!("0.0.0.0:{port}")).expect("start server");
    println!("runo server on http://localhost:{port}");
    let state = Arc::new(Mutex::new(AppState::new()));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state) {
            eprintln!("request error: {err}");
        }
    }
}

struct AppState {
    store: Box<dyn SessionStore + Send>,
    config: GameConfig,
    rng: RngState,
}

impl AppState {
    fn new() -> Self {
        let config_path =
            std::env::var("RUNO_CONFIG").unwrap_or_else(|_| "config.json".to_string());
        let config = load_game_config(Path::new(&config_path)).expect("load config");
        let store: Box<dyn SessionStore + Send> = match std::env::var_os("RUNO_DATA_DIR") {
            Some(dir) => Box::new(FileStore::open(dir).expect("open data dir")),
            None => Box::new(MemoryStore::new()),
        };
        Self {
            store,
            config,
            rng: RngState::from_entropy(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    game: Option<Session>,
    version: Option<u64>,
    events: Vec<Event>,
}

impl ApiResponse {
    fn game(session: Session, version: u64, events: Vec<Event>) -> Self {
        Self {
            ok: true,
            error: None,
            game: Some(session),
            version: Some(version),
            events,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            error: Some(message),
            game: None,
            version: None,
            events: Vec::new(),
        }
    }
}

/// Request failures with the status each maps to: engine rejections and
/// malformed input are 400, a missing room is 404, an exhausted save loop
/// is 409.
enum ApiFailure {
    Invalid(String),
    NotFound(String),
    Conflict(String),
}

impl ApiFailure {
    fn status(&self) -> u16 {
        match self {
            ApiFailure::Invalid(_) => 400,
            ApiFailure::NotFound(_) => 404,
            ApiFailure::Conflict(_) => 409,
        }
    }

    fn message(self) -> String {
        match self {
            ApiFailure::Invalid(message)
            | ApiFailure::NotFound(message)
            | ApiFailure::Conflict(message) => message,
        }
    }
}

impl From<GameError> for ApiFailure {
    fn from(err: GameError) -> Self {
        ApiFailure::Invalid(err.to_string())
    }
}

impl From<StoreError> for ApiFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiFailure::NotFound("Game room not found".to_string()),
            StoreError::VersionConflict { .. } => ApiFailure::Conflict(err.to_string()),
            other => ApiFailure::Invalid(other.to_string()),
        }
    }
}

impl From<ParseCardError> for ApiFailure {
    fn from(err: ParseCardError) -> Self {
        ApiFailure::Invalid(err.to_string())
    }
}

#[derive(Deserialize)]
struct CreateRequest {
    #[serde(rename = "maxPlayers")]
    max_players: usize,
    #[serde(rename = "hostName")]
    host_name: String,
}

#[derive(Deserialize)]
struct JoinRequest {
    code: String,
    #[serde(rename = "playerName")]
    player_name: String,
}

#[derive(Deserialize)]
struct PlayRequest {
    #[serde(rename = "playerName")]
    player_name: String,
    #[serde(rename = "playedCard")]
    played_card: String,
}

#[derive(Deserialize)]
struct DrawRequest {
    #[serde(rename = "playerName")]
    player_name: String,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    let segments: Vec<&str> = url.trim_matches('/').split('/').collect();

    let mut body = String::new();
    if *request.method() == Method::Post {
        request.as_reader().read_to_string(&mut body)?;
    }

    let mut guard = state.lock().unwrap();
    let (status, response) = match (request.method(), segments.as_slice()) {
        (&Method::Post, ["api", "games", "create"]) => finish(201, create_game(&mut guard, &body)),
        (&Method::Post, ["api", "games", "join"]) => finish(200, join_game(&mut guard, &body)),
        (&Method::Post, ["api", "games", code, "start"]) => {
            finish(200, start_game(&mut guard, code))
        }
        (&Method::Post, ["api", "games", code, "play"]) => {
            finish(200, play_card(&mut guard, code, &body))
        }
        (&Method::Post, ["api", "games", code, "draw"]) => {
            finish(200, draw_card(&mut guard, code, &body))
        }
        (&Method::Get, ["api", "games", code]) => finish(200, fetch_game(&guard, code)),
        _ => (404, ApiResponse::failure("unknown route".to_string())),
    };
    drop(guard);

    respond_json(request, status, response)
}

fn finish(ok_status: u16, result: Result<ApiResponse, ApiFailure>) -> (u16, ApiResponse) {
    match result {
        Ok(response) => (ok_status, response),
        Err(failure) => (failure.status(), ApiResponse::failure(failure.message())),
    }
}

fn respond_json(
    request: tiny_http::Request,
    status: u16,
    response: ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "content-type header")?;
    request.respond(
        Response::from_data(body)
            .with_header(header)
            .with_status_code(StatusCode(status)),
    )?;
    Ok(())
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiFailure> {
    serde_json::from_str(body).map_err(|err| ApiFailure::Invalid(format!("bad request: {err}")))
}

fn create_game(state: &mut AppState, body: &str) -> Result<ApiResponse, ApiFailure> {
    let req: CreateRequest = parse_body(body)?;
    if req.host_name.trim().is_empty() {
        return Err(ApiFailure::Invalid("Player name is required".to_string()));
    }
    // Regenerate on the rare code collision instead of failing the call.
    loop {
        let code = generate_code(&mut state.rng);
        match state
            .store
            .create(Session::new(code, req.max_players, req.host_name.clone()))
        {
            Ok(doc) => return Ok(ApiResponse::game(doc.session, doc.version, Vec::new())),
            Err(StoreError::CodeTaken(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

fn join_game(state: &mut AppState, body: &str) -> Result<ApiResponse, ApiFailure> {
    let req: JoinRequest = parse_body(body)?;
    if req.player_name.trim().is_empty() {
        return Err(ApiFailure::Invalid("Player name is required".to_string()));
    }
    apply_transition(state, &req.code, |session, config, _rng, events| {
        session.join(&req.player_name, config, events)
    })
}

fn start_game(state: &mut AppState, code: &str) -> Result<ApiResponse, ApiFailure> {
    apply_transition(state, code, |session, config, rng, events| {
        session.start(config, rng, events)
    })
}

fn play_card(state: &mut AppState, code: &str, body: &str) -> Result<ApiResponse, ApiFailure> {
    let req: PlayRequest = parse_body(body)?;
    let card = req.played_card.parse()?;
    apply_transition(state, code, |session, config, _rng, events| {
        session.play(&req.player_name, &card, config, events)
    })
}

fn draw_card(state: &mut AppState, code: &str, body: &str) -> Result<ApiResponse, ApiFailure> {
    let req: DrawRequest = parse_body(body)?;
    apply_transition(state, code, |session, _config, _rng, events| {
        session.draw(&req.player_name, events)
    })
}

fn fetch_game(state: &AppState, code: &str) -> Result<ApiResponse, ApiFailure> {
    let doc = state.store.load(code)?;
    Ok(ApiResponse::game(doc.session, doc.version, Vec::new()))
}

/// Load, run exactly one engine transition, save with the loaded version.
/// A concurrent writer shows up as a version conflict; reload and retry a
/// few times before reporting it.
fn apply_transition<F>(
    state: &mut AppState,
    code: &str,
    transition: F,
) -> Result<ApiResponse, ApiFailure>
where
    F: Fn(&Session, &GameConfig, &mut RngState, &mut EventBus) -> Result<Session, GameError>,
{
    let mut last_conflict = None;
    for _ in 0..SAVE_ATTEMPTS {
        let doc = state.store.load(code)?;
        let mut events = EventBus::default();
        let next = transition(&doc.session, &state.config, &mut state.rng, &mut events)?;
        match state.store.save(code, doc.version, next) {
            Ok(saved) => {
                return Ok(ApiResponse::game(
                    saved.session,
                    saved.version,
                    events.drain().collect(),
                ))
            }
            Err(StoreError::VersionConflict { expected, actual }) => {
                last_conflict = Some(StoreError::VersionConflict { expected, actual });
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(last_conflict
        .map(ApiFailure::from)
        .unwrap_or_else(|| ApiFailure::Conflict("save retries exhausted".to_string())))
}
