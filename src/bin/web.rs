//! Single binary web server: admin page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), ROSTER_CSV (path to a team roster).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cricket_scoring_admin::{
    default_roster, load_roster, ActiveMatch, CricketStore, Group, KnockoutStage, MatchSetupForm,
    MatchType, SetupScreen, Team, TeamId, TeamSlot, Toast, Tournament,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Session key holding the id of this browser's setup form.
const FORM_KEY: &str = "setup_form_id";

/// Where the admin page goes after a match starts (or when resuming).
const SCORER_PATH: &str = "/#scorer";

/// Forms not touched for this long are discarded.
const FORM_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(2 * 3600);

/// Per-session form: selections + last activity time (for auto-cleanup).
struct FormEntry {
    form: MatchSetupForm,
    last_activity: Instant,
}

/// In-memory state: the tournament store and one setup form per browser session.
struct AdminState {
    tournament: Tournament,
    forms: HashMap<Uuid, FormEntry>,
}

type AppState = Data<RwLock<AdminState>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct StartResponse {
    toast: Toast,
    /// Set by the form's navigation callback.
    navigate_to: Option<&'static str>,
    screen: SetupScreen,
}

#[derive(Serialize)]
struct EndMatchResponse {
    ended: Option<ActiveMatch>,
}

#[derive(Deserialize)]
struct GroupBody {
    group: Group,
}

#[derive(Deserialize)]
struct MatchTypeBody {
    match_type: MatchType,
}

#[derive(Deserialize)]
struct KnockoutStageBody {
    stage: KnockoutStage,
}

/// Pick (or clear, with an empty id) one team selector.
#[derive(Deserialize)]
struct TeamPickBody {
    slot: TeamSlot,
    #[serde(default)]
    team_id: TeamId,
}

/// Path segment: group (e.g. /api/teams/group/A)
#[derive(Deserialize)]
struct GroupPath {
    group: Group,
}

/// Rejected JSON bodies get the same `{"error", "toast"}` shape as other 400s.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "error": message,
            "toast": Toast::error(message.clone()),
        }));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// Form id of this session; a new one is stored in the session if missing.
fn session_form_id(session: &Session) -> Uuid {
    if let Ok(Some(id)) = session.get::<Uuid>(FORM_KEY) {
        return id;
    }
    let id = Uuid::new_v4();
    if let Err(e) = session.insert(FORM_KEY, id) {
        log::warn!("Could not store setup form id in session: {}", e);
    }
    id
}

/// Mount the form for `id` if needed and refresh its last activity.
fn touch_form(forms: &mut HashMap<Uuid, FormEntry>, id: Uuid) -> &mut MatchSetupForm {
    let entry = forms.entry(id).or_insert_with(|| FormEntry {
        form: MatchSetupForm::new(),
        last_activity: Instant::now(),
    });
    entry.last_activity = Instant::now();
    &mut entry.form
}

/// Apply a setter to this session's form and respond with the new screen.
fn update_form(state: &AppState, session: &Session, f: impl FnOnce(&mut MatchSetupForm)) -> HttpResponse {
    let id = session_form_id(session);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AdminState { tournament, forms } = &mut *g;
    let form = touch_form(forms, id);
    f(form);
    HttpResponse::Ok().json(form.screen(&*tournament))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cricket-scoring-admin",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Full roster (knockout selectors).
#[get("/api/teams")]
async fn api_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.tournament.teams())
}

/// Teams of one group, in roster order.
#[get("/api/teams/group/{group}")]
async fn api_group_teams(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let teams: Vec<Team> = g.tournament.teams_by_group(path.group);
    HttpResponse::Ok().json(teams)
}

/// Current match state (`current_match` is null when none is in progress).
#[get("/api/match")]
async fn api_current_match(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.tournament.match_state)
}

/// End the current match so a new one can be set up.
#[post("/api/match/end")]
async fn api_end_match(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let ended = g.tournament.end_match();
    HttpResponse::Ok().json(EndMatchResponse { ended })
}

/// Current screen for this session: the setup form, or the summary of the match in progress.
#[get("/api/setup")]
async fn api_get_setup(state: AppState, session: Session) -> HttpResponse {
    update_form(&state, &session, |_| {})
}

/// Discard this session's form (operator navigated away).
#[delete("/api/setup")]
async fn api_discard_setup(state: AppState, session: Session) -> HttpResponse {
    let id = match session.get::<Uuid>(FORM_KEY) {
        Ok(Some(id)) => id,
        _ => return HttpResponse::NoContent().finish(),
    };
    session.remove(FORM_KEY);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.forms.remove(&id);
    HttpResponse::NoContent().finish()
}

/// Switch group (clears both group-stage picks).
#[put("/api/setup/group")]
async fn api_set_group(state: AppState, session: Session, body: Json<GroupBody>) -> HttpResponse {
    update_form(&state, &session, |form| form.select_group(body.group))
}

/// Switch between the group and knockout tabs.
#[put("/api/setup/match-type")]
async fn api_set_match_type(state: AppState, session: Session, body: Json<MatchTypeBody>) -> HttpResponse {
    update_form(&state, &session, |form| form.set_match_type(body.match_type))
}

#[put("/api/setup/knockout-stage")]
async fn api_set_knockout_stage(
    state: AppState,
    session: Session,
    body: Json<KnockoutStageBody>,
) -> HttpResponse {
    update_form(&state, &session, |form| form.set_knockout_stage(body.stage))
}

#[put("/api/setup/group-teams")]
async fn api_set_group_team(state: AppState, session: Session, body: Json<TeamPickBody>) -> HttpResponse {
    let body = body.into_inner();
    update_form(&state, &session, |form| form.set_group_team(body.slot, body.team_id))
}

#[put("/api/setup/knockout-teams")]
async fn api_set_knockout_team(state: AppState, session: Session, body: Json<TeamPickBody>) -> HttpResponse {
    let body = body.into_inner();
    update_form(&state, &session, |form| form.set_knockout_team(body.slot, body.team_id))
}

/// Start the match described by the current tab; on success the client navigates to the scorer.
#[post("/api/setup/start")]
async fn api_start_match(state: AppState, session: Session) -> HttpResponse {
    let id = session_form_id(&session);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AdminState { tournament, forms } = &mut *g;
    let form = touch_form(forms, id);
    let mut navigate_to = None;
    match form.start(tournament, || navigate_to = Some(SCORER_PATH)) {
        Ok(toast) => HttpResponse::Ok().json(StartResponse {
            toast,
            navigate_to,
            screen: form.screen(&*tournament),
        }),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string(),
            "toast": Toast::from(&e),
        })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn load_teams() -> std::io::Result<Vec<Team>> {
    let result = match std::env::var("ROSTER_CSV") {
        Ok(path) => {
            log::info!("Loading roster from {}", path);
            load_roster(&path)
        }
        Err(_) => {
            log::info!("ROSTER_CSV not set, using built-in roster");
            default_roster()
        }
    };
    result.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let teams = load_teams()?;
    log::info!("Loaded {} teams", teams.len());
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AdminState {
        tournament: Tournament::with_teams(teams),
        forms: HashMap::new(),
    }));
    // Sessions only carry a form id; a per-process key is enough.
    let session_key = Key::generate();

    // Background task: every 15 minutes, discard forms idle for 2+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(15 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.forms.len();
            g.forms
                .retain(|_, entry| entry.last_activity.elapsed() < FORM_INACTIVITY_TIMEOUT);
            let removed = before - g.forms.len();
            if removed > 0 {
                log::info!("Discarded {} idle setup form(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(session_key.clone()))
            .app_data(json_config())
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_teams)
            .service(api_group_teams)
            .service(api_current_match)
            .service(api_end_match)
            .service(api_get_setup)
            .service(api_discard_setup)
            .service(api_set_group)
            .service(api_set_match_type)
            .service(api_set_knockout_stage)
            .service(api_set_group_team)
            .service(api_set_knockout_team)
            .service(api_start_match)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn test_state() -> AppState {
        Data::new(RwLock::new(AdminState {
            tournament: Tournament::with_teams(default_roster().unwrap()),
            forms: HashMap::new(),
        }))
    }

    #[actix_web::test]
    async fn start_navigates_to_scorer() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .wrap(session_middleware(Key::generate()))
                .app_data(json_config())
                .app_data(state.clone())
                .service(api_set_group_team)
                .service(api_start_match),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/setup/group-teams")
            .set_json(serde_json::json!({ "slot": "team_1", "team_id": "royal-strikers" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();

        let req = test::TestRequest::put()
            .uri("/api/setup/group-teams")
            .cookie(cookie.clone())
            .set_json(serde_json::json!({ "slot": "team_2", "team_id": "desert-falcons" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/setup/start")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["navigate_to"], SCORER_PATH);
        assert_eq!(body["toast"]["message"], "Group match started!");
        assert_eq!(body["screen"]["screen"], "match_in_progress");
        assert!(state.read().unwrap().tournament.current_match().is_some());
    }

    #[actix_web::test]
    async fn failed_start_has_no_navigation() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware(Key::generate()))
                .app_data(test_state())
                .service(api_start_match),
        )
        .await;
        let req = test::TestRequest::post().uri("/api/setup/start").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["toast"]["message"], "Please select both teams");
        assert!(body.get("navigate_to").is_none());
    }

    #[actix_web::test]
    async fn rejected_json_body_returns_error_toast() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware(Key::generate()))
                .app_data(json_config())
                .app_data(test_state())
                .service(api_set_group),
        )
        .await;
        let req = test::TestRequest::put()
            .uri("/api/setup/group")
            .set_json(serde_json::json!({ "group": "C" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
        assert_eq!(body["toast"]["kind"], "error");
    }
}
