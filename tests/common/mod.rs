//! In-process fake of the asotobase REST backend.
//!
//! Serves the `/api/v1` surface from memory on `127.0.0.1:0`, records every
//! request it sees, and can be told to answer the next request with a fixed
//! status and body.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::extract::{Form, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use asotobase::storage::{MemoryTokenStore, MemoryUserStore, TokenStore};
use asotobase::{ApiClient, ClientConfig, Session};

pub const TIMESTAMP: &str = "2025-11-13T10:00:00Z";
pub const PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    /// Path below `/api/v1`, including any query string.
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct Data {
    requests: Vec<Recorded>,
    forced: Option<(StatusCode, Value)>,
    /// email -> (user json, password)
    users: HashMap<String, (Value, String)>,
    /// token -> user id
    tokens: HashMap<String, String>,
    goals: Vec<Value>,
    steps: Vec<Value>,
    logs: Vec<Value>,
    events: Vec<Value>,
    participants: Vec<Value>,
    projects: Vec<Value>,
    members: Vec<Value>,
    points: Vec<Value>,
    profiles: HashMap<String, Value>,
}

#[derive(Clone, Default)]
pub struct Backend {
    data: Arc<Mutex<Data>>,
}

type Reply = Result<Response, Response>;

fn fail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn ok(status: StatusCode, body: Value) -> Reply {
    Ok((status, Json(body)).into_response())
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Backend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Data) -> T) -> T {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    /// Register `email` with [`PASSWORD`] and return the user's id.
    pub fn seed_user(&self, email: &str, full_name: &str) -> String {
        let id = new_id();
        let user = json!({
            "id": id,
            "full_name": full_name,
            "email": email,
            "is_active": true,
            "created_at": TIMESTAMP,
        });
        self.with(|d| d.users.insert(email.to_owned(), (user, PASSWORD.to_owned())));
        id
    }

    /// Issue a token for an already seeded user without going through `/auth/login`.
    pub fn issue_token(&self, email: &str) -> String {
        self.with(|d| {
            let user_id = d.users[email].0["id"].as_str().unwrap().to_owned();
            let token = format!("token-{}", new_id());
            d.tokens.insert(token.clone(), user_id);
            token
        })
    }

    pub fn revoke_all_tokens(&self) {
        self.with(|d| d.tokens.clear());
    }

    /// Answer the next request with `status` and `body`, whatever it is.
    pub fn fail_next(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.with(|d| d.forced = Some((status, body)));
    }

    pub fn seed_public_log(&self, owner_id: &str, title: &str, tags: &[&str]) -> String {
        let id = new_id();
        let log = json!({
            "id": id,
            "user_id": owner_id,
            "title": title,
            "content": "shared",
            "tags": tags,
            "visibility": "public",
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        });
        self.with(|d| d.logs.insert(0, log));
        id
    }

    pub fn seed_event(&self, owner_id: &str, title: &str) -> String {
        let id = new_id();
        let event = json!({
            "id": id,
            "owner_id": owner_id,
            "title": title,
            "start_date": "2025-12-01T19:00:00",
            "location_type": "offline",
            "tags": [],
            "status": "upcoming",
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        });
        self.with(|d| d.events.insert(0, event));
        id
    }

    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.with(|d| d.requests.clone())
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.with(|d| d.requests.len())
    }

    #[must_use]
    pub fn last_request(&self) -> Option<Recorded> {
        self.with(|d| d.requests.last().cloned())
    }

    fn user_for(&self, headers: &HeaderMap) -> Result<Value, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
        self.with(|d| {
            let user_id = d
                .tokens
                .get(token)
                .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))?;
            d.users
                .values()
                .find(|(user, _)| user["id"] == *user_id)
                .map(|(user, _)| user.clone())
                .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
        })
    }

    fn user_id(&self, headers: &HeaderMap) -> Result<String, Response> {
        self.user_for(headers)
            .map(|u| u["id"].as_str().unwrap_or_default().to_owned())
    }

    fn award(&self, user_id: &str, amount: i64, action_type: &str, reference_id: &str) {
        let point = json!({
            "id": new_id(),
            "user_id": user_id,
            "amount": amount,
            "action_type": action_type,
            "reference_id": reference_id,
            "created_at": TIMESTAMP,
        });
        self.with(|d| d.points.insert(0, point));
    }
}

/// Bind the fake backend and return the client base URL (`http://127.0.0.1:<port>/api/v1`).
pub async fn spawn(backend: Backend) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

/// Fake backend plus a client and session wired to in-memory stores.
pub struct Harness {
    pub backend: Backend,
    pub tokens: Arc<MemoryTokenStore>,
    pub users: Arc<MemoryUserStore>,
    pub client: ApiClient,
}

impl Harness {
    pub async fn start() -> Self {
        let backend = Backend::new();
        let base_url = spawn(backend.clone()).await;
        let config = ClientConfig::new(&base_url).unwrap();
        let tokens = Arc::new(MemoryTokenStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let client = ApiClient::new(&config, tokens.clone()).unwrap();
        Self { backend, tokens, users, client }
    }

    /// Seed a user and store a valid token for it, returning the user id.
    pub fn sign_in_as(&self, email: &str) -> String {
        let user_id = self.backend.seed_user(email, "Test User");
        let token = self.backend.issue_token(email);
        self.tokens.set(&token);
        user_id
    }

    #[must_use]
    pub fn session(&self) -> Session {
        Session::new(self.client.clone(), self.users.clone())
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

fn router(backend: Backend) -> Router {
    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/dashboard", get(dashboard))
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", get(get_goal).patch(update_goal).delete(delete_goal))
        .route("/goals/{id}/steps", post(create_step))
        .route("/steps/{id}", patch(update_step).delete(delete_step))
        .route("/steps/{id}/complete", post(complete_step))
        .route("/logs", get(list_logs).post(create_log))
        .route("/logs/{id}", get(get_log).delete(delete_log))
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event).delete(delete_event))
        .route("/events/{id}/join", post(join_event))
        .route("/events/{id}/leave", delete(leave_event))
        .route("/events/{id}/participants", get(event_participants))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/join", post(join_project))
        .route("/users/me/points", get(points_summary))
        .route("/users/me/points/history", get(points_history))
        .route("/users/me/profile", get(my_profile).patch(update_profile));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn record(State(backend): State<Backend>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let full = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());
    let recorded = Recorded {
        method: parts.method.to_string(),
        path: full.strip_prefix("/api/v1").unwrap_or(&full).to_owned(),
        authorization: header_text(&parts.headers, header::AUTHORIZATION),
        content_type: header_text(&parts.headers, header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    let forced = backend.with(|d| {
        d.requests.push(recorded);
        d.forced.take()
    });
    if let Some((status, body)) = forced {
        return (status, Json(body)).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// =============================================================================
// AUTH
// =============================================================================

async fn register(State(backend): State<Backend>, Json(body): Json<Value>) -> Reply {
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    let password = body["password"].as_str().unwrap_or_default().to_owned();
    if backend.with(|d| d.users.contains_key(&email)) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let user = json!({
        "id": new_id(),
        "full_name": body["full_name"],
        "email": email,
        "is_active": true,
        "created_at": TIMESTAMP,
    });
    backend.with(|d| d.users.insert(email, (user.clone(), password)));
    ok(StatusCode::CREATED, user)
}

async fn login(State(backend): State<Backend>, Form(form): Form<HashMap<String, String>>) -> Reply {
    let email = form.get("username").cloned().unwrap_or_default();
    let password = form.get("password").cloned().unwrap_or_default();
    let user_id = backend.with(|d| {
        d.users
            .get(&email)
            .filter(|(_, stored)| *stored == password)
            .map(|(user, _)| user["id"].as_str().unwrap_or_default().to_owned())
    });
    let Some(user_id) = user_id else {
        return Err(fail(StatusCode::UNAUTHORIZED, "Incorrect email or password"));
    };
    let token = format!("token-{}", new_id());
    backend.with(|d| d.tokens.insert(token.clone(), user_id));
    ok(StatusCode::OK, json!({ "access_token": token, "token_type": "bearer" }))
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    ok(StatusCode::OK, backend.user_for(&headers)?)
}

async fn dashboard(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let body = backend.with(|d| {
        let active_goals: Vec<&Value> = d
            .goals
            .iter()
            .filter(|g| g["user_id"] == *user_id && g["status"] == "active")
            .collect();
        let recent_logs: Vec<&Value> = d.logs.iter().filter(|l| l["user_id"] == *user_id).take(5).collect();
        let total: i64 = d
            .points
            .iter()
            .filter(|p| p["user_id"] == *user_id)
            .filter_map(|p| p["amount"].as_i64())
            .sum();
        let public_logs: Vec<&Value> = d.logs.iter().filter(|l| l["visibility"] == "public").take(5).collect();
        json!({
            "personal": { "active_goals": active_goals, "recent_logs": recent_logs, "total_points": total },
            "community": { "upcoming_events": d.events, "recent_public_logs": public_logs },
        })
    });
    ok(StatusCode::OK, body)
}

// =============================================================================
// GOALS AND STEPS
// =============================================================================

fn find_index(items: &[Value], id: &str) -> Option<usize> {
    items.iter().position(|item| item["id"] == id)
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

async fn list_goals(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let goals: Vec<Value> = backend.with(|d| d.goals.iter().filter(|g| g["user_id"] == *user_id).cloned().collect());
    ok(StatusCode::OK, json!(goals))
}

async fn create_goal(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    if body["title"].as_str().is_none_or(str::is_empty) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "msg": "Field required", "loc": ["body", "title"], "type": "missing" }] })),
        )
            .into_response());
    }
    let mut goal = json!({
        "id": new_id(),
        "user_id": user_id,
        "status": "active",
        "progress": 0,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    merge(&mut goal, &body);
    backend.with(|d| d.goals.insert(0, goal.clone()));
    ok(StatusCode::CREATED, goal)
}

async fn get_goal(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| find_index(&d.goals, &id).map(|i| d.goals[i].clone()))
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Goal not found")), |g| ok(StatusCode::OK, g))
}

async fn update_goal(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| {
            find_index(&d.goals, &id).map(|i| {
                merge(&mut d.goals[i], &body);
                d.goals[i].clone()
            })
        })
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Goal not found")), |g| ok(StatusCode::OK, g))
}

async fn delete_goal(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    let removed = backend.with(|d| find_index(&d.goals, &id).map(|i| d.goals.remove(i)));
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(fail(StatusCode::NOT_FOUND, "Goal not found")),
    }
}

async fn create_step(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(goal_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    backend.user_id(&headers)?;
    if backend.with(|d| find_index(&d.goals, &goal_id).is_none()) {
        return Err(fail(StatusCode::NOT_FOUND, "Goal not found"));
    }
    let mut step = json!({
        "id": new_id(),
        "goal_id": goal_id,
        "status": "pending",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    merge(&mut step, &body);
    backend.with(|d| d.steps.push(step.clone()));
    ok(StatusCode::CREATED, step)
}

async fn update_step(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| {
            find_index(&d.steps, &id).map(|i| {
                merge(&mut d.steps[i], &body);
                d.steps[i].clone()
            })
        })
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Step not found")), |s| ok(StatusCode::OK, s))
}

/// Completes the step, recomputes goal progress and awards 10 points.
async fn complete_step(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let step = backend.with(|d| {
        let i = find_index(&d.steps, &id)?;
        d.steps[i]["status"] = json!("completed");
        d.steps[i]["completed_at"] = json!(TIMESTAMP);
        let step = d.steps[i].clone();
        let goal_id = step["goal_id"].clone();
        let siblings: Vec<&Value> = d.steps.iter().filter(|s| s["goal_id"] == goal_id).collect();
        let done = siblings.iter().filter(|s| s["status"] == "completed").count();
        let progress = done * 100 / siblings.len();
        if let Some(g) = d.goals.iter_mut().find(|g| g["id"] == goal_id) {
            g["progress"] = json!(progress);
        }
        Some(step)
    });
    let Some(step) = step else {
        return Err(fail(StatusCode::NOT_FOUND, "Step not found"));
    };
    backend.award(&user_id, 10, "step_complete", &id);
    ok(StatusCode::OK, step)
}

async fn delete_step(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    match backend.with(|d| find_index(&d.steps, &id).map(|i| d.steps.remove(i))) {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(fail(StatusCode::NOT_FOUND, "Step not found")),
    }
}

// =============================================================================
// LOGS
// =============================================================================

async fn list_logs(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let logs: Vec<Value> = backend.with(|d| {
        d.logs
            .iter()
            .filter(|l| l["user_id"] == *user_id || l["visibility"] == "public")
            .filter(|l| query.get("visibility").is_none_or(|v| l["visibility"] == *v))
            .filter(|l| {
                query
                    .get("tag")
                    .is_none_or(|tag| l["tags"].as_array().is_some_and(|tags| tags.iter().any(|t| t == tag)))
            })
            .cloned()
            .collect()
    });
    ok(StatusCode::OK, json!(logs))
}

/// Awards 5 points per created log.
async fn create_log(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let mut log = json!({
        "id": new_id(),
        "user_id": user_id,
        "tags": [],
        "visibility": "private",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    merge(&mut log, &body);
    backend.with(|d| d.logs.insert(0, log.clone()));
    backend.award(&user_id, 5, "log_create", log["id"].as_str().unwrap_or_default());
    ok(StatusCode::CREATED, log)
}

async fn get_log(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| find_index(&d.logs, &id).map(|i| d.logs[i].clone()))
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Log not found")), |l| ok(StatusCode::OK, l))
}

async fn delete_log(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    match backend.with(|d| find_index(&d.logs, &id).map(|i| d.logs.remove(i))) {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(fail(StatusCode::NOT_FOUND, "Log not found")),
    }
}

// =============================================================================
// EVENTS
// =============================================================================

async fn list_events(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    backend.user_id(&headers)?;
    ok(StatusCode::OK, json!(backend.with(|d| d.events.clone())))
}

async fn create_event(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let mut event = json!({
        "id": new_id(),
        "owner_id": user_id,
        "tags": [],
        "status": "upcoming",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    merge(&mut event, &body);
    backend.with(|d| d.events.insert(0, event.clone()));
    ok(StatusCode::CREATED, event)
}

async fn get_event(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| find_index(&d.events, &id).map(|i| d.events[i].clone()))
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Event not found")), |e| ok(StatusCode::OK, e))
}

async fn delete_event(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    match backend.with(|d| find_index(&d.events, &id).map(|i| d.events.remove(i))) {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(fail(StatusCode::NOT_FOUND, "Event not found")),
    }
}

fn joined_index(d: &Data, event_id: &str, user_id: &str) -> Option<usize> {
    d.participants
        .iter()
        .position(|p| p["event_id"] == event_id && p["user_id"] == user_id && p["status"] == "joined")
}

async fn join_event(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    if backend.with(|d| find_index(&d.events, &id).is_none()) {
        return Err(fail(StatusCode::NOT_FOUND, "Event not found"));
    }
    if backend.with(|d| joined_index(d, &id, &user_id).is_some()) {
        return Err(fail(StatusCode::BAD_REQUEST, "Already joined this event"));
    }
    let participant = json!({
        "id": new_id(),
        "event_id": id,
        "user_id": user_id,
        "status": "joined",
        "joined_at": TIMESTAMP,
    });
    backend.with(|d| d.participants.push(participant));
    backend.award(&user_id, 10, "event_join", &id);
    ok(StatusCode::OK, json!({ "status": "joined", "event_id": id }))
}

async fn leave_event(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let left = backend.with(|d| {
        joined_index(d, &id, &user_id).map(|i| d.participants[i]["status"] = json!("cancelled"))
    });
    match left {
        Some(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Err(fail(StatusCode::NOT_FOUND, "Participation not found")),
    }
}

/// Mirrors the backend listing, which omits `event_id`.
async fn event_participants(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    let listed: Vec<Value> = backend.with(|d| {
        d.participants
            .iter()
            .filter(|p| p["event_id"] == id && p["status"] == "joined")
            .map(|p| json!({ "id": p["id"], "user_id": p["user_id"], "status": p["status"], "joined_at": p["joined_at"] }))
            .collect()
    });
    ok(StatusCode::OK, json!(listed))
}

// =============================================================================
// PROJECTS
// =============================================================================

async fn list_projects(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    backend.user_id(&headers)?;
    ok(StatusCode::OK, json!(backend.with(|d| d.projects.clone())))
}

async fn create_project(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let mut project = json!({
        "id": new_id(),
        "owner_id": user_id,
        "status": "recruiting",
        "required_skills": [],
        "tags": [],
        "visibility": "public",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    merge(&mut project, &body);
    backend.with(|d| d.projects.insert(0, project.clone()));
    ok(StatusCode::CREATED, project)
}

async fn get_project(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    backend.user_id(&headers)?;
    backend
        .with(|d| find_index(&d.projects, &id).map(|i| d.projects[i].clone()))
        .map_or_else(|| Err(fail(StatusCode::NOT_FOUND, "Project not found")), |p| ok(StatusCode::OK, p))
}

async fn join_project(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    if backend.with(|d| find_index(&d.projects, &id).is_none()) {
        return Err(fail(StatusCode::NOT_FOUND, "Project not found"));
    }
    let already = backend.with(|d| d.members.iter().any(|m| m["project_id"] == id && m["user_id"] == *user_id));
    if already {
        return Err(fail(StatusCode::BAD_REQUEST, "Already member of this project"));
    }
    backend.with(|d| d.members.push(json!({ "project_id": id, "user_id": user_id, "status": "pending" })));
    ok(StatusCode::OK, json!({ "status": "pending", "project_id": id }))
}

// =============================================================================
// POINTS AND PROFILE
// =============================================================================

async fn points_summary(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let total: i64 = backend.with(|d| {
        d.points
            .iter()
            .filter(|p| p["user_id"] == *user_id)
            .filter_map(|p| p["amount"].as_i64())
            .sum()
    });
    ok(StatusCode::OK, json!({ "user_id": user_id, "total_points": total }))
}

async fn points_history(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let history: Vec<Value> =
        backend.with(|d| d.points.iter().filter(|p| p["user_id"] == *user_id).cloned().collect());
    ok(StatusCode::OK, json!(history))
}

fn default_profile(user_id: &str) -> Value {
    json!({
        "id": format!("profile-{user_id}"),
        "user_id": user_id,
        "skills": [],
        "interests": [],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

async fn my_profile(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let profile = backend.with(|d| d.profiles.entry(user_id.clone()).or_insert_with(|| default_profile(&user_id)).clone());
    ok(StatusCode::OK, profile)
}

async fn update_profile(State(backend): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let user_id = backend.user_id(&headers)?;
    let profile = backend.with(|d| {
        let entry = d.profiles.entry(user_id.clone()).or_insert_with(|| default_profile(&user_id));
        merge(entry, &body);
        entry.clone()
    });
    ok(StatusCode::OK, profile)
}
