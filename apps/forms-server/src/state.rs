//! Shared state and the in-memory session store
//!
//! Every browser gets a `forms_session` cookie holding a random UUID. The
//! session keeps what was typed into each form, the last PDF generated for
//! it and the messages to show on the next page view. Sessions are created
//! on the first request that has something to keep and dropped after a
//! period without writes. Nothing is persisted: restarting the server
//! forgets every session.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use form_engine::{Assets, FormDocument, FormKind};
use form_types::FieldValues;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "forms_session";

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(2 * 60 * 60);

pub type SharedState = Arc<AppState>;

/// State shared by every handler
pub struct AppState {
    pub assets: Assets,
    pub sessions: SessionStore,
    /// Largest accepted request body, uploads included
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(assets: Assets, max_upload_bytes: usize) -> Self {
        Self {
            assets,
            sessions: SessionStore::default(),
            max_upload_bytes,
        }
    }

    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.sessions = SessionStore::new(idle);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "flash success",
            FlashLevel::Warning => "flash warning",
            FlashLevel::Error => "flash error",
        }
    }
}

/// A message shown once on the next form page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// What one session holds for one form
#[derive(Debug, Clone)]
pub struct FormState {
    pub values: FieldValues,
    pub pdf: Option<Vec<u8>>,
    /// Name of the upload already applied, so a resubmitted page does not
    /// overwrite later edits with the same file again
    pub imported_file: Option<String>,
    pub flashes: Vec<Flash>,
}

impl FormState {
    /// Fresh state holding the blank form's values
    pub fn new(kind: FormKind) -> Self {
        Self {
            values: FormDocument::blank(kind).to_fields(),
            pdf: None,
            imported_file: None,
            flashes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    forms: HashMap<FormKind, FormState>,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            forms: HashMap::new(),
            last_seen: Instant::now(),
        }
    }

    pub fn form(&self, kind: FormKind) -> Option<&FormState> {
        self.forms.get(&kind)
    }

    /// The form's state, created from the blank form on first use
    pub fn form_mut(&mut self, kind: FormKind) -> &mut FormState {
        self.forms.entry(kind).or_insert_with(|| FormState::new(kind))
    }
}

/// Sessions by id, behind a single async lock
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE)
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Drop every session idle for longer than the timeout, except `keep`
    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Session>, keep: Uuid, now: Instant) {
        let before = sessions.len();
        sessions.retain(|id, session| {
            *id == keep || now.duration_since(session.last_seen) < self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Idle sessions dropped");
        }
    }

    /// Run `f` against the session, if it exists
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(Option<&Session>) -> R) -> R {
        let sessions = self.sessions.read().await;
        f(sessions.get(&id))
    }

    /// Run `f` against the session, creating it when missing
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, id, now);
        let session = sessions.entry(id).or_insert_with(|| {
            debug!(session = %id, "Session created");
            Session::new()
        });
        session.last_seen = now;
        f(session)
    }

    /// Run `f` against the session if it exists, without creating one
    pub async fn update_existing<R>(&self, id: Uuid, f: impl FnOnce(Option<&mut Session>) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, id, now);
        let session = sessions.get_mut(&id).map(|session| {
            session.last_seen = now;
            session
        });
        f(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The session id of a request, freshly minted when the cookie is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId {
    pub id: Uuid,
    pub is_new: bool,
}

impl SessionId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_session(headers) {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
        }
    }

    /// `Set-Cookie` header to send when the id was just created
    pub fn cookie(&self) -> Option<(HeaderName, HeaderValue)> {
        if !self.is_new {
            return None;
        }
        let value = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id);
        HeaderValue::from_str(&value)
            .ok()
            .map(|value| (header::SET_COOKIE, value))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionId::from_headers(&parts.headers))
    }
}

/// Find `forms_session=<uuid>` among the request cookies
fn cookie_session(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
