//! Session context
//!
//! Owns the API handle, the bearer token and the current viewer. The token
//! is persisted in a JSON file so a restarted client can pick it up again;
//! logging out always tears down local state, whatever the backend says.

use crate::api::IhomsApi;
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::routes::Route;
use crate::view::normalize::person_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::client::LoginRequest;
use shared::models::{RecordId, User};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SESSION_FILE: &str = "session.json";

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The logged-in user, as far as permission checks are concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: String,
    pub role_id: Option<String>,
    /// Lower-cased role name ("admin", "agent", ...)
    pub role_name: String,
    pub full_name: String,
    pub email: String,
}

impl Viewer {
    pub fn from_user(user: &User) -> Self {
        let role_name = user
            .role
            .as_ref()
            .and_then(|role| role.name())
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        Self {
            id: user.id.as_ref().map(RecordId::key).unwrap_or_default(),
            role_id: user.effective_role_id().map(|id| id.key()),
            role_name,
            full_name: person_name(
                user.first_name.as_deref(),
                user.last_name.as_deref(),
                user.email.as_deref(),
            ),
            email: user.email.clone().unwrap_or_default(),
        }
    }
}

/// Token file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// JSON file holding the bearer token
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // A pre-existing file keeps its old mode on open
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// `None` when the file is missing or unreadable
    pub fn load(&self) -> Option<StoredSession> {
        let json = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Authenticated session over an [`IhomsApi`]
#[derive(Debug)]
pub struct Session<C> {
    api: IhomsApi<C>,
    store: Option<SessionStore>,
    viewer: Option<Viewer>,
}

impl<C: HttpClient> Session<C> {
    /// In-memory session; nothing is persisted
    pub fn new(client: C) -> Self {
        Self {
            api: IhomsApi::new(client),
            store: None,
            viewer: None,
        }
    }

    /// Session whose token survives restarts
    pub fn with_store(client: C, store: SessionStore) -> Self {
        Self {
            api: IhomsApi::new(client),
            store: Some(store),
            viewer: None,
        }
    }

    pub fn api(&self) -> &IhomsApi<C> {
        &self.api
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// A token is attached. It may still be rejected by the backend; see [`Session::check`].
    pub fn is_authenticated(&self) -> bool {
        self.api.token().is_some()
    }

    /// Re-attach a persisted token. Returns whether one was found.
    pub fn restore(&mut self) -> bool {
        let Some(stored) = self.store.as_ref().and_then(SessionStore::load) else {
            return false;
        };
        tracing::debug!(saved_at = %stored.saved_at, "Restored session token");
        self.api.set_token(Some(stored.token));
        true
    }

    /// Log in and return the route the viewer should land on
    pub async fn login(&mut self, request: &LoginRequest) -> ClientResult<Route> {
        let response = self.api.login(request).await?;
        if response.token.trim().is_empty() {
            return Err(ClientError::InvalidResponse("Missing token".into()));
        }

        if let Some(store) = &self.store
            && let Err(e) = store.save(&response.token)
        {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        self.api.set_token(Some(response.token));

        let viewer = Viewer::from_user(&response.user);
        let landing = Route::landing_for(&viewer);
        tracing::info!(user_id = %viewer.id, role = %viewer.role_name, landing = %landing, "Logged in");
        self.viewer = Some(viewer);
        Ok(landing)
    }

    /// Ask the backend who we are.
    ///
    /// 401 and 403 mean "not authenticated" and yield `Ok(None)`; other
    /// failures are returned as errors.
    pub async fn check(&mut self) -> ClientResult<Option<Viewer>> {
        if !self.is_authenticated() {
            self.viewer = None;
            return Ok(None);
        }
        match self.api.me().await {
            Ok(me) => {
                self.viewer = me.user.as_ref().map(Viewer::from_user);
                Ok(self.viewer.clone())
            }
            Err(ClientError::Unauthorized | ClientError::Forbidden(_)) => {
                tracing::info!("Session no longer accepted by backend");
                self.viewer = None;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Log out. Local state is cleared even if the backend call fails.
    pub async fn logout(&mut self) {
        if self.is_authenticated()
            && let Err(e) = self.api.logout().await
        {
            tracing::warn!(error = %e, "Backend logout failed, clearing local session anyway");
        }
        self.api.set_token(None);
        self.viewer = None;
        if let Some(store) = &self.store
            && let Err(e) = store.clear()
        {
            tracing::warn!(error = %e, "Failed to remove session file");
        }
        tracing::info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested"));
        assert!(!store.exists());
        assert!(store.load().is_none());

        store.save("tok-123").unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap().token, "tok-123");

        store.clear().unwrap();
        assert!(!store.exists());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mode = |store: &SessionStore| fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;

        store.save("tok-1").unwrap();
        assert_eq!(mode(&store), 0o600);

        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.save("tok-2").unwrap();
        assert_eq!(mode(&store), 0o600);
        assert_eq!(store.load().unwrap().token, "tok-2");
    }

    #[test]
    fn test_viewer_from_user() {
        let user: User = serde_json::from_str(
            r#"{"id": 42, "first_name": "Ana", "last_name": " Cruz ", "email": "ana@ihoms.test", "role": {"id": 2, "name": "Agent"}}"#,
        )
        .unwrap();
        let viewer = Viewer::from_user(&user);
        assert_eq!(viewer.id, "42");
        assert_eq!(viewer.role_id.as_deref(), Some("2"));
        assert_eq!(viewer.role_name, "agent");
        assert_eq!(viewer.full_name, "Ana Cruz");
    }

    #[test]
    fn test_viewer_with_string_role() {
        let user: User = serde_json::from_str(r#"{"id": "7", "role": "ADMIN", "email": "root@ihoms.test"}"#).unwrap();
        let viewer = Viewer::from_user(&user);
        assert_eq!(viewer.role_name, "admin");
        assert!(viewer.role_id.is_none());
        assert_eq!(viewer.full_name, "root@ihoms.test");
    }
}
