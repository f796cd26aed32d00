use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "auth-token";

/// Storage key holding the optional user profile.
pub const USER_INFO_KEY: &str = "user-info.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    /// Name for the navbar, falling back to the email address
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Client-held proof of authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
    /// When the session was established. Informational only; sessions do not
    /// expire locally.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Surrounding whitespace is stripped from the token.
    pub fn new(token: String, user: Option<User>) -> Self {
        Self {
            token: token.trim().to_string(),
            user,
            created_at: Utc::now(),
        }
    }

    /// The form every store persists: token trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            token: self.token.trim().to_string(),
            ..self.clone()
        }
    }

    /// A non-empty token means authenticated.
    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Persisted session storage.
///
/// Writes are last-writer-wins; one logical session exists per process.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<Session>>;
    fn set(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct UserInfoFile {
    user: Option<User>,
    created_at: DateTime<Utc>,
}

/// Session store backed by two files in a storage directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    fn user_info_path(&self) -> PathBuf {
        self.dir.join(USER_INFO_KEY)
    }

    /// Read the profile file. A missing or corrupt file only loses the
    /// profile, never the token.
    fn load_user_info(&self) -> Option<UserInfoFile> {
        let path = self.user_info_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path)
            .context("Failed to read user info file")
            .and_then(|s| serde_json::from_str(&s).context("Failed to parse user info file"))
        {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable user info");
                None
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token = token.trim().to_string();
        if token.is_empty() {
            debug!("Token file is blank");
            return Ok(None);
        }

        let (user, created_at) = match self.load_user_info() {
            Some(info) => (info.user, info.created_at),
            None => (None, Utc::now()),
        };

        Ok(Some(Session {
            token,
            user,
            created_at,
        }))
    }

    fn set(&self, session: &Session) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create storage directory {}", self.dir.display()))?;
        let session = session.normalized();

        // The token goes last: without it nothing on disk reads as signed in
        let info = UserInfoFile {
            user: session.user.clone(),
            created_at: session.created_at,
        };
        let contents = serde_json::to_string_pretty(&info)?;
        std::fs::write(self.user_info_path(), contents).context("Failed to write user info file")?;
        std::fs::write(self.token_path(), &session.token).context("Failed to write token file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for path in [self.token_path(), self.user_info_path()] {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// In-process session store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>> {
        self.slot
            .lock()
            .map_err(|_| anyhow::anyhow!("Session store lock poisoned"))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Session>> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, session: &Session) -> Result<()> {
        *self.lock()? = Some(session.normalized());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
