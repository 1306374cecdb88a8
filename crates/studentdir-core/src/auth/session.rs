use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Identity, User};
use crate::models::validate_email;

/// Session file name in data directory
const SESSION_FILE: &str = "session.json";

/// Session lifetime in hours.
const SESSION_EXPIRY_HOURS: i64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(user: User) -> Self {
        Self {
            user,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::hours(SESSION_EXPIRY_HOURS);
        Utc::now() > expiry
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        let expiry = self.created_at + Duration::hours(SESSION_EXPIRY_HOURS);
        (expiry - Utc::now()).num_minutes().max(0)
    }
}

pub struct Session {
    data_dir: PathBuf,
    data: Option<SessionData>,
    loaded: bool,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
            loaded: false,
        }
    }

    /// Load session from disk. Returns whether a valid session was found.
    pub fn load(&mut self) -> Result<bool> {
        self.loaded = true;
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
            debug!("Stored session expired");
        }
        Ok(false)
    }

    /// Sign in as `email` and persist the session.
    pub fn login(&mut self, email: &str) -> Result<&User> {
        validate_email(email)?;
        self.loaded = true;
        let data = SessionData::new(User {
            email: email.to_string(),
        });
        self.data = Some(data);
        self.save()?;
        Ok(&self.data.as_ref().context("session was just set")?.user)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

impl Identity for Session {
    fn current_user(&self) -> Option<&User> {
        self.data
            .as_ref()
            .filter(|d| !d.is_expired())
            .map(|d| &d.user)
    }

    fn is_loading(&self) -> bool {
        !self.loaded
    }
}
