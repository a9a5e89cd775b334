//! Session and user identity.
//!
//! The session id is generated once per process and never persisted. The
//! user id is generated on first use and stored in a small TOML file under
//! the data directory, then reused by every later session.

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fs::atomic_write;
use crate::paths;

const STATE_FILE: &str = "state.toml";
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// `session_<millis>_<suffix>`. Collisions are improbable, not impossible.
pub fn generate_session_id() -> String {
    format!("session_{}_{}", unix_millis(), random_suffix())
}

/// `anon_<millis>_<suffix>`.
pub fn generate_user_id() -> String {
    format!("anon_{}_{}", unix_millis(), random_suffix())
}

/// Persisted client-local state. Holds exactly one entry.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalState {
    chat_user_id: Option<String>,
}

/// Reads and creates the persisted user id.
#[derive(Debug, Clone)]
pub struct UserIdStore {
    path: PathBuf,
}

impl UserIdStore {
    /// Store at `$XDG_DATA_HOME/parley/state.toml`.
    pub fn new() -> Result<Self> {
        Ok(Self::at(paths::data_dir()?.join(STATE_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored user id, if any.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let state: LocalState = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(state.chat_user_id.filter(|id| !id.is_empty()))
    }

    /// Returns the stored user id, generating and writing one if absent.
    ///
    /// An existing id is never rewritten.
    pub fn load_or_create(&self) -> Result<String> {
        if let Some(user_id) = self.load()? {
            return Ok(user_id);
        }

        let user_id = generate_user_id();
        let state = LocalState {
            chat_user_id: Some(user_id.clone()),
        };
        let contents = toml::to_string(&state).context("Failed to serialize state")?;
        atomic_write(&self.path, &contents)?;

        tracing::debug!(path = %self.path.display(), "created user id");
        Ok(user_id)
    }
}

/// The identity pair sent with every chat request.
///
/// Both ids are fixed for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    session_id: String,
    user_id: String,
}

impl SessionIdentity {
    pub const fn new(session_id: String, user_id: String) -> Self {
        Self {
            session_id,
            user_id,
        }
    }

    /// Fresh session id plus the persisted (or newly created) user id.
    pub fn initialize(store: &UserIdStore) -> Result<Self> {
        Ok(Self::new(generate_session_id(), store.load_or_create()?))
    }

    /// Identity whose user id lives only as long as this process.
    pub fn ephemeral() -> Self {
        Self::new(generate_session_id(), generate_user_id())
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn assert_id_shape(id: &str, prefix: &str) {
        let rest = id.strip_prefix(prefix).unwrap();
        let (millis, suffix) = rest.split_once('_').unwrap();
        assert!(millis.parse::<u64>().is_ok(), "bad millis in {id}");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_session_id_shape() {
        assert_id_shape(&generate_session_id(), "session_");
    }

    #[test]
    fn test_user_id_shape() {
        assert_id_shape(&generate_user_id(), "anon_");
    }

    #[test]
    fn test_session_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserIdStore::at(temp_dir.path().join("state.toml"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_or_create_persists_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserIdStore::at(temp_dir.path().join("nested").join("state.toml"));

        let first = store.load_or_create().unwrap();
        let second = store.load_or_create().unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load().unwrap(), Some(first));
    }

    #[test]
    fn test_existing_user_id_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "chat_user_id = \"anon_1_abcdefghi\"\n").unwrap();

        let store = UserIdStore::at(&path);
        assert_eq!(store.load_or_create().unwrap(), "anon_1_abcdefghi");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "chat_user_id = \"anon_1_abcdefghi\"\n"
        );
    }

    #[test]
    fn test_corrupt_state_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "chat_user_id = [").unwrap();

        let result = UserIdStore::at(&path).load_or_create();
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_identity_initialize_reuses_user_but_not_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserIdStore::at(temp_dir.path().join("state.toml"));

        let a = SessionIdentity::initialize(&store).unwrap();
        let b = SessionIdentity::initialize(&store).unwrap();

        assert_eq!(a.user_id(), b.user_id());
        assert_ne!(a.session_id(), b.session_id());
    }
}
