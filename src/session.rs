//! Persistent session (cookie) store.
//!
//! The store is handed to `reqwest` as its cookie provider. Whenever a response
//! sets cookies the store writes itself back to disk, so a session obtained by
//! one invocation is reused by the next one. Writes go to a temporary file in
//! the same directory which is then renamed over the session file, so a crash
//! never leaves a half-written session behind.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use cookie_store::CookieStore;
use reqwest::cookie::CookieStore as _;
use reqwest::header::HeaderValue;
use reqwest_cookie_store::CookieStoreMutex;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path:?}: {cause}")]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
    #[error("failed to (de)serialize session file {path:?}: {cause}")]
    Serialization {
        path: PathBuf,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("session store lock was poisoned")]
    Poisoned,
}

pub struct SessionStore {
    path: PathBuf,
    cookies: CookieStoreMutex,
}

impl SessionStore {
    /// Load the session stored at `path`. A missing or empty file yields an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let cookies = match fs::metadata(&path) {
            Ok(metadata) if metadata.len() > 0 => {
                debug!("Loading session from {:?}", path);
                let file = File::open(&path).map_err(|cause| SessionError::Io {
                    path: path.clone(),
                    cause,
                })?;
                cookie_store::serde::json::load_all(BufReader::new(file)).map_err(|cause| {
                    SessionError::Serialization {
                        path: path.clone(),
                        cause,
                    }
                })?
            }
            Ok(_) => CookieStore::default(),
            Err(cause) if cause.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session found at {:?}, starting with an empty one", path);
                CookieStore::default()
            }
            Err(cause) => return Err(SessionError::Io { path, cause }),
        };

        Ok(Self {
            path,
            cookies: CookieStoreMutex::new(cookies),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of unexpired cookies currently held
    pub fn len(&self) -> Result<usize, SessionError> {
        let store = self.cookies.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(store.iter_unexpired().count())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }

    /// Forget every cookie and persist the empty session
    pub fn clear(&self) -> Result<(), SessionError> {
        {
            let mut store = self.cookies.lock().map_err(|_| SessionError::Poisoned)?;
            store.clear();
        }
        self.save()
    }

    /// Atomically write the session to its file
    pub fn save(&self) -> Result<(), SessionError> {
        let io_error = |cause: std::io::Error| SessionError::Io {
            path: self.path.clone(),
            cause,
        };

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&directory).map_err(io_error)?;

        let mut file = NamedTempFile::new_in(&directory).map_err(io_error)?;
        {
            let store = self.cookies.lock().map_err(|_| SessionError::Poisoned)?;
            cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut file)
                .map_err(|cause| SessionError::Serialization {
                    path: self.path.clone(),
                    cause,
                })?;
        }
        file.flush().map_err(io_error)?;
        file.persist(&self.path)
            .map_err(|persist_error| io_error(persist_error.error))?;

        trace!("Session saved to {:?}", self.path);
        Ok(())
    }
}

impl reqwest::cookie::CookieStore for SessionStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        if headers.is_empty() {
            return;
        }

        self.cookies.set_cookies(&mut headers.into_iter(), url);
        if let Err(e) = self.save() {
            warn!("Failed to persist session: {}", e);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.cookies.cookies(url)
    }
}
