//! The signed-in agency's profile, mirrored into a local `myAgency` cache.
//!
//! Every successful fetch overwrites the cache; a failed fetch removes it so a
//! stale profile is never shown as current.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use busdesk_core::{AgencyDraft, AgencyProfile, CompletionStatus};
use busdesk_wizard::projector::is_publishable;
use busdesk_wizard::CompletionProjection;
use chrono::Utc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::CachedProfile;

pub const CACHE_KEY: &str = "myAgency";

/// Persistent slot for the agency profile snapshot.
pub trait ProfileCache: Send + Sync {
    /// Returns the cached snapshot, or `None` when absent or unreadable.
    fn load(&self) -> Option<CachedProfile>;

    /// # Errors
    ///
    /// Returns [`ApiError::Cache`] if the snapshot cannot be written.
    fn save(&self, profile: &CachedProfile) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns [`ApiError::Cache`] if an existing entry cannot be removed.
    fn clear(&self) -> Result<(), ApiError>;
}

/// `<dir>/myAgency.json`, replaced atomically via a temp file and rename.
#[derive(Debug, Clone)]
pub struct FileProfileCache {
    dir: PathBuf,
}

impl FileProfileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{CACHE_KEY}.json"))
    }
}

fn cache_err(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Cache {
        path: path.display().to_string(),
        source,
    }
}

impl ProfileCache for FileProfileCache {
    fn load(&self) -> Option<CachedProfile> {
        let path = self.path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "profile cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "profile cache corrupt; ignoring");
                None
            }
        }
    }

    fn save(&self, profile: &CachedProfile) -> Result<(), ApiError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| cache_err(&self.dir, e))?;
        let path = self.path();
        let tmp = self.dir.join(format!("{CACHE_KEY}.json.tmp"));
        let body = serde_json::to_vec_pretty(profile).map_err(|e| ApiError::Encode {
            context: CACHE_KEY.to_string(),
            source: e,
        })?;
        std::fs::write(&tmp, body).map_err(|e| cache_err(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| cache_err(&path, e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let path = self.path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(cache_err(&path, e)),
        }
    }
}

/// In-process cache for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryProfileCache {
    slot: Mutex<Option<CachedProfile>>,
}

impl MemoryProfileCache {
    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<CachedProfile>) -> T) -> T {
        match self.slot.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl ProfileCache for MemoryProfileCache {
    fn load(&self) -> Option<CachedProfile> {
        self.with_slot(|slot| slot.clone())
    }

    fn save(&self, profile: &CachedProfile) -> Result<(), ApiError> {
        self.with_slot(|slot| *slot = Some(profile.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.with_slot(|slot| *slot = None);
        Ok(())
    }
}

/// Holds the current agency profile and its completion flags.
#[derive(Debug)]
pub struct AgencyProfileStore<C: ProfileCache> {
    cache: C,
    profile: Option<AgencyProfile>,
    status: CompletionStatus,
    server_publishable: bool,
}

impl<C: ProfileCache> AgencyProfileStore<C> {
    /// Builds the store and seeds it from the cache, if present.
    pub fn mount(cache: C) -> Self {
        let profile = cache.load().map(|cached| cached.agency);
        if let Some(p) = &profile {
            tracing::debug!(agency_id = %p.id, "profile restored from cache");
        }
        Self {
            cache,
            profile,
            status: CompletionStatus::default(),
            server_publishable: false,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&AgencyProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> &CompletionStatus {
        &self.status
    }

    /// The server's own `isPublishable` flag from the last fetch.
    #[must_use]
    pub fn server_publishable(&self) -> bool {
        self.server_publishable
    }

    #[must_use]
    pub fn projection(&self) -> CompletionProjection {
        CompletionProjection::from_status(&self.status)
    }

    /// Draft pre-filled from the current profile, for editing.
    #[must_use]
    pub fn draft(&self) -> Option<AgencyDraft> {
        self.profile.as_ref().map(AgencyDraft::from)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetches `/agency/me`, mirroring the result into the cache.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after clearing the in-memory profile and the
    /// cache entry (a cache removal failure is only logged), or
    /// [`ApiError::Cache`] if a fresh snapshot cannot be written.
    pub async fn refresh(&mut self, client: &ApiClient) -> Result<&AgencyProfile, ApiError> {
        let me = match client.get_my_agency().await {
            Ok(me) => me,
            Err(err) => {
                tracing::warn!(error = %err, "agency fetch failed; clearing cached profile");
                if let Err(cache_err) = self.unset() {
                    tracing::warn!(error = %cache_err, "cached profile could not be removed");
                }
                return Err(err);
            }
        };

        if me.is_publishable != is_publishable(&me.completion_steps) {
            tracing::warn!(
                server = me.is_publishable,
                "server publishable flag disagrees with completion steps"
            );
        }

        self.cache.save(&CachedProfile {
            agency: me.agency.clone(),
            fetched_at: Utc::now(),
        })?;
        self.status = me.completion_steps;
        self.server_publishable = me.is_publishable;
        Ok(&*self.profile.insert(me.agency))
    }

    /// Forget the profile in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Cache`] if the cache entry cannot be removed.
    pub fn unset(&mut self) -> Result<(), ApiError> {
        self.profile = None;
        self.status = CompletionStatus::default();
        self.server_publishable = false;
        self.cache.clear()
    }
}
