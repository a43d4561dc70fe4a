use crate::error::DomainError;
use crate::models::{Account, Episode, Podcast, Role};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, covering both
/// the identity store (accounts) and the resource stores (podcasts, episodes).
/// Resolvers interact with the data layer exclusively through this trait, so
/// the concrete backing store can be swapped without touching the API surface.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across the async task boundaries
/// of the HTTP server.
///
/// Existence checks live here, next to the data: every method that addresses a
/// podcast validates the podcast first, and the episode methods validate the
/// episode second, scoped to that podcast. The error a caller receives
/// therefore always names the outermost missing entity.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Identity Store ---

    /// Persists a new account. Fails with `DuplicateEmail` when the email is
    /// already registered; the uniqueness check and the insert are atomic.
    async fn create_account(
        &self,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<i64, DomainError>;

    async fn find_account_by_email(&self, email: &str) -> Option<Account>;

    async fn get_account(&self, id: i64) -> Option<Account>;

    /// Partial profile update: only supplied fields change. A changed email is
    /// re-validated for uniqueness against every *other* account.
    async fn update_account(
        &self,
        id: i64,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> Result<(), DomainError>;

    // --- Podcast Store ---

    /// Lists every podcast. Always succeeds; an empty store yields an empty list.
    async fn get_podcasts(&self) -> Vec<Podcast>;

    async fn create_podcast(&self, title: String, category: String) -> i64;

    async fn get_podcast(&self, id: i64) -> Result<Podcast, DomainError>;

    async fn update_podcast(
        &self,
        id: i64,
        title: Option<String>,
        category: Option<String>,
    ) -> Result<(), DomainError>;

    /// Deletes a podcast and all of its episodes as a single atomic removal.
    async fn delete_podcast(&self, id: i64) -> Result<(), DomainError>;

    // --- Episode Store ---

    /// Lists the episodes of a podcast. An absent podcast is reported as
    /// `PodcastNotFound`, never as an empty list.
    async fn get_episodes(&self, podcast_id: i64) -> Result<Vec<Episode>, DomainError>;

    async fn create_episode(
        &self,
        podcast_id: i64,
        title: String,
        category: String,
    ) -> Result<i64, DomainError>;

    async fn update_episode(
        &self,
        podcast_id: i64,
        episode_id: i64,
        title: Option<String>,
        category: Option<String>,
    ) -> Result<(), DomainError>;

    async fn delete_episode(&self, podcast_id: i64, episode_id: i64) -> Result<(), DomainError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// --- In-Memory Implementation ---

/// PodcastRecord
///
/// Internal storage shape for a podcast: the episodes live *inside* the record
/// as a sub-collection keyed by episode id. Removing the record removes the
/// episodes in the same operation, which is what makes the cascade delete
/// atomic for concurrent readers.
#[derive(Debug, Clone)]
struct PodcastRecord {
    title: String,
    category: String,
    episodes: BTreeMap<i64, Episode>,
    next_episode_id: i64,
}

/// Store
///
/// The single shared mutable resource. All reads and writes go through one
/// `RwLock`, so each repository method is observed as one atomic unit.
#[derive(Debug, Default)]
struct Store {
    accounts: BTreeMap<i64, Account>,
    next_account_id: i64,
    podcasts: BTreeMap<i64, PodcastRecord>,
    next_podcast_id: i64,
}

impl Store {
    // Ids are sequential decimal integers starting at 1; they appear literally
    // in the not-found error messages.
    fn allocate_account_id(&mut self) -> i64 {
        self.next_account_id += 1;
        self.next_account_id
    }

    fn allocate_podcast_id(&mut self) -> i64 {
        self.next_podcast_id += 1;
        self.next_podcast_id
    }
}

/// MemoryRepository
///
/// The concrete implementation of the `Repository` trait, backed by an
/// in-memory arena. Podcasts own their episodes structurally (see
/// `PodcastRecord`), and account email uniqueness is checked under the same
/// write lock that performs the insert.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_account(
        &self,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<i64, DomainError> {
        let mut store = self.store.write().await;
        if store.accounts.values().any(|a| a.email == email) {
            return Err(DomainError::DuplicateEmail);
        }
        let id = store.allocate_account_id();
        store.accounts.insert(
            id,
            Account {
                id,
                email,
                password_hash,
                role,
            },
        );
        Ok(id)
    }

    async fn find_account_by_email(&self, email: &str) -> Option<Account> {
        let store = self.store.read().await;
        store.accounts.values().find(|a| a.email == email).cloned()
    }

    async fn get_account(&self, id: i64) -> Option<Account> {
        let store = self.store.read().await;
        store.accounts.get(&id).cloned()
    }

    async fn update_account(
        &self,
        id: i64,
        email: Option<String>,
        password_hash: Option<String>,
    ) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if !store.accounts.contains_key(&id) {
            return Err(DomainError::UserNotFound);
        }
        // Re-validate uniqueness before touching the record; the account's own
        // current email is not a conflict.
        if let Some(new_email) = &email {
            if store
                .accounts
                .values()
                .any(|a| a.id != id && a.email == *new_email)
            {
                return Err(DomainError::DuplicateEmail);
            }
        }
        let account = store
            .accounts
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound)?;
        if let Some(new_email) = email {
            account.email = new_email;
        }
        if let Some(new_hash) = password_hash {
            account.password_hash = new_hash;
        }
        Ok(())
    }

    async fn get_podcasts(&self) -> Vec<Podcast> {
        let store = self.store.read().await;
        store
            .podcasts
            .iter()
            .map(|(id, record)| assemble_podcast(*id, record))
            .collect()
    }

    async fn create_podcast(&self, title: String, category: String) -> i64 {
        let mut store = self.store.write().await;
        let id = store.allocate_podcast_id();
        store.podcasts.insert(
            id,
            PodcastRecord {
                title,
                category,
                episodes: BTreeMap::new(),
                next_episode_id: 0,
            },
        );
        id
    }

    async fn get_podcast(&self, id: i64) -> Result<Podcast, DomainError> {
        let store = self.store.read().await;
        store
            .podcasts
            .get(&id)
            .map(|record| assemble_podcast(id, record))
            .ok_or(DomainError::PodcastNotFound(id))
    }

    async fn update_podcast(
        &self,
        id: i64,
        title: Option<String>,
        category: Option<String>,
    ) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let record = store
            .podcasts
            .get_mut(&id)
            .ok_or(DomainError::PodcastNotFound(id))?;
        if let Some(title) = title {
            record.title = title;
        }
        if let Some(category) = category {
            record.category = category;
        }
        Ok(())
    }

    async fn delete_podcast(&self, id: i64) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        // One structural removal takes the podcast and every owned episode out
        // together; no reader can observe a partially-deleted state.
        store
            .podcasts
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::PodcastNotFound(id))
    }

    async fn get_episodes(&self, podcast_id: i64) -> Result<Vec<Episode>, DomainError> {
        let store = self.store.read().await;
        store
            .podcasts
            .get(&podcast_id)
            .map(|record| record.episodes.values().cloned().collect())
            .ok_or(DomainError::PodcastNotFound(podcast_id))
    }

    async fn create_episode(
        &self,
        podcast_id: i64,
        title: String,
        category: String,
    ) -> Result<i64, DomainError> {
        let mut store = self.store.write().await;
        let record = store
            .podcasts
            .get_mut(&podcast_id)
            .ok_or(DomainError::PodcastNotFound(podcast_id))?;
        record.next_episode_id += 1;
        let id = record.next_episode_id;
        record.episodes.insert(
            id,
            Episode {
                id,
                title,
                category,
            },
        );
        Ok(id)
    }

    async fn update_episode(
        &self,
        podcast_id: i64,
        episode_id: i64,
        title: Option<String>,
        category: Option<String>,
    ) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        // Two-stage check, in order: podcast existence first, then the episode
        // scoped to that podcast.
        let record = store
            .podcasts
            .get_mut(&podcast_id)
            .ok_or(DomainError::PodcastNotFound(podcast_id))?;
        let episode = record
            .episodes
            .get_mut(&episode_id)
            .ok_or(DomainError::EpisodeNotFound {
                podcast_id,
                episode_id,
            })?;
        if let Some(title) = title {
            episode.title = title;
        }
        if let Some(category) = category {
            episode.category = category;
        }
        Ok(())
    }

    async fn delete_episode(&self, podcast_id: i64, episode_id: i64) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let record = store
            .podcasts
            .get_mut(&podcast_id)
            .ok_or(DomainError::PodcastNotFound(podcast_id))?;
        record
            .episodes
            .remove(&episode_id)
            .map(|_| ())
            .ok_or(DomainError::EpisodeNotFound {
                podcast_id,
                episode_id,
            })
    }
}

/// Builds the externally visible `Podcast` view from a storage record.
fn assemble_podcast(id: i64, record: &PodcastRecord) -> Podcast {
    Podcast {
        id,
        title: record.title.clone(),
        category: record.category.clone(),
        episodes: record.episodes.values().cloned().collect(),
    }
}
