use async_graphql::{Enum, InputObject, SimpleObject};

use crate::error::DomainError;

// --- Core Application Schemas (Mapped to the Backing Store) ---

/// Role
///
/// The account role chosen at registration. Carried on the account record and
/// exposed through the profile queries; it does not currently gate any
/// operation beyond being stored.
///
/// Rendered with PascalCase literals (`Host`, `Listener`) on the wire, matching
/// the enum spelling clients send in mutation documents.
#[derive(Debug, Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(rename_items = "PascalCase")]
pub enum Role {
    Listener,
    Host,
}

/// Account
///
/// The canonical identity record held by the identity store. The password hash
/// is deliberately skipped from the GraphQL schema; it never leaves the
/// process.
#[derive(Debug, Clone, SimpleObject)]
pub struct Account {
    pub id: i64,
    // Unique across all accounts; uniqueness enforced at creation and on edit.
    pub email: String,
    #[graphql(skip)]
    pub password_hash: String,
    pub role: Role,
}

/// Podcast
///
/// A podcast and the episodes it owns. Episodes exist only inside their parent
/// podcast (composition): deleting the podcast removes them in the same
/// structural operation.
#[derive(Debug, Clone, SimpleObject)]
pub struct Podcast {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub episodes: Vec<Episode>,
}

/// Episode
///
/// A single episode. Its id is unique within the parent podcast only; episodes
/// are always addressed by the `(podcastId, episodeId)` pair.
#[derive(Debug, Clone, SimpleObject)]
pub struct Episode {
    pub id: i64,
    pub title: String,
    pub category: String,
}

// --- Input Schemas ---

#[derive(Debug, InputObject)]
pub struct CreateAccountInput {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// EditProfileInput
///
/// Partial profile update: only supplied fields change. A new password is
/// re-hashed before it reaches the store; a new email is re-checked for
/// uniqueness.
#[derive(Debug, InputObject)]
pub struct EditProfileInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct CreatePodcastInput {
    pub title: String,
    pub category: String,
}

/// PodcastSearchInput
///
/// Shared input for every operation addressing a podcast by id
/// (`getPodcast`, `deletePodcast`, `getEpisodes`).
#[derive(Debug, InputObject)]
pub struct PodcastSearchInput {
    pub id: i64,
}

#[derive(Debug, InputObject)]
pub struct UpdatePodcastInput {
    pub id: i64,
    pub payload: UpdatePodcastPayload,
}

#[derive(Debug, InputObject)]
pub struct UpdatePodcastPayload {
    pub title: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct CreateEpisodeInput {
    pub podcast_id: i64,
    pub title: String,
    pub category: String,
}

#[derive(Debug, InputObject)]
pub struct UpdateEpisodeInput {
    pub podcast_id: i64,
    pub episode_id: i64,
    pub title: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct EpisodeSearchInput {
    pub podcast_id: i64,
    pub episode_id: i64,
}

// --- Output Envelopes ---
//
// Every domain operation resolves to `{ok, error, ...payload}`. Domain failures
// are data: the transport response stays a normal 200 and the failure lands in
// `error` as its stable message string. Only a missing identity escapes the
// envelope (see `auth::AuthGuard`).

/// CoreOutput
///
/// The bare envelope used by mutations with no payload beyond success/failure
/// (updates and deletes).
#[derive(Debug, SimpleObject)]
pub struct CoreOutput {
    pub ok: bool,
    pub error: Option<String>,
}

// Constructor names deliberately avoid the field names: the SimpleObject
// derive already generates an inherent `ok` resolver for the `ok` field.
impl CoreOutput {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: DomainError) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<(), DomainError>> for CoreOutput {
    fn from(result: Result<(), DomainError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e),
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct CreateAccountOutput {
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct LoginOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct SeeProfileOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub user: Option<Account>,
}

#[derive(Debug, SimpleObject)]
pub struct GetAllPodcastsOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub podcasts: Option<Vec<Podcast>>,
}

#[derive(Debug, SimpleObject)]
pub struct PodcastOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub podcast: Option<Podcast>,
}

#[derive(Debug, SimpleObject)]
pub struct EpisodesOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub episodes: Option<Vec<Episode>>,
}

/// CreatedOutput
///
/// Envelope for the create mutations, carrying the id assigned to the new
/// podcast or episode.
#[derive(Debug, SimpleObject)]
pub struct CreatedOutput {
    pub ok: bool,
    pub error: Option<String>,
    pub id: Option<i64>,
}

impl CreatedOutput {
    pub fn created(id: i64) -> Self {
        Self {
            ok: true,
            error: None,
            id: Some(id),
        }
    }

    pub fn failure(error: DomainError) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
            id: None,
        }
    }
}

impl From<Result<i64, DomainError>> for CreatedOutput {
    fn from(result: Result<i64, DomainError>) -> Self {
        match result {
            Ok(id) => Self::created(id),
            Err(e) => Self::failure(e),
        }
    }
}
