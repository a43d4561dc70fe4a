use thiserror::Error;

/// DomainError
///
/// The closed set of expected, recoverable failures a domain operation can
/// produce. These are returned to clients as data inside the response envelope
/// (`ok: false`, `error: <message>`), never as transport-level faults.
///
/// The `Display` strings are part of the wire contract: clients match on them
/// literally, so the interpolation format (decimal ids, exact casing) must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Podcast with id {0} not found")]
    PodcastNotFound(i64),

    /// Reported only when the parent podcast exists. When the podcast itself is
    /// absent, `PodcastNotFound` takes precedence so callers can tell the two
    /// corrective actions apart.
    #[error("Episode with id {episode_id} not found in podcast with id {podcast_id}")]
    EpisodeNotFound { podcast_id: i64, episode_id: i64 },

    #[error("User Not Found")]
    UserNotFound,

    #[error("There is a user with that email already")]
    DuplicateEmail,

    /// Deliberately identical for an unknown email and a wrong password, so a
    /// failed login does not reveal whether the email is registered.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            DomainError::PodcastNotFound(777).to_string(),
            "Podcast with id 777 not found"
        );
        assert_eq!(
            DomainError::EpisodeNotFound {
                podcast_id: 1,
                episode_id: 777
            }
            .to_string(),
            "Episode with id 777 not found in podcast with id 1"
        );
        assert_eq!(DomainError::UserNotFound.to_string(), "User Not Found");
    }
}
