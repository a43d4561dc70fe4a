//! Resolver Module Index
//!
//! Organizes the GraphQL surface into domain-segregated resolver objects,
//! merged into one Query root and one Mutation root. Identity requirements are
//! applied explicitly per field (via `AuthGuard`), never implicitly by module.

use async_graphql::MergedObject;

/// Account registration, login, and profile resolvers.
pub mod users;

/// Podcast and episode catalogue resolvers.
pub mod podcasts;

use podcasts::{PodcastMutation, PodcastQuery};
use users::{UserMutation, UserQuery};

/// The merged Query root exposed by the schema.
#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQuery, PodcastQuery);

/// The merged Mutation root exposed by the schema.
#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutation, PodcastMutation);
