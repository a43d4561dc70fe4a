use async_graphql::{Context, Object};

use crate::{
    models::{
        CoreOutput, CreateEpisodeInput, CreatePodcastInput, CreatedOutput, EpisodeSearchInput,
        EpisodesOutput, GetAllPodcastsOutput, PodcastOutput, PodcastSearchInput,
        UpdateEpisodeInput, UpdatePodcastInput,
    },
    repository::RepositoryState,
};

/// PodcastQuery
///
/// Read side of the podcast/episode catalogue. Every resolver returns the
/// `{ok, error, payload}` envelope; a missing podcast or episode is a domain
/// failure inside the envelope, never a transport error.
#[derive(Default)]
pub struct PodcastQuery;

#[Object]
impl PodcastQuery {
    /// Lists every podcast. Always succeeds; an empty catalogue is an empty list.
    async fn get_all_podcasts(&self, ctx: &Context<'_>) -> GetAllPodcastsOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        GetAllPodcastsOutput {
            ok: true,
            error: None,
            podcasts: Some(repo.get_podcasts().await),
        }
    }

    async fn get_podcast(&self, ctx: &Context<'_>, input: PodcastSearchInput) -> PodcastOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        match repo.get_podcast(input.id).await {
            Ok(podcast) => PodcastOutput {
                ok: true,
                error: None,
                podcast: Some(podcast),
            },
            Err(e) => PodcastOutput {
                ok: false,
                error: Some(e.to_string()),
                podcast: None,
            },
        }
    }

    /// Lists the episodes of one podcast. An absent podcast is reported as a
    /// podcast-not-found failure, not as an empty episode list.
    async fn get_episodes(&self, ctx: &Context<'_>, input: PodcastSearchInput) -> EpisodesOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        match repo.get_episodes(input.id).await {
            Ok(episodes) => EpisodesOutput {
                ok: true,
                error: None,
                episodes: Some(episodes),
            },
            Err(e) => EpisodesOutput {
                ok: false,
                error: Some(e.to_string()),
                episodes: None,
            },
        }
    }
}

/// PodcastMutation
///
/// Write side of the catalogue. The two-stage existence checks (podcast first,
/// then episode scoped to it) live in the repository; these resolvers only
/// translate results into envelopes.
#[derive(Default)]
pub struct PodcastMutation;

#[Object]
impl PodcastMutation {
    async fn create_podcast(
        &self,
        ctx: &Context<'_>,
        input: CreatePodcastInput,
    ) -> CreatedOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        let id = repo.create_podcast(input.title, input.category).await;
        tracing::info!(podcast_id = id, "podcast created");
        CreatedOutput::created(id)
    }

    /// Merges only the supplied payload fields into an existing podcast.
    async fn update_podcast(&self, ctx: &Context<'_>, input: UpdatePodcastInput) -> CoreOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        repo.update_podcast(input.id, input.payload.title, input.payload.category)
            .await
            .into()
    }

    /// Deletes a podcast together with all of its episodes.
    async fn delete_podcast(&self, ctx: &Context<'_>, input: PodcastSearchInput) -> CoreOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        repo.delete_podcast(input.id).await.into()
    }

    async fn create_episode(
        &self,
        ctx: &Context<'_>,
        input: CreateEpisodeInput,
    ) -> CreatedOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        repo.create_episode(input.podcast_id, input.title, input.category)
            .await
            .into()
    }

    async fn update_episode(&self, ctx: &Context<'_>, input: UpdateEpisodeInput) -> CoreOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        repo.update_episode(
            input.podcast_id,
            input.episode_id,
            input.title,
            input.category,
        )
        .await
        .into()
    }

    async fn delete_episode(&self, ctx: &Context<'_>, input: EpisodeSearchInput) -> CoreOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        repo.delete_episode(input.podcast_id, input.episode_id)
            .await
            .into()
    }
}
