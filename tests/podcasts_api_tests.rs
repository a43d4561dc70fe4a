use podcast_api::{AppConfig, AppState, MemoryRepository, RepositoryState, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

/// Spawns the full application on an ephemeral port with a fresh in-memory
/// store, so every test runs against its own isolated catalogue.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    let state = AppState::new(repo, AppConfig::default());
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

async fn graphql(app: &TestApp, query: &str) -> Value {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/graphql", app.address))
        .json(&json!({ "query": query }))
        .send()
        .await
        .expect("graphql request failed");
    assert_eq!(response.status(), 200);
    response.json().await.expect("invalid json body")
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_get_all_podcasts_starts_empty() {
    let app = spawn_app().await;
    let body = graphql(&app, "query { getAllPodcasts { ok error podcasts { id } } }").await;
    let out = &body["data"]["getAllPodcasts"];
    assert_eq!(out["ok"], true);
    assert_eq!(out["error"], Value::Null);
    assert_eq!(out["podcasts"], json!([]));
}

#[tokio::test]
async fn test_create_and_get_podcast() {
    let app = spawn_app().await;

    let body = graphql(
        &app,
        r#"mutation { createPodcast(input: {title: "test podcast", category: "test"}) { ok error id } }"#,
    )
    .await;
    let out = &body["data"]["createPodcast"];
    assert_eq!(out["ok"], true);
    assert_eq!(out["error"], Value::Null);
    assert_eq!(out["id"], 1);

    let body = graphql(
        &app,
        "query { getPodcast(input: {id: 1}) { ok error podcast { id title category } } }",
    )
    .await;
    let out = &body["data"]["getPodcast"];
    assert_eq!(out["ok"], true);
    assert_eq!(out["error"], Value::Null);
    assert_eq!(out["podcast"]["id"], 1);
    assert_eq!(out["podcast"]["title"], "test podcast");
    assert_eq!(out["podcast"]["category"], "test");
}

#[tokio::test]
async fn test_get_podcast_not_found_message() {
    let app = spawn_app().await;
    let body = graphql(
        &app,
        "query { getPodcast(input: {id: 777}) { ok error podcast { id } } }",
    )
    .await;
    let out = &body["data"]["getPodcast"];
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"], "Podcast with id 777 not found");
    assert_eq!(out["podcast"], Value::Null);
}

#[tokio::test]
async fn test_update_podcast_merges_only_supplied_fields() {
    let app = spawn_app().await;
    graphql(
        &app,
        r#"mutation { createPodcast(input: {title: "before", category: "tech"}) { ok } }"#,
    )
    .await;

    let body = graphql(
        &app,
        r#"mutation { updatePodcast(input: {id: 1, payload: {title: "after"}}) { ok error } }"#,
    )
    .await;
    assert_eq!(body["data"]["updatePodcast"]["ok"], true);
    assert_eq!(body["data"]["updatePodcast"]["error"], Value::Null);

    // The category was not supplied and must survive the update.
    let body = graphql(
        &app,
        "query { getPodcast(input: {id: 1}) { podcast { title category } } }",
    )
    .await;
    assert_eq!(body["data"]["getPodcast"]["podcast"]["title"], "after");
    assert_eq!(body["data"]["getPodcast"]["podcast"]["category"], "tech");
}

#[tokio::test]
async fn test_update_podcast_not_found() {
    let app = spawn_app().await;
    let body = graphql(
        &app,
        r#"mutation { updatePodcast(input: {id: 777, payload: {title: "x"}}) { ok error } }"#,
    )
    .await;
    let out = &body["data"]["updatePodcast"];
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"], "Podcast with id 777 not found");
}

#[tokio::test]
async fn test_delete_podcast() {
    let app = spawn_app().await;
    graphql(
        &app,
        r#"mutation { createPodcast(input: {title: "t", category: "c"}) { ok } }"#,
    )
    .await;

    let body = graphql(&app, "mutation { deletePodcast(input: {id: 1}) { ok error } }").await;
    assert_eq!(body["data"]["deletePodcast"]["ok"], true);

    let body = graphql(&app, "query { getPodcast(input: {id: 1}) { ok error } }").await;
    assert_eq!(body["data"]["getPodcast"]["ok"], false);
    assert_eq!(
        body["data"]["getPodcast"]["error"],
        "Podcast with id 1 not found"
    );
}

#[tokio::test]
async fn test_delete_podcast_not_found() {
    let app = spawn_app().await;
    let body = graphql(&app, "mutation { deletePodcast(input: {id: 777}) { ok error } }").await;
    let out = &body["data"]["deletePodcast"];
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"], "Podcast with id 777 not found");
}

// --- Episodes ---

async fn seed_podcast_with_episode(app: &TestApp) {
    graphql(
        app,
        r#"mutation { createPodcast(input: {title: "test podcast", category: "test"}) { ok } }"#,
    )
    .await;
    let body = graphql(
        app,
        r#"mutation { createEpisode(input: {podcastId: 1, title: "test episode", category: "epic"}) { ok error id } }"#,
    )
    .await;
    assert_eq!(body["data"]["createEpisode"]["ok"], true);
    assert_eq!(body["data"]["createEpisode"]["id"], 1);
}

#[tokio::test]
async fn test_create_episode_requires_existing_podcast() {
    let app = spawn_app().await;
    let body = graphql(
        &app,
        r#"mutation { createEpisode(input: {podcastId: 777, title: "t", category: "c"}) { ok error } }"#,
    )
    .await;
    let out = &body["data"]["createEpisode"];
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"], "Podcast with id 777 not found");
}

#[tokio::test]
async fn test_get_episodes() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    let body = graphql(
        &app,
        "query { getEpisodes(input: {id: 1}) { ok error episodes { id title } } }",
    )
    .await;
    let out = &body["data"]["getEpisodes"];
    assert_eq!(out["ok"], true);
    assert_eq!(out["error"], Value::Null);
    assert_eq!(out["episodes"][0]["id"], 1);
    assert_eq!(out["episodes"][0]["title"], "test episode");
}

#[tokio::test]
async fn test_get_episodes_of_missing_podcast_is_not_an_empty_list() {
    let app = spawn_app().await;
    let body = graphql(&app, "query { getEpisodes(input: {id: 777}) { ok error episodes { id } } }").await;
    let out = &body["data"]["getEpisodes"];
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"], "Podcast with id 777 not found");
    assert_eq!(out["episodes"], Value::Null);
}

#[tokio::test]
async fn test_update_episode() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    let body = graphql(
        &app,
        r#"mutation { updateEpisode(input: {podcastId: 1, episodeId: 1, title: "episode update"}) { ok error } }"#,
    )
    .await;
    assert_eq!(body["data"]["updateEpisode"]["ok"], true);
    assert_eq!(body["data"]["updateEpisode"]["error"], Value::Null);

    let body = graphql(
        &app,
        "query { getEpisodes(input: {id: 1}) { episodes { title category } } }",
    )
    .await;
    let episode = &body["data"]["getEpisodes"]["episodes"][0];
    assert_eq!(episode["title"], "episode update");
    // Category was not supplied; it must be untouched.
    assert_eq!(episode["category"], "epic");
}

#[tokio::test]
async fn test_update_episode_two_stage_errors() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    // Stage one: the podcast check takes precedence.
    let body = graphql(
        &app,
        r#"mutation { updateEpisode(input: {podcastId: 777, episodeId: 1, title: "x"}) { ok error } }"#,
    )
    .await;
    assert_eq!(body["data"]["updateEpisode"]["ok"], false);
    assert_eq!(
        body["data"]["updateEpisode"]["error"],
        "Podcast with id 777 not found"
    );

    // Stage two: the podcast exists, the episode does not.
    let body = graphql(
        &app,
        r#"mutation { updateEpisode(input: {podcastId: 1, episodeId: 777, title: "x"}) { ok error } }"#,
    )
    .await;
    assert_eq!(body["data"]["updateEpisode"]["ok"], false);
    assert_eq!(
        body["data"]["updateEpisode"]["error"],
        "Episode with id 777 not found in podcast with id 1"
    );
}

#[tokio::test]
async fn test_delete_episode_two_stage_errors() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    let body = graphql(
        &app,
        "mutation { deleteEpisode(input: {podcastId: 777, episodeId: 1}) { ok error } }",
    )
    .await;
    assert_eq!(
        body["data"]["deleteEpisode"]["error"],
        "Podcast with id 777 not found"
    );

    let body = graphql(
        &app,
        "mutation { deleteEpisode(input: {podcastId: 1, episodeId: 777}) { ok error } }",
    )
    .await;
    assert_eq!(
        body["data"]["deleteEpisode"]["error"],
        "Episode with id 777 not found in podcast with id 1"
    );

    // And the existing episode deletes cleanly.
    let body = graphql(
        &app,
        "mutation { deleteEpisode(input: {podcastId: 1, episodeId: 1}) { ok error } }",
    )
    .await;
    assert_eq!(body["data"]["deleteEpisode"]["ok"], true);
    assert_eq!(body["data"]["deleteEpisode"]["error"], Value::Null);
}

#[tokio::test]
async fn test_delete_podcast_cascades_to_episodes() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    let body = graphql(&app, "mutation { deletePodcast(input: {id: 1}) { ok error } }").await;
    assert_eq!(body["data"]["deletePodcast"]["ok"], true);

    // The podcast and its episodes disappear as one unit: the episode is no
    // longer reachable, and the failure names the missing podcast.
    let body = graphql(&app, "query { getEpisodes(input: {id: 1}) { ok error } }").await;
    assert_eq!(body["data"]["getEpisodes"]["ok"], false);
    assert_eq!(
        body["data"]["getEpisodes"]["error"],
        "Podcast with id 1 not found"
    );

    let body = graphql(&app, "query { getAllPodcasts { podcasts { id } } }").await;
    assert_eq!(body["data"]["getAllPodcasts"]["podcasts"], json!([]));
}

#[tokio::test]
async fn test_podcast_lists_its_episodes_inline() {
    let app = spawn_app().await;
    seed_podcast_with_episode(&app).await;

    let body = graphql(
        &app,
        "query { getAllPodcasts { ok podcasts { id episodes { id category } } } }",
    )
    .await;
    let podcasts = &body["data"]["getAllPodcasts"]["podcasts"];
    assert_eq!(podcasts[0]["id"], 1);
    assert_eq!(podcasts[0]["episodes"][0]["id"], 1);
    assert_eq!(podcasts[0]["episodes"][0]["category"], "epic");
}
