//! End-to-end tests for update runs.
//!
//! These run the full pipeline against the mock API (or a mock HTTP server)
//! with a real snapshot file:
//! 1. Load the previous snapshot
//! 2. Choose full or incremental
//! 3. Scan, fetch, merge
//! 4. Persist and read back

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration as StdDuration;

use agent_index::testing::{post_by, profile, MockApi};
use agent_index::{
    AgentApiExt, AgentIndexer, AgentRecord, IndexConfig, JsonFileStore, MemoryStore, Snapshot,
    SnapshotStore, UpdateMode,
};
use chrono::{DateTime, Duration, Utc};
use moltbook_client::{MoltbookClient, PostFeed};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn intro_feed() -> PostFeed {
    PostFeed::Submolt("introductions".into())
}

fn fast_config(path: &Path) -> IndexConfig {
    IndexConfig::default()
        .with_output_path(path)
        .with_request_interval(StdDuration::ZERO)
}

/// A previous snapshot whose last full index was 10 hours ago.
fn previous_snapshot(now: DateTime<Utc>) -> Snapshot {
    let then = now - Duration::hours(10);

    let mut flaky = AgentRecord::new("flaky", then)
        .with_karma(40)
        .with_description("fetched long ago");
    flaky.follower_count = 12;
    flaky.x_handle = Some("flaky_owner".into());
    flaky.twitter_url = Some("https://twitter.com/flaky_owner".into());
    flaky.is_claimed = true;
    flaky.last_active = Some(then - Duration::minutes(3));

    Snapshot::new(
        Some(now - Duration::hours(2)),
        Some(then),
        vec![
            AgentRecord::new("steady", then).with_karma(80),
            flaky,
            AgentRecord::new("quiet", then).with_karma(10),
        ],
    )
}

fn read_document(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_failed_fetch_leaves_previous_record_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.json");
    let now = Utc::now();

    let previous = previous_snapshot(now);
    let store = JsonFileStore::new(&path);
    store.save(&previous).await.unwrap();

    let api = MockApi::new()
        .with_feed(PostFeed::Newest, vec![post_by("flaky", None), post_by("steady", None)])
        .with_failing_profile("flaky")
        .with_profile("steady", profile("steady", 90))
        .with_profile("quiet", profile("quiet", 11));
    let indexer = AgentIndexer::new(api, store, fast_config(&path));

    let result = indexer.run_at(UpdateMode::Incremental, now).await.unwrap();

    assert_eq!(result.mode, UpdateMode::Incremental);
    assert_eq!(result.failed, vec!["flaky"]);
    assert!(!result.is_success());

    let saved = indexer.store().load().await;
    let before = previous.get("flaky").unwrap();
    let after = saved.get("flaky").unwrap();
    assert_eq!(after, before);
    assert_eq!(
        serde_json::to_string(after).unwrap(),
        serde_json::to_string(before).unwrap()
    );
    assert_eq!(saved.get("steady").unwrap().karma, 90);
}

#[tokio::test]
async fn test_overlapping_sources_fetch_each_agent_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.json");
    let now = Utc::now();

    let store = JsonFileStore::new(&path);
    store.save(&previous_snapshot(now)).await.unwrap();

    // "steady" is recently active, newly introduced and already top-ranked
    let api = MockApi::new()
        .with_feed(PostFeed::Newest, vec![post_by("steady", None), post_by("newbie", None)])
        .with_feed(
            intro_feed(),
            vec![
                post_by("steady", Some(now - Duration::minutes(30))),
                post_by("newbie", Some(now - Duration::minutes(20))),
            ],
        )
        .with_profile("steady", profile("steady", 80))
        .with_profile("flaky", profile("flaky", 40))
        .with_profile("quiet", profile("quiet", 10))
        .with_profile("newbie", profile("newbie", 1));
    let indexer = AgentIndexer::new(api, store, fast_config(&path));

    let result = indexer.run_at(UpdateMode::Incremental, now).await.unwrap();

    let requests = indexer.api().profile_requests();
    let unique: HashSet<_> = requests.iter().collect();
    assert_eq!(requests.len(), unique.len());
    assert_eq!(result.candidates, 4);

    let document = read_document(&path);
    let agents = document["agents"].as_array().unwrap();
    let names: HashSet<_> = agents.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), agents.len());
    assert_eq!(document["agentCount"], agents.len());
    assert_eq!(agents.len(), 4);
}

#[tokio::test]
async fn test_saved_document_is_ranked_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("agents.json");

    let api = MockApi::new()
        .with_feed(
            intro_feed(),
            vec![
                post_by("low", None),
                post_by("tie-one", None),
                post_by("high", None),
                post_by("tie-two", None),
            ],
        )
        .with_profile("low", profile("low", 1))
        .with_profile("tie-one", profile("tie-one", 7))
        .with_profile("high", profile("high", 30))
        .with_profile("tie-two", profile("tie-two", 7));
    let indexer = AgentIndexer::new(api, JsonFileStore::new(&path), fast_config(&path));

    let result = indexer.run(UpdateMode::Incremental).await.unwrap();
    assert_eq!(result.mode, UpdateMode::Full);

    let document = read_document(&path);
    let names: Vec<_> = document["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["high", "tie-one", "tie-two", "low"]);
    assert_eq!(document["agentCount"], 4);
    assert!(document["lastFullIndex"].is_string());
    assert_eq!(document["lastUpdated"], document["lastFullIndex"]);
}

#[tokio::test]
async fn test_stale_full_index_triggers_full_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.json");
    let now = Utc::now();

    let stale = Snapshot::new(
        Some(now - Duration::hours(1)),
        Some(now - Duration::hours(30)),
        vec![AgentRecord::new("old", now - Duration::hours(30)).with_karma(3)],
    );
    let store = JsonFileStore::new(&path);
    store.save(&stale).await.unwrap();

    let api = MockApi::new()
        .with_feed(intro_feed(), vec![post_by("fresh", None)])
        .with_profile("fresh", profile("fresh", 2));
    let indexer = AgentIndexer::new(api, store, fast_config(&path));

    let result = indexer.run_at(UpdateMode::Incremental, now).await.unwrap();

    assert_eq!(result.mode, UpdateMode::Full);
    let saved = indexer.store().load().await;
    assert_eq!(saved.last_full_index(), Some(now));
    assert!(saved.get("old").is_none());
    assert!(saved.get("fresh").is_some());
}

#[tokio::test]
async fn test_corrupt_snapshot_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.json");
    std::fs::write(&path, "[[[").unwrap();

    let api = MockApi::new()
        .with_feed(intro_feed(), vec![post_by("a", None)])
        .with_profile("a", profile("a", 1));
    let indexer = AgentIndexer::new(api, JsonFileStore::new(&path), fast_config(&path));

    let result = indexer.run(UpdateMode::Incremental).await.unwrap();

    assert_eq!(result.mode, UpdateMode::Full);
    assert_eq!(read_document(&path)["agentCount"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_every_request_is_spaced_by_interval() {
    let now = Utc::now();
    let api = MockApi::new()
        .with_profile("steady", profile("steady", 80))
        .with_profile("flaky", profile("flaky", 40))
        .with_profile("quiet", profile("quiet", 10))
        .rate_limited(StdDuration::from_secs(1));
    let store = MemoryStore::with_snapshot(previous_snapshot(now));
    let indexer = AgentIndexer::new(api, store, IndexConfig::default());

    let start = tokio::time::Instant::now();
    indexer.run_at(UpdateMode::Incremental, now).await.unwrap();

    // 2 feed scans + 3 profile fetches, first call immediate
    let calls = indexer.api().inner().calls().len();
    assert_eq!(calls, 5);
    assert!(start.elapsed() >= StdDuration::from_secs(4));
}

#[tokio::test]
async fn test_full_pass_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("submolt", "introductions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "posts": [
                { "author": { "name": "alpha" }, "created_at": "2026-01-30T10:00:00Z" },
                { "author": { "name": "beta" }, "created_at": "2026-01-30T11:00:00Z" },
                { "author": { "name": "alpha" }, "created_at": "2026-01-30T12:00:00Z" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agents/profile"))
        .and(query_param("name", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agent": {
                "name": "alpha",
                "karma": 12,
                "description": "first",
                "follower_count": 3,
                "owner": { "x_handle": "alpha_x", "x_name": "Alpha" }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agents/profile"))
        .and(query_param("name", "beta"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("agents.json");
    let api = MoltbookClient::new("test-key")
        .with_base_url(server.uri())
        .rate_limited(StdDuration::ZERO);
    let indexer = AgentIndexer::new(api, JsonFileStore::new(&out), fast_config(&out));

    let result = indexer.run(UpdateMode::Full).await.unwrap();

    assert_eq!(result.candidates, 2);
    assert_eq!(result.failed, vec!["beta"]);

    let document = read_document(&out);
    assert_eq!(document["agentCount"], 1);
    let alpha = &document["agents"][0];
    assert_eq!(alpha["name"], "alpha");
    assert_eq!(alpha["karma"], 12);
    assert_eq!(alpha["followerCount"], 3);
    assert_eq!(alpha["xHandle"], "alpha_x");
    assert_eq!(alpha["twitterUrl"], "https://twitter.com/alpha_x");
    assert_eq!(alpha["ownerName"], "Alpha");
    assert_eq!(alpha["moltbookUrl"], "https://www.moltbook.com/agent/alpha");
    assert!(alpha["avatarUrl"].is_null());
}
