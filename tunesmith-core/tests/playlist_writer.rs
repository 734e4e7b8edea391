//! Integration tests for playlist creation and batched writes.
//!
//! These tests verify that the PlaylistWriter correctly:
//! - Chunks track submissions into ordered batches of at most 50 URIs
//! - Filters blank and duplicate ids before submission
//! - Rejects bad input before any network call
//! - Aborts on a failed batch and reports the created playlist id

use tunesmith_core::catalog::{CatalogClient, PlaylistError, PlaylistWriter};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, method, path},
};

async fn mount_profile_and_create(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-1"})),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/user-1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "pl-1"})))
        .mount(mock_server)
        .await;
}

fn writer_for(base_url: &str) -> PlaylistWriter {
    PlaylistWriter::new(CatalogClient::new(base_url.to_string()))
}

async fn add_item_bodies(mock_server: &MockServer) -> Vec<serde_json::Value> {
    mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/playlists/pl-1/tracks")
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_120_tracks_submit_as_three_ordered_batches() {
    let mock_server = MockServer::start().await;
    mount_profile_and_create(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"snapshot_id": "snap"})),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let track_ids: Vec<String> = (0..120).map(|i| format!("id{:03}", i)).collect();

    let writer = writer_for(&mock_server.uri());
    let playlist_id = writer
        .create_and_populate("user-token", "Generated Mix", None, &track_ids)
        .await
        .unwrap();

    assert_eq!(playlist_id, "pl-1");

    let bodies = add_item_bodies(&mock_server).await;
    assert_eq!(bodies.len(), 3);

    let batch_sizes: Vec<usize> = bodies
        .iter()
        .map(|body| body["uris"].as_array().unwrap().len())
        .collect();
    assert_eq!(batch_sizes, vec![50, 50, 20]);

    assert_eq!(bodies[0]["uris"][0], "spotify:track:id000");
    assert_eq!(bodies[1]["uris"][0], "spotify:track:id050");
    assert_eq!(bodies[2]["uris"][19], "spotify:track:id119");
}

#[tokio::test]
async fn test_blank_and_duplicate_ids_are_filtered() {
    let mock_server = MockServer::start().await;
    mount_profile_and_create(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"snapshot_id": "snap"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let track_ids = vec![
        "a".to_string(),
        "a".to_string(),
        "".to_string(),
        "b".to_string(),
    ];

    let writer = writer_for(&mock_server.uri());
    writer
        .create_and_populate("user-token", "Deduped", None, &track_ids)
        .await
        .unwrap();

    let bodies = add_item_bodies(&mock_server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0]["uris"],
        serde_json::json!(["spotify:track:a", "spotify:track:b"])
    );
}

#[tokio::test]
async fn test_preconditions_fail_before_any_network_call() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let writer = writer_for(&mock_server.uri());
    let track_ids = vec!["a".to_string()];

    let no_token = writer
        .create_and_populate("", "Name", None, &track_ids)
        .await;
    assert!(matches!(
        no_token,
        Err(PlaylistError::InvalidArgument { .. })
    ));

    let no_name = writer
        .create_and_populate("user-token", "  ", None, &track_ids)
        .await;
    assert!(matches!(no_name, Err(PlaylistError::InvalidArgument { .. })));

    let no_tracks = writer
        .create_and_populate("user-token", "Name", None, &["".to_string(), " ".to_string()])
        .await;
    assert!(matches!(
        no_tracks,
        Err(PlaylistError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_failed_batch_aborts_and_reports_playlist_id() {
    let mock_server = MockServer::start().await;
    mount_profile_and_create(&mock_server).await;

    // first batch lands, the second is rejected
    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"snapshot_id": "snap"})),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let track_ids: Vec<String> = (0..120).map(|i| format!("id{:03}", i)).collect();

    let writer = writer_for(&mock_server.uri());
    let result = writer
        .create_and_populate("user-token", "Partial", None, &track_ids)
        .await;

    match result {
        Err(PlaylistError::WriteFailed { playlist_id, .. }) => {
            assert_eq!(playlist_id, "pl-1");
        }
        other => panic!("expected WriteFailed, got {:?}", other.map(|_| ())),
    }

    // the third batch was never attempted
    let bodies = add_item_bodies(&mock_server).await;
    assert_eq!(bodies.len(), 2);
}

#[tokio::test]
async fn test_custom_description_is_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-1"})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/user-1/playlists"))
        .and(wiremock::matchers::body_partial_json(serde_json::json!({
            "name": "Named",
            "description": "A custom description",
            "public": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "pl-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"snapshot_id": "snap"})),
        )
        .mount(&mock_server)
        .await;

    let writer = writer_for(&mock_server.uri());
    writer
        .create_and_populate(
            "user-token",
            "Named",
            Some("A custom description"),
            &["a".to_string()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_user_playlists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": "pl-9",
                "name": "Old Favorites",
                "description": null,
                "images": [],
                "tracks": {"total": 7},
                "public": false,
                "collaborative": false,
                "external_urls": {"spotify": "https://open/pl-9"}
            }]
        })))
        .mount(&mock_server)
        .await;

    let writer = writer_for(&mock_server.uri());
    let playlists = writer.list_user_playlists("user-token").await.unwrap();

    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].id, "pl-9");
    assert_eq!(playlists[0].description, "");
    assert_eq!(playlists[0].total_tracks, 7);
}
