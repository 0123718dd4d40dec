use std::sync::Mutex;
use std::time::Duration;

use spotsync::batch::{MAX_CHUNK_SIZE, apply_in_chunks};
use spotsync::error::{ErrorKind, SyncError};
use spotsync::retry::RetryPolicy;
use spotsync::sync::{Keyed, TrackFilter, filter_tracks, plan};
use spotsync::types::{Artist, Track};

// Helper function to create a test track
fn create_test_track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        uri: format!("spotify:track:{}", id),
        name: name.to_string(),
        artists: vec![artist.to_string()],
        added_at: Some("2024-03-01T12:00:00Z".to_string()),
        popularity: Some(50),
    }
}

// Helper function to create a test artist
fn create_test_artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        genres: vec![],
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(1),
        ..RetryPolicy::default()
    }
}

#[test]
fn test_plan_computes_the_symmetric_difference() {
    let source = vec![
        create_test_track("a", "Track A", "Artist"),
        create_test_track("b", "Track B", "Artist"),
        create_test_track("c", "Track C", "Artist"),
    ];
    let target = vec![
        create_test_track("b", "Track B", "Artist"),
        create_test_track("d", "Track D", "Artist"),
    ];

    let plan = plan(&source, &target);

    let add_ids: Vec<&str> = plan.to_add.iter().map(Keyed::key).collect();
    let remove_ids: Vec<&str> = plan.to_remove.iter().map(Keyed::key).collect();
    assert_eq!(add_ids, vec!["a", "c"]);
    assert_eq!(remove_ids, vec!["d"]);
}

#[test]
fn test_plan_is_idempotent_and_empty_for_equal_collections() {
    let source = vec![
        create_test_track("a", "Track A", "Artist"),
        create_test_track("b", "Track B", "Artist"),
    ];
    let target = source.clone();

    let first = plan(&source, &target);
    let second = plan(&source, &target);

    assert!(first.is_empty());
    assert!(second.is_empty());

    // order of the inputs does not change the outcome
    let reversed: Vec<Track> = source.iter().rev().cloned().collect();
    assert!(plan(&reversed, &target).is_empty());
}

#[test]
fn test_plan_falls_back_to_uri_for_tracks_without_id() {
    let mut local = create_test_track("ignored", "Local File", "Artist");
    local.id = None;
    local.uri = "spotify:local:file".to_string();

    let source = vec![local.clone(), create_test_track("a", "Track A", "Artist")];
    let target = vec![local];

    let plan = plan(&source, &target);

    // the local file matches by uri, only the id track is missing
    assert_eq!(plan.to_add.len(), 1);
    assert_eq!(plan.to_add[0].key(), "a");
    assert!(plan.to_remove.is_empty());
}

#[test]
fn test_plan_collapses_duplicates_within_one_side() {
    let source = vec![
        create_test_track("a", "Track A", "Artist"),
        create_test_track("a", "Track A", "Artist"),
    ];
    let target: Vec<Track> = Vec::new();

    let plan = plan(&source, &target);
    assert_eq!(plan.to_add.len(), 1);
}

#[test]
fn test_plan_works_for_artists_by_id() {
    let source = vec![
        create_test_artist("1", "First"),
        create_test_artist("2", "Second"),
    ];
    let target = vec![
        create_test_artist("2", "Second"),
        create_test_artist("3", "Third"),
    ];

    let plan = plan(&source, &target);
    assert_eq!(plan.to_add[0].id, "1");
    assert_eq!(plan.to_remove[0].id, "3");
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("id{}", i)).collect()
}

#[tokio::test]
async fn test_chunking_issues_no_call_for_empty_input() {
    let chunks: Mutex<Vec<Vec<String>>> = Mutex::new(Vec::new());
    let chunks_ref = &chunks;

    let applied = apply_in_chunks(&fast_policy(), &[], |chunk| async move {
        chunks_ref.lock().unwrap().push(chunk);
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(applied, 0);
    assert!(chunks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chunking_boundaries() {
    for (input_len, expected_sizes) in [
        (1, vec![1]),
        (100, vec![100]),
        (101, vec![100, 1]),
        (150, vec![100, 50]),
        (250, vec![100, 100, 50]),
    ] {
        let chunks: Mutex<Vec<Vec<String>>> = Mutex::new(Vec::new());
        let chunks_ref = &chunks;
        let input = ids(input_len);

        apply_in_chunks(&fast_policy(), &input, |chunk| async move {
            chunks_ref.lock().unwrap().push(chunk);
            Ok(())
        })
        .await
        .unwrap();

        let recorded = chunks.into_inner().unwrap();
        let sizes: Vec<usize> = recorded.iter().map(Vec::len).collect();
        assert_eq!(sizes, expected_sizes, "input of {} ids", input_len);

        // every chunk respects the cap and concatenation restores the input
        assert!(recorded.iter().all(|c| c.len() <= MAX_CHUNK_SIZE));
        let rejoined: Vec<String> = recorded.into_iter().flatten().collect();
        assert_eq!(rejoined, input);
    }
}

#[tokio::test]
async fn test_chunking_aborts_on_first_failing_chunk() {
    let chunks: Mutex<Vec<Vec<String>>> = Mutex::new(Vec::new());
    let chunks_ref = &chunks;
    let input = ids(250);

    let result = apply_in_chunks(&fast_policy(), &input, |chunk| async move {
        let failing = chunk[0] == "id100";
        chunks_ref.lock().unwrap().push(chunk);
        if failing {
            Err(SyncError::config("unrecoverable"))
        } else {
            Ok(())
        }
    })
    .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);

    // chunk 1 succeeded, chunk 2 failed without retry, chunk 3 never ran
    let recorded = chunks.into_inner().unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0][0], "id0");
    assert_eq!(recorded[1][0], "id100");
}

#[tokio::test]
async fn test_chunking_retries_a_chunk_before_aborting() {
    let attempts = Mutex::new(0usize);
    let attempts_ref = &attempts;
    let input = ids(150);

    let result = apply_in_chunks(&fast_policy(), &input, |chunk| async move {
        if chunk[0] == "id100" {
            *attempts_ref.lock().unwrap() += 1;
            Err(SyncError::api(502, "bad gateway"))
        } else {
            Ok(())
        }
    })
    .await;

    assert!(result.is_err());
    // the failing chunk was attempted max_retries times before giving up
    assert_eq!(*attempts.lock().unwrap(), 3);
}

#[test]
fn test_filter_by_popularity_bounds() {
    let mut obscure = create_test_track("a", "Obscure", "Artist");
    obscure.popularity = Some(5);
    let mut hit = create_test_track("b", "Hit", "Artist");
    hit.popularity = Some(95);
    let mut unrated = create_test_track("c", "Unrated", "Artist");
    unrated.popularity = None;

    let filter = TrackFilter {
        min_popularity: Some(10),
        ..TrackFilter::default()
    };
    let kept = filter_tracks(vec![obscure.clone(), hit.clone(), unrated.clone()], &filter);
    // tracks without a popularity value never satisfy a bound
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Hit");

    let filter = TrackFilter {
        max_popularity: Some(50),
        ..TrackFilter::default()
    };
    let kept = filter_tracks(vec![obscure, hit, unrated], &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Obscure");
}

#[test]
fn test_filter_by_artist_is_case_insensitive() {
    let tracks = vec![
        create_test_track("a", "Track A", "Daft Punk"),
        create_test_track("b", "Track B", "Justice"),
    ];

    let filter = TrackFilter {
        artists: vec!["daft punk".to_string()],
        ..TrackFilter::default()
    };
    let kept = filter_tracks(tracks, &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Track A");
}

#[test]
fn test_filter_by_added_date_window() {
    let mut early = create_test_track("a", "Early", "Artist");
    early.added_at = Some("2024-01-15T09:00:00Z".to_string());
    let mut late = create_test_track("b", "Late", "Artist");
    late.added_at = Some("2024-06-15T09:00:00Z".to_string());
    let mut undated = create_test_track("c", "Undated", "Artist");
    undated.added_at = None;

    let filter = TrackFilter {
        added_after: Some(spotsync::sync::parse_filter_date("2024-03-01").unwrap()),
        ..TrackFilter::default()
    };
    let kept = filter_tracks(vec![early.clone(), late.clone(), undated], &filter);
    // undated tracks are excluded once a date bound is set
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Late");

    let filter = TrackFilter {
        added_before: Some(spotsync::sync::parse_filter_date("2024-03-01").unwrap()),
        ..TrackFilter::default()
    };
    let kept = filter_tracks(vec![early, late], &filter);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Early");
}

#[test]
fn test_empty_filter_keeps_everything() {
    let tracks = vec![
        create_test_track("a", "Track A", "Artist"),
        create_test_track("b", "Track B", "Artist"),
    ];
    let kept = filter_tracks(tracks.clone(), &TrackFilter::default());
    assert_eq!(kept.len(), tracks.len());
}

#[test]
fn test_invalid_filter_date_is_a_config_error() {
    let err = spotsync::sync::parse_filter_date("not-a-date").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
