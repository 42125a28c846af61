//! End-to-end search tests against a data set written to disk.
//!
//! The fixture writes a small 512-dimensional catalog and phrase bank in
//! the production file layout, then loads it through `LazyStore` exactly
//! as the CLI does.

use std::collections::HashSet;

use sift_core::store::files;
use sift_core::{
    vector, DataFiles, EmbeddingMatrix, EmbeddingStore, LazyStore, Track, EMBEDDING_DIM,
};
use sift_search::query::{SEED_WEIGHT, TEXT_WEIGHT};
use sift_search::{
    PhraseMatcher, QueryMode, QueryVectorBuilder, SearchEngine, SearchRequest, TagMatcher,
};
use tempfile::TempDir;

const CATALOG_SIZE: usize = 40;

/// Deterministic pseudo-random unit vector.
fn unit_vector(seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let raw: Vec<f32> = (0..EMBEDDING_DIM)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) - 0.5
        })
        .collect();
    vector::normalize(&raw).unwrap()
}

fn write_fixture(dir: &TempDir) -> DataFiles {
    let data = DataFiles::in_dir(dir.path());

    let catalog_rows: Vec<Vec<f32>> = (0..CATALOG_SIZE as u64).map(unit_vector).collect();
    let tracks: Vec<Track> = (0..CATALOG_SIZE)
        .map(|i| {
            let id = match i {
                0 => "A".to_string(),
                1 => "B".to_string(),
                _ => format!("T{i}"),
            };
            Track::new(id, format!("spotify-{i}"), format!("Track {i}"), "Some Artist")
        })
        .collect();

    let phrases = ["rainy night jazz", "lofi chill beats", "upbeat summer pop"];
    let phrase_rows: Vec<Vec<f32>> = (1000..1003).map(unit_vector).collect();

    files::write_matrix(
        &data.catalog_embeddings,
        &EmbeddingMatrix::from_rows(&catalog_rows).unwrap(),
    )
    .unwrap();
    files::write_matrix(
        &data.phrase_embeddings,
        &EmbeddingMatrix::from_rows(&phrase_rows).unwrap(),
    )
    .unwrap();
    std::fs::write(&data.metadata, serde_json::to_string(&tracks).unwrap()).unwrap();
    std::fs::write(&data.phrases, serde_json::to_string(&phrases).unwrap()).unwrap();

    data
}

fn load(dir: &TempDir) -> LazyStore {
    LazyStore::new(write_fixture(dir), EMBEDDING_DIM)
}

#[test]
fn test_open_loads_production_layout() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);

    let store = EmbeddingStore::open(dir.path()).unwrap();
    assert_eq!(store.len(), CATALOG_SIZE);
    assert_eq!(store.phrase_count(), 3);
    assert_eq!(store.dim(), EMBEDDING_DIM);
}

#[test]
fn test_stored_vectors_are_unit_length() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let store = lazy.get().unwrap();

    assert_eq!(store.catalog_embeddings().count_non_unit_rows(), 0);
    assert_eq!(store.phrase_embeddings().count_non_unit_rows(), 0);
}

#[test]
fn test_scenario_a_substring_match() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let engine = SearchEngine::new(lazy.get().unwrap());

    let (m, phrase) = engine.match_phrase("lofi").unwrap();
    assert_eq!(m.index, 1);
    assert_eq!(phrase, "lofi chill beats");
}

#[test]
fn test_scenario_b_seed_only() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let store = lazy.get().unwrap();
    let engine = SearchEngine::new(store);

    let seeds = vec!["A".to_string(), "B".to_string()];
    let phrases = PhraseMatcher::new(store.phrases());
    let tags = TagMatcher::new(store.phrases());
    let query = QueryVectorBuilder::new(store, &phrases, &tags)
        .build(None, &seeds, &[])
        .unwrap();
    let expected = vector::average(&[
        store.embedding_of("A").unwrap(),
        store.embedding_of("B").unwrap(),
    ])
    .unwrap();
    assert_eq!(&*query.vector, expected.as_slice());

    let response = engine
        .search(&SearchRequest::seeds(["A", "B"]).with_limit(5))
        .unwrap();
    assert_eq!(response.mode, QueryMode::Seed);
    assert!(response.hits.len() <= 5);
    assert!(response
        .hits
        .iter()
        .all(|h| h.track.seq_id != "A" && h.track.seq_id != "B"));
}

#[test]
fn test_scenario_c_combined_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let store = lazy.get().unwrap();
    let engine = SearchEngine::new(store);

    let request = SearchRequest::seeds(["A"]).with_prompt("rain").with_limit(10);
    let first = engine.search(&request).unwrap();
    let second = engine.search(&request).unwrap();

    assert_eq!(first.mode, QueryMode::Combined);
    let phrase = first.matched_phrase.as_ref().unwrap();
    assert_eq!(phrase.text, "rainy night jazz");

    let expected_query = vector::blend(
        store.embedding_of("A").unwrap(),
        SEED_WEIGHT,
        store.phrase_embedding_of(phrase.index).unwrap(),
        TEXT_WEIGHT,
    )
    .unwrap();
    let top = first.hits[0];
    let row = store.embedding_of(&top.track.seq_id).unwrap();
    let expected_score = vector::dot(&expected_query, row).unwrap();
    assert!((top.similarity - expected_score).abs() < 1e-6);

    let first_ids: Vec<&str> = first.hits.iter().map(|h| h.track.seq_id.as_str()).collect();
    let second_ids: Vec<&str> = second.hits.iter().map(|h| h.track.seq_id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first_ids.len(), 10);
}

#[test]
fn test_scenario_d_no_inputs() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let engine = SearchEngine::new(lazy.get().unwrap());

    let err = engine
        .search(&SearchRequest::seeds(Vec::<String>::new()))
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_scenario_e_unknown_seed() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let engine = SearchEngine::new(lazy.get().unwrap());

    let err = engine
        .search(&SearchRequest::seeds(["unknown-id"]))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_result_length_property() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let engine = SearchEngine::new(lazy.get().unwrap());

    for (seeds, limit) in [
        (vec!["A"], 100),
        (vec!["A", "B"], 100),
        (vec!["A", "B", "A"], 100),
        (vec!["A"], 7),
        (vec!["T5", "T6", "T7", "T8", "T9"], 36),
    ] {
        let request = SearchRequest::seeds(seeds.clone()).with_limit(limit);
        let response = engine.search(&request).unwrap();

        let distinct: HashSet<&str> = seeds.iter().copied().collect();
        let expected = limit.min(CATALOG_SIZE - distinct.len());
        assert_eq!(response.hits.len(), expected, "seeds {seeds:?} limit {limit}");
        assert!(response
            .hits
            .iter()
            .all(|h| !distinct.contains(h.track.seq_id.as_str())));
    }
}

#[test]
fn test_seed_is_most_similar_to_itself() {
    let dir = TempDir::new().unwrap();
    let lazy = load(&dir);
    let store = lazy.get().unwrap();

    let row = store.embedding_of("T3").unwrap();
    let hits = sift_search::rank(
        row,
        store.catalog_embeddings(),
        store.metadata(),
        &HashSet::new(),
        1,
    )
    .unwrap();
    assert_eq!(hits[0].track.seq_id, "T3");
    assert!((hits[0].similarity - 1.0).abs() < 1e-5);
}

#[test]
fn test_truncated_matrix_is_fatal() {
    let dir = TempDir::new().unwrap();
    let data = write_fixture(&dir);
    std::fs::remove_file(files::sidecar_path(&data.catalog_embeddings)).unwrap();

    let bytes = std::fs::read(&data.catalog_embeddings).unwrap();
    std::fs::write(&data.catalog_embeddings, &bytes[..bytes.len() - 4]).unwrap();

    let err = LazyStore::new(data, EMBEDDING_DIM).get().unwrap_err();
    assert!(err.is_load_error());
}

#[test]
fn test_metadata_count_mismatch_is_fatal() {
    let dir = TempDir::new().unwrap();
    let data = write_fixture(&dir);
    std::fs::write(&data.metadata, "[]").unwrap();

    let err = EmbeddingStore::load(&data, EMBEDDING_DIM).unwrap_err();
    assert!(err.is_load_error());
}
