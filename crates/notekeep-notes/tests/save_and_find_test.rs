//! Saving with tag sync, and sorted/filtered listing.

mod helpers;

use helpers::{note, Harness, PROFILE};
use notekeep_core::{Error, NoteFilter, NotePatch, NoteRepository, SortField};
use notekeep_notes::{FindOptions, SaveOptions};
use notekeep_store::{MockNoteRepository, RepoCall, RepoOp};
use serde_json::json;

#[tokio::test]
async fn test_save_model_syncs_tags() {
    let h = Harness::new().await;
    let tags = h.stub_tags().await;

    let outcome = h
        .module
        .save_model(
            note("1", 100).with_tags(["work", "ideas"]),
            SaveOptions::new().with_tags(),
        )
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(
        tags.payloads(),
        vec![json!({"tags": ["work", "ideas"], "profileId": PROFILE})]
    );
    assert_eq!(h.repo.store().count(PROFILE).await, 1);
}

#[tokio::test]
async fn test_save_model_without_tags_skips_tags_module() {
    let h = Harness::new().await;
    let tags = h.stub_tags().await;

    h.module
        .save_model(note("1", 100).with_tags(["work"]), SaveOptions::new())
        .await
        .unwrap();

    assert_eq!(tags.count(), 0);
}

#[tokio::test]
async fn test_save_model_applies_data_and_timestamps() {
    let h = Harness::new().await;
    let draft = notekeep_core::Note::new(PROFILE).with_title("draft");

    let saved = h
        .module
        .save_model(
            draft,
            SaveOptions::new().with_data(NotePatch::new().favorite(true).notebook("nb")),
        )
        .await
        .unwrap()
        .saved;

    assert!(!saved.id.is_empty());
    assert!(saved.is_favorite);
    assert_eq!(saved.notebook_id.as_deref(), Some("nb"));
    assert!(saved.created > 0);
    assert_eq!(saved.created, saved.updated);
}

#[tokio::test]
async fn test_tag_sync_failure_keeps_the_save() {
    let h = Harness::new().await;
    h.stub_failing(&h.config.tags_channel, "addTags", "tags offline")
        .await;

    let outcome = h
        .module
        .save_model(note("1", 100).with_tags(["work"]), SaveOptions::new().with_tags())
        .await
        .unwrap();

    assert!(matches!(
        outcome.tag_sync_error,
        Some(Error::Collaborator { ref message, .. }) if message.contains("tags offline")
    ));
    assert_eq!(outcome.saved.id, "1");
    assert!(h.repo.store().find_model(PROFILE, "1").await.is_ok());
}

#[tokio::test]
async fn test_missing_tags_module_is_reported() {
    let h = Harness::new().await;

    let outcome = h
        .module
        .save_model(note("1", 100), SaveOptions::new().with_tags())
        .await
        .unwrap();

    assert!(matches!(outcome.tag_sync_error, Some(Error::NoHandler { .. })));
    assert!(outcome.into_result().is_err());
}

#[tokio::test]
async fn test_failed_save_is_an_error_even_if_tags_synced() {
    let repo = MockNoteRepository::new().with_failure(RepoOp::Save);
    let h = Harness::with_repo(repo);
    let tags = h.stub_tags().await;

    let err = h
        .module
        .save_model(note("1", 100).with_tags(["work"]), SaveOptions::new().with_tags())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(tags.count(), 1);
}

fn listing() -> Vec<notekeep_core::Note> {
    vec![
        note("a", 300).with_title("Charlie"),
        note("b", 100).with_title("alpha").with_favorite(true),
        note("c", 200).with_title("Bravo").with_tags(["work"]),
        note("d", 400).with_title("Delta").with_trash(1),
    ]
}

fn ids(collection: &notekeep_core::NoteCollection) -> Vec<&str> {
    collection.ids()
}

#[tokio::test]
async fn test_find_uses_sort_preference() {
    let h = Harness::with_notes(listing()).await;
    let configs = h.stub_sort(json!("title")).await;

    let found = h.module.find(FindOptions::new(PROFILE)).await.unwrap();

    assert_eq!(ids(&found), vec!["b", "c", "a", "d"]);
    assert_eq!(
        configs.payloads(),
        vec![json!({"name": "sortnotes", "profileId": PROFILE})]
    );
    let RepoCall::Find(query) = &h.repo.calls()[0] else {
        panic!("expected a find");
    };
    assert_eq!(query.sort_field, SortField::Title);
}

#[tokio::test]
async fn test_find_falls_back_to_default_sort() {
    for reply in [json!(null), json!("color")] {
        let h = Harness::with_notes(listing()).await;
        h.stub_sort(reply).await;

        let found = h.module.find(FindOptions::new(PROFILE)).await.unwrap();
        assert_eq!(ids(&found), vec!["b", "d", "a", "c"]);
    }
}

#[tokio::test]
async fn test_find_survives_configs_failure() {
    let h = Harness::with_notes(listing()).await;
    h.stub_failing(&h.config.configs_channel, "findConfig", "configs offline")
        .await;

    let found = h.module.find(FindOptions::new(PROFILE)).await.unwrap();
    assert_eq!(found.len(), 4);
}

#[tokio::test]
async fn test_find_applies_named_filter() {
    let h = Harness::with_notes(listing()).await;
    h.stub_sort(json!("created")).await;

    let cases = [
        (NoteFilter::Active, vec!["b", "a", "c"]),
        (NoteFilter::Favorite, vec!["b"]),
        (NoteFilter::Trashed, vec!["d"]),
        (NoteFilter::Tag("work".to_string()), vec!["c"]),
        (NoteFilter::Search("RAV".to_string()), vec!["c"]),
    ];
    for (filter, expected) in cases {
        let found = h
            .module
            .find(FindOptions::new(PROFILE).with_filter(filter.clone()))
            .await
            .unwrap();
        assert_eq!(ids(&found), expected, "filter {filter:?}");
    }
}

#[tokio::test]
async fn test_find_is_profile_scoped() {
    let mut foreign = note("z", 999);
    foreign.profile_id = "other".to_string();
    let mut notes = listing();
    notes.push(foreign);
    let h = Harness::with_notes(notes).await;

    let found = h.module.find(FindOptions::new(PROFILE)).await.unwrap();
    assert!(found.get("z").is_none());
    assert_eq!(found.len(), 4);
}
