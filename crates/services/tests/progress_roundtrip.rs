use prep_core::time::fixed_clock;
use services::ProgressService;
use storage::repository::Storage;

#[tokio::test]
async fn full_state_round_trips_into_a_fresh_model() {
    let storage = Storage::in_memory();

    let mut service = ProgressService::new(fixed_clock(), storage.progress.clone()).await;

    // Touch a spread of cards across chapters.
    let reviewed = service.chapters()[0].cards()[0].id();
    let mastered = service.chapters()[3].cards()[1].id();
    let favorite = service.chapters()[6].cards()[2].id();

    service.mark_reviewed(0, reviewed).await.unwrap();
    service.mark_reviewed(0, reviewed).await.unwrap();
    service.set_mastered(3, mastered, true).await.unwrap();
    service.toggle_favorite(6, favorite).await.unwrap();

    let rebuilt = ProgressService::new(fixed_clock(), storage.progress.clone()).await;

    // Every card's state fields match the mutated model.
    for (original, restored) in service.chapters().iter().zip(rebuilt.chapters()) {
        assert_eq!(original.title(), restored.title());
        for (a, b) in original.cards().iter().zip(restored.cards()) {
            assert_eq!(a.is_reviewed(), b.is_reviewed(), "card {}", a.id());
            assert_eq!(a.is_mastered(), b.is_mastered(), "card {}", a.id());
            assert_eq!(a.is_favorite(), b.is_favorite(), "card {}", a.id());
            assert_eq!(a.attempt_count(), b.attempt_count(), "card {}", a.id());
            assert_eq!(a.last_review_date(), b.last_review_date(), "card {}", a.id());
            // content always comes from the catalog, not the store
            assert_eq!(a.question(), b.question());
            assert_eq!(a.answer(), b.answer());
        }
    }

    assert_eq!(rebuilt.chapters()[0].card(reviewed).unwrap().attempt_count(), 2);
    assert_eq!(rebuilt.overall(), service.overall());
}

#[tokio::test]
async fn overall_percentage_reaches_hundred_when_everything_reviewed() {
    let storage = Storage::in_memory();
    let mut service = ProgressService::new(fixed_clock(), storage.progress).await;

    let targets: Vec<(usize, Vec<prep_core::model::CardId>)> = service
        .chapters()
        .iter()
        .enumerate()
        .map(|(idx, chapter)| {
            (
                idx,
                chapter.cards().iter().map(|card| card.id()).collect(),
            )
        })
        .collect();

    let mut last = service.overall().percentage;
    for (idx, ids) in targets {
        for id in ids {
            service.mark_reviewed(idx, id).await.unwrap();
            let pct = service.overall().percentage;
            assert!(pct >= last, "overall percentage regressed: {pct} < {last}");
            last = pct;
        }
        assert_eq!(service.progress_percentage(idx).unwrap(), 100.0);
    }

    assert_eq!(service.overall().percentage, 100.0);
}
