use convo_core::model::{DeckId, InteractionKind};

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn session_view_without_session_links_to_decks() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("No session yet"), "missing empty state in {html}");
    assert!(html.contains("Browse decks"), "missing deck link in {html}");
    assert!(
        html.contains("Start suggested deck"),
        "missing quick start in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_renders_top_two_cards() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.start_session(DeckId::new(1)).await;

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Date Night"), "missing deck name in {html}");
    assert!(
        html.contains("What was your first impression of me?"),
        "missing top card in {html}"
    );
    assert!(
        html.contains("Which trip of ours would you relive tomorrow?"),
        "missing next card in {html}"
    );
    assert!(
        !html.contains("What is a small thing I do that makes your day?"),
        "third card should not render in {html}"
    );
    assert!(html.contains("1 / 5"), "missing position in {html}");
    assert!(html.contains("Complete"), "missing complete button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_resumes_after_commit() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.start_session(DeckId::new(1)).await;
    harness
        .session_store
        .commit(InteractionKind::Completed)
        .await
        .expect("commit");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("2 / 5"), "missing position in {html}");
    assert!(html.contains("20% answered"), "missing progress in {html}");
    assert!(
        !html.contains("What was your first impression of me?"),
        "answered card still shown in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn session_view_shows_completion_when_every_card_is_resolved() {
    let mut harness = setup_view_harness(ViewKind::Session).await;
    harness.start_session(DeckId::new(3)).await;
    for _ in 0..5 {
        harness
            .session_store
            .commit(InteractionKind::Skipped)
            .await
            .expect("commit");
    }

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("All questions answered"), "missing completion in {html}");
    assert!(html.contains("End session"), "missing end button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn deck_list_renders_overviews() {
    let mut harness = setup_view_harness(ViewKind::Decks).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Date Night"), "missing deck in {html}");
    assert!(html.contains("Looking Inward"), "missing deck in {html}");
    assert!(html.contains("8 questions"), "missing count in {html}");
    assert!(html.contains("3 locked"), "missing locked count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn deck_list_flags_only_the_preferred_deck() {
    let mut harness = setup_view_harness(ViewKind::Decks).await;
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert_eq!(
        html.matches("deck-tile__suggested").count(),
        1,
        "expected one suggested tile in {html}"
    );
    let date_night = html.find("Date Night").expect("preferred deck");
    let suggested = html.find("Suggested").expect("suggested badge");
    let old_friends = html.find("Old Friends").expect("next deck");
    assert!(
        date_night < suggested && suggested < old_friends,
        "badge not on the preferred tile in {html}"
    );
}
