mod common;

use std::collections::HashSet;

use common::{credential, ready_items, ScriptedSubmitter};
use index_submit::{IndexQueue, ItemId, ItemStatus, ProcessingGate, SubmissionOrchestrator};

#[test]
fn batch_delete_purges_selected_ids() {
    let mut queue = IndexQueue::new();
    let ids = queue.add(&["https://x.com/1", "https://x.com/2", "https://x.com/3"]);
    queue.select_all();
    assert_eq!(queue.selected_ids(), ids);

    let doomed: HashSet<ItemId> = [ids[1]].into_iter().collect();
    queue.remove_batch(&doomed);

    assert!(!queue.is_selected(ids[1]));
    assert!(!queue.selection().selected().contains(&ids[1]));
    assert_eq!(queue.selected_ids(), vec![ids[0], ids[2]]);
}

#[test]
fn select_all_twice_clears_selection() {
    let mut queue = IndexQueue::new();
    queue.add(&["https://x.com/1", "https://x.com/2"]);
    queue.select_all();
    queue.select_all();
    assert!(queue.selected_ids().is_empty());
}

#[tokio::test]
async fn clear_failed_removes_exactly_the_failed_items() {
    let queue = IndexQueue::new().shared();
    let gate = ProcessingGate::new();
    let ids = ready_items(
        &queue,
        &gate,
        &[
            "https://x.com/fail/1",
            "https://x.com/2",
            "https://x.com/fail/3",
            "https://x.com/4",
        ],
    )
    .await;
    let pending = queue.lock().await.add(&["https://x.com/fail/pending"]);

    let submitter = ScriptedSubmitter::new(queue.clone(), gate.clone());
    let submission = SubmissionOrchestrator::new(queue.clone(), gate.clone(), submitter, Some(credential()));
    submission.submit(None).await.unwrap();

    let mut guard = queue.lock().await;
    guard.toggle(ids[0]);
    guard.toggle(ids[1]);

    assert_eq!(guard.clear_failed(), 2);

    let remaining = guard.store().ids();
    assert_eq!(remaining, vec![ids[1], ids[3], pending[0]]);
    assert!(guard
        .query(|item| item.status() == ItemStatus::Failed)
        .is_empty());
    assert_eq!(guard.selected_ids(), vec![ids[1]]);
}
