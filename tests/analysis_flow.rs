mod common;

use common::{high, item, status, FakeAnalyzer, SnapshotAnalyzer};
use index_submit::models::AnalysisResult;
use index_submit::orchestrator::UNMATCHED_NOTE;
use index_submit::{
    AnalysisOrchestrator, AnalysisReport, AppError, IndexQueue, ItemStatus, ProcessingGate,
    QualityLabel,
};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn successful_analysis_moves_pending_items_to_ready() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a", "https://x.com/b"]);
    let analyzer = FakeAnalyzer::scoring_all();
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer.clone());

    let report = assert_ok!(analysis.analyze(None).await);
    assert_eq!(report, AnalysisReport { analyzed: 2, unmatched: 0 });

    for id in &ids {
        let item = item(&queue, *id).await;
        assert_eq!(item.status(), ItemStatus::Ready);
        assert_eq!(item.quality_score(), Some(80));
        assert_eq!(item.quality_label(), Some(QualityLabel::High));
        assert!(item.analysis_note().unwrap().contains("looks canonical"));
    }
    assert_eq!(
        analyzer.calls(),
        vec![vec!["https://x.com/a".to_string(), "https://x.com/b".to_string()]]
    );
}

#[tokio::test]
async fn every_target_is_analyzing_during_the_call() {
    let queue = IndexQueue::new().shared();
    let gate = ProcessingGate::new();
    let ids = queue
        .lock()
        .await
        .add(&["https://x.com/a", "https://x.com/b", "https://x.com/c"]);
    let analyzer = SnapshotAnalyzer::new(queue.clone(), gate.clone());
    let analysis = AnalysisOrchestrator::new(queue.clone(), gate.clone(), analyzer.clone());

    analysis.analyze(Some(&ids[..2])).await.unwrap();

    let seen = analyzer.seen();
    assert_eq!(seen.len(), 1);
    let (statuses, processing) = &seen[0];
    assert_eq!(
        statuses,
        &vec![
            ("https://x.com/a".to_string(), ItemStatus::Analyzing),
            ("https://x.com/b".to_string(), ItemStatus::Analyzing),
            ("https://x.com/c".to_string(), ItemStatus::Pending),
        ]
    );
    assert!(*processing);

    assert_eq!(status(&queue, ids[0]).await, ItemStatus::Ready);
    assert_eq!(status(&queue, ids[1]).await, ItemStatus::Ready);
    assert_eq!(status(&queue, ids[2]).await, ItemStatus::Pending);
    assert!(!gate.is_processing());
}

#[tokio::test]
async fn failed_call_reverts_every_target_to_pending() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a", "https://x.com/b"]);
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), FakeAnalyzer::failing());

    let err = assert_err!(analysis.analyze(None).await);
    assert!(matches!(err, AppError::ExternalCallFailed { .. }));

    for id in &ids {
        let item = item(&queue, *id).await;
        assert_eq!(item.status(), ItemStatus::Pending);
        assert!(item.quality_score().is_none());
        assert!(item.quality_label().is_none());
    }
}

#[tokio::test]
async fn items_missing_from_response_go_back_to_pending() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a", "https://x.com/b"]);
    let analyzer = FakeAnalyzer::new(|_| Ok(vec![high("https://x.com/a")]));
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer);

    let report = analysis.analyze(None).await.unwrap();
    assert_eq!(report, AnalysisReport { analyzed: 1, unmatched: 1 });

    assert_eq!(status(&queue, ids[0]).await, ItemStatus::Ready);
    let missing = item(&queue, ids[1]).await;
    assert_eq!(missing.status(), ItemStatus::Pending);
    assert_eq!(missing.analysis_note(), Some(UNMATCHED_NOTE));
    assert!(missing.quality_score().is_none());
}

#[tokio::test]
async fn empty_target_set_makes_no_external_call() {
    let queue = IndexQueue::new().shared();
    let analyzer = FakeAnalyzer::scoring_all();
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer.clone());

    let report = analysis.analyze(None).await.unwrap();
    assert_eq!(report, AnalysisReport::default());
    assert!(analyzer.calls().is_empty());
}

#[tokio::test]
async fn explicit_targets_ignore_status_and_other_items() {
    let queue = IndexQueue::new().shared();
    let ids = queue
        .lock()
        .await
        .add(&["https://x.com/a", "https://x.com/b", "https://x.com/c"]);
    let analyzer = FakeAnalyzer::scoring_all();
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer.clone());

    analysis.analyze(None).await.unwrap();
    // 已就绪的条目也可以重新分析
    analysis.analyze(Some(&ids[1..2])).await.unwrap();

    let calls = analyzer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec!["https://x.com/b".to_string()]);
    assert_eq!(status(&queue, ids[1]).await, ItemStatus::Ready);
}

#[tokio::test]
async fn duplicate_urls_are_sent_once_and_both_items_resolved() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a", "https://x.com/a"]);
    let analyzer = FakeAnalyzer::scoring_all();
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer.clone());

    let report = analysis.analyze(None).await.unwrap();
    assert_eq!(report.analyzed, 2);
    assert_eq!(analyzer.calls()[0].len(), 1);
    assert_eq!(status(&queue, ids[1]).await, ItemStatus::Ready);
}

#[tokio::test]
async fn out_of_range_score_is_malformed_and_rolls_back() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a"]);
    let analyzer = FakeAnalyzer::new(|urls| {
        Ok(vec![AnalysisResult {
            quality_score: 150,
            ..high(&urls[0])
        }])
    });
    let analysis = AnalysisOrchestrator::new(queue.clone(), ProcessingGate::new(), analyzer);

    let err = analysis.analyze(None).await.unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
    assert_eq!(status(&queue, ids[0]).await, ItemStatus::Pending);
}

#[tokio::test]
async fn analysis_is_rejected_while_processing() {
    let queue = IndexQueue::new().shared();
    let ids = queue.lock().await.add(&["https://x.com/a"]);
    let gate = ProcessingGate::new();
    let analyzer = FakeAnalyzer::scoring_all();
    let analysis = AnalysisOrchestrator::new(queue.clone(), gate.clone(), analyzer.clone());

    let guard = gate.try_begin().unwrap();
    let err = analysis.analyze(None).await.unwrap_err();
    assert!(matches!(err, AppError::Busy));
    assert_eq!(status(&queue, ids[0]).await, ItemStatus::Pending);
    assert!(analyzer.calls().is_empty());

    drop(guard);
    analysis.analyze(None).await.unwrap();
    assert!(!gate.is_processing());
}
