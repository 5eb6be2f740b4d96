/*
[INPUT]:  Fake service scripts, paused tokio clock
[OUTPUT]: Engine-level sync behaviour verification
[POS]:    Integration test layer - poll, discard, reconcile end to end
[UPDATE]: When engine event handling or poll scheduling changes
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeService, ListReply, Op, RecordingView, task};
use grabdeck_adapter::{TaskClient, TaskService, TaskStatus};
use grabdeck_console::{ActionKind, AlwaysConfirm, ConsoleConfig, Engine, Severity};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_with_interval(ms: u64) -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.sync.poll_interval_ms = ms;
    config
}

fn engine_for(service: Arc<FakeService>, interval_ms: u64) -> Engine<RecordingView> {
    Engine::new(service, RecordingView::default(), &config_with_interval(interval_ms))
}

#[tokio::test(start_paused = true)]
async fn initial_fetch_on_empty_service_shows_empty_state() {
    let service = Arc::new(FakeService::new(vec![ListReply::ok(vec![])]));
    let mut engine = engine_for(service.clone(), 2000);

    assert!(engine.step().await.is_none(), "first tick only issues a fetch");
    let stats = engine.step().await.expect("snapshot applied");

    assert_eq!(stats.created, 0);
    assert_eq!(engine.view_mut().take(), vec![Op::Summary(0)]);
    assert!(engine.last_sync().is_some());
    assert_eq!(service.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn lifecycle_create_progress_status_remove() {
    let service = Arc::new(FakeService::new(vec![
        ListReply::ok(vec![]),
        ListReply::ok(vec![task("a", TaskStatus::Downloading, 10.0)]),
        ListReply::ok(vec![task("a", TaskStatus::Downloading, 35.0)]),
        ListReply::ok(vec![task("a", TaskStatus::Paused, 35.0)]),
        ListReply::ok(vec![]),
    ]));
    let mut engine = engine_for(service, 2000);

    let mut passes = Vec::new();
    while passes.len() < 5 {
        if engine.step().await.is_some() {
            passes.push(engine.view_mut().take());
        }
    }

    assert_eq!(passes[0], vec![Op::Summary(0)]);
    assert_eq!(passes[1], vec![Op::Create("a".into()), Op::Summary(1)]);
    assert_eq!(
        passes[2],
        vec![Op::Progress("a".into(), 35.0), Op::Transfer("a".into())]
    );
    assert_eq!(
        passes[3],
        vec![
            Op::Status("a".into(), TaskStatus::Paused),
            Op::Actions("a".into(), vec![ActionKind::Resume, ActionKind::Cancel]),
            Op::Progress("a".into(), 35.0),
            Op::Transfer("a".into()),
        ]
    );
    assert_eq!(passes[4], vec![Op::Destroy("a".into()), Op::Summary(0)]);
    assert!(engine.view().entries.is_empty());
}

#[tokio::test(start_paused = true)]
async fn older_fetch_resolving_late_is_discarded() {
    let service = Arc::new(FakeService::new(vec![
        ListReply::ok(vec![task("old", TaskStatus::Pending, 0.0)]).after(Duration::from_millis(500)),
        ListReply::ok(vec![task("new", TaskStatus::Downloading, 5.0)])
            .after(Duration::from_millis(100)),
    ]));
    let mut engine = engine_for(service, 60_000);

    assert!(engine.step().await.is_none());
    assert_eq!(engine.poke_now(), Some(2));

    let applied = engine.step().await;
    assert!(applied.is_some(), "sequence 2 is the latest and applies");
    assert!(engine.store().current().get("new").is_some());

    let late = engine.step().await;
    assert!(late.is_none(), "sequence 1 must be dropped");
    assert!(engine.store().current().get("old").is_none());
    assert_eq!(engine.store().generation(), 1);
    assert_eq!(engine.view().entries, vec!["new".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn failed_poll_is_skipped_and_next_cycle_applies() {
    let service = Arc::new(FakeService::new(vec![
        ListReply::err(500, "internal error"),
        ListReply::ok(vec![task("a", TaskStatus::Pending, 0.0)]),
    ]));
    let mut engine = engine_for(service.clone(), 2000);

    assert!(engine.step().await.is_none());
    assert!(engine.step().await.is_none());
    assert_eq!(engine.poll_failures(), 1);
    assert_eq!(engine.store().generation(), 0);
    assert!(engine.view().ops.is_empty(), "no partial data reaches the view");

    assert!(engine.step().await.is_none(), "next tick issues a fetch");
    let stats = engine.step().await.expect("second cycle applies");
    assert_eq!(stats.created, 1);
    assert_eq!(service.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn dispatcher_events_flow_through_engine() {
    let service = Arc::new(FakeService::new(vec![
        ListReply::ok(vec![task("a", TaskStatus::Downloading, 10.0)]),
        ListReply::ok(vec![task("a", TaskStatus::Paused, 10.0)]),
    ]));
    let mut engine = engine_for(service.clone(), 60_000);
    engine.step().await;
    engine.step().await.expect("initial snapshot");
    engine.view_mut().take();

    let dispatcher = engine.dispatcher(Arc::new(AlwaysConfirm));
    assert!(dispatcher.pause("a").await.is_success());

    // poke, notification, then the poked snapshot
    assert!(engine.step().await.is_none());
    assert!(engine.step().await.is_none());
    assert_eq!(engine.notifier().len(), 1);
    let stats = engine.step().await.expect("poked snapshot");
    assert_eq!(stats.rebuilt, 1);

    let toast = engine
        .notifier()
        .visible(tokio::time::Instant::now())
        .next()
        .map(|(toast, _)| toast.notification.clone())
        .expect("toast");
    assert_eq!(toast.severity, Severity::Info);
    assert_eq!(service.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn run_stops_on_shutdown() {
    let service = Arc::new(FakeService::new(vec![]));
    let mut engine = engine_for(service, 2000);
    let shutdown = CancellationToken::new();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        trigger.cancel();
    });
    engine.run(shutdown).await;

    assert_eq!(engine.poke_now(), None, "stopped engine issues no fetches");
    assert_eq!(engine.store().generation(), 3);
}

#[tokio::test]
async fn engine_reconciles_from_http_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tasks": [
                {"task_id": "a", "status": "downloading", "progress": 12.5, "title": "first"},
                {"task_id": "b", "status": "failed", "progress": 3, "error_message": "user cancelled"}
            ]
        })))
        .mount(&server)
        .await;

    let client = TaskClient::new(&server.uri()).expect("client");
    let service: Arc<dyn TaskService> = Arc::new(client);
    let mut engine = Engine::new(service, RecordingView::default(), &ConsoleConfig::default());

    engine.step().await;
    let stats = engine.step().await.expect("snapshot applied");
    assert_eq!(stats.created, 2);
    assert_eq!(engine.view().entries, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(engine.store().current().len(), 2);
}
