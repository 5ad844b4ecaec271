//! Integration tests for the full health check pipeline
//!
//! Probes real HTTP endpoints served by wiremock, runs complete cycles
//! through the orchestrator, and checks what reaches the observation file
//! and the webhook consumer.

use providerwatch::{
    Config, ErrorCategory, HealthEventBus, HealthHistoryTracker, HealthObservation,
    HttpHealthProbe, JsonlObservationStore, MemoryObservationStore, MonitorConfig, NullEventBus,
    ObservationStore, ProbeExecutor, ProbeOrchestrator, ProviderHealthChanged,
    ProviderMonitoringConfig, ProviderRegistry, ProviderStatus, RegisteredProvider,
    StaticProviderRegistry, WebhookEventBus,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, id: &str, endpoint_path: &str) -> RegisteredProvider {
    RegisteredProvider::new(id, "openai")
        .with_endpoint(format!("{}{}", server.uri(), endpoint_path))
}

#[tokio::test]
async fn test_http_probe_classifies_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/denied"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let executor = ProbeExecutor::new(Arc::new(HttpHealthProbe::new().unwrap()));
    let timeout = Duration::from_secs(5);

    let ok = executor
        .execute(&provider_for(&server, "ok", "/ok"), timeout)
        .await;
    assert_eq!(ok.status, ProviderStatus::Online);
    assert!(ok.error_category.is_none());

    let denied = executor
        .execute(&provider_for(&server, "denied", "/denied"), timeout)
        .await;
    assert_eq!(denied.status, ProviderStatus::Offline);
    assert_eq!(denied.error_category, Some(ErrorCategory::Authentication));

    let broken = executor
        .execute(&provider_for(&server, "broken", "/broken"), timeout)
        .await;
    assert_eq!(broken.status, ProviderStatus::Offline);
    assert_eq!(broken.error_category, Some(ErrorCategory::Network));
}

#[tokio::test]
async fn test_http_probe_times_out_against_slow_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let executor = ProbeExecutor::new(Arc::new(HttpHealthProbe::new().unwrap()));
    let obs = executor
        .execute(
            &provider_for(&server, "slow", "/slow"),
            Duration::from_millis(100),
        )
        .await;

    assert_eq!(obs.status, ProviderStatus::Offline);
    assert_eq!(obs.error_category, Some(ErrorCategory::Timeout));
}

#[tokio::test]
async fn test_http_probe_reports_unreachable_as_network() {
    // Nothing listens on this port
    let provider =
        RegisteredProvider::new("gone", "openai").with_endpoint("http://127.0.0.1:9/v1/models");
    let executor = ProbeExecutor::new(Arc::new(HttpHealthProbe::new().unwrap()));
    let obs = executor.execute(&provider, Duration::from_secs(5)).await;

    assert_eq!(obs.status, ProviderStatus::Offline);
    assert_eq!(obs.error_category, Some(ErrorCategory::Network));
}

#[tokio::test]
async fn test_http_probe_without_endpoint_is_unknown() {
    let provider = RegisteredProvider::new("bare", "openai");
    let executor = ProbeExecutor::new(Arc::new(HttpHealthProbe::new().unwrap()));
    let obs = executor.execute(&provider, Duration::from_secs(5)).await;

    assert_eq!(obs.status, ProviderStatus::Offline);
    assert_eq!(obs.error_category, Some(ErrorCategory::Unknown));
}

#[tokio::test]
async fn test_full_pipeline_publishes_dampened_transitions() {
    let providers = MockServer::start().await;
    // Healthy for the first cycle, then failing
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&providers)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&providers)
        .await;

    let hooks = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/health-events"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&hooks)
        .await;

    let registry = Arc::new(StaticProviderRegistry::monitoring_all(vec![
        provider_for(&providers, "openai-main", "/v1/models"),
    ]));
    let store = Arc::new(MemoryObservationStore::new());
    let bus = Arc::new(WebhookEventBus::new(&format!("{}/health-events", hooks.uri())).unwrap());
    let tracker = Arc::new(HealthHistoryTracker::default());
    let orchestrator = ProbeOrchestrator::new(
        registry,
        Arc::new(HttpHealthProbe::new().unwrap()),
        store.clone(),
        bus,
        tracker.clone(),
        &MonitorConfig::default(),
    );

    let (_tx, rx) = watch::channel(false);
    for _ in 0..4 {
        orchestrator.run_cycle(rx.clone()).await.unwrap();
    }

    // Cycle 1 confirms online; cycles 2-4 fail and the third consecutive
    // failure confirms offline
    assert_eq!(tracker.last_published("openai-main"), Some(ProviderStatus::Offline));
    assert_eq!(store.observation_count().await, 4);

    let deliveries: Vec<ProviderHealthChanged> = hooks
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[0].provider_id, "openai-main");
    assert!(deliveries[0].is_healthy);
    assert!(!deliveries[1].is_healthy);
    assert!(deliveries[1].status.starts_with("offline"));
}

#[tokio::test]
async fn test_webhook_bus_rejects_non_success_response() {
    let hooks = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&hooks)
        .await;

    let bus = WebhookEventBus::new(&format!("{}/hook", hooks.uri())).unwrap();
    let obs = HealthObservation::online("p1", "openai", 10.0, None);
    let event = ProviderHealthChanged::from_observation(&obs);

    let err = bus.publish(&event).await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_webhook_bus_rejects_bad_urls() {
    assert!(WebhookEventBus::new("not a url").is_err());
    assert!(WebhookEventBus::new("ftp://example.com/hook").is_err());
}

#[tokio::test]
async fn test_jsonl_store_appends_observations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");

    let store = JsonlObservationStore::open(&path).await.unwrap();
    store
        .record_observation(&HealthObservation::online("a", "openai", 12.0, None))
        .await
        .unwrap();
    store
        .record_observation(&HealthObservation::offline(
            "b",
            "anthropic",
            88.0,
            ErrorCategory::Network,
            "Network error: connection refused",
            None,
        ))
        .await
        .unwrap();
    store
        .update_last_checked("a", chrono::Utc::now())
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let rows: Vec<HealthObservation> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].provider_id, "a");
    assert_eq!(rows[1].provider_id, "b");
    assert_eq!(rows[1].error_category, Some(ErrorCategory::Network));
}

#[tokio::test]
async fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providerwatch.yaml");
    tokio::fs::write(
        &path,
        r#"
monitor:
  interval_minutes: 2
  timeout_seconds: 5
  hysteresis:
    window_size: 7
    confirmation_streak: 4
providers:
  - id: openai-main
    provider_type: openai
    endpoint: https://api.openai.com/v1/models
    monitoring:
      monitoring_enabled: true
  - id: spare
    provider_type: anthropic
    endpoint: https://api.anthropic.com/v1/models
webhook_url: https://hooks.internal/health
"#,
    )
    .await
    .unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.monitor.interval_minutes, 2);
    assert_eq!(config.monitor.hysteresis.window_size, 7);
    assert_eq!(config.webhook_url.as_deref(), Some("https://hooks.internal/health"));

    // Only the provider with an explicit policy is monitored
    let registry = config.registry();
    let policies = registry.monitoring_configs().await.unwrap();
    assert!(policies["openai-main"].monitoring_enabled);
    assert!(!policies.contains_key("spare"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    tokio::fs::write(
        &path,
        r#"
monitor:
  interval_minutes: 0
"#,
    )
    .await
    .unwrap();

    assert!(Config::from_file(&path).await.is_err());
}

#[tokio::test]
async fn test_per_provider_timeout_override() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
        .mount(&server)
        .await;

    // The global default of ten seconds would pass this endpoint; the
    // per-provider override of one second must win and time it out
    let mut monitoring = HashMap::new();
    let mut policy = ProviderMonitoringConfig::enabled();
    policy.timeout_seconds = Some(1);
    monitoring.insert("slow".to_string(), policy);
    let registry = Arc::new(StaticProviderRegistry::new(
        vec![provider_for(&server, "slow", "/slow")],
        monitoring,
    ));

    let store = Arc::new(MemoryObservationStore::new());
    let tracker = Arc::new(HealthHistoryTracker::default());
    let orchestrator = ProbeOrchestrator::new(
        registry,
        Arc::new(HttpHealthProbe::new().unwrap()),
        store.clone(),
        Arc::new(NullEventBus::new()),
        tracker,
        &MonitorConfig::default(),
    );

    let (_tx, rx) = watch::channel(false);
    orchestrator.run_cycle(rx).await.unwrap();

    let observations = store.observations().await;
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].status, ProviderStatus::Offline);
    assert_eq!(observations[0].error_category, Some(ErrorCategory::Timeout));
    assert!(observations[0].response_time_ms < 1500.0);
}
