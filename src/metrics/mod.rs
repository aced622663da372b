use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use warp::{Filter, Rejection, Reply};


lazy_static! {
    pub static ref CHANGE_EVENTS: IntCounter = IntCounter::new(
        "kvwatch_change_events_total",
        "Set calls that changed a value and were fanned out to watchers"
    )
    .expect("metric can not be created");

    pub static ref NOTIFICATIONS_DELIVERED: IntCounter = IntCounter::new(
        "kvwatch_notifications_delivered_total",
        "Changed keys enqueued onto a watcher queue"
    )
    .expect("metric can not be created");

    pub static ref NOTIFICATIONS_DROPPED: IntCounter = IntCounter::new(
        "kvwatch_notifications_dropped_total",
        "Changed keys discarded because a watcher queue was full"
    )
    .expect("metric can not be created");

    pub static ref ACTIVE_WATCHERS: IntGauge = IntGauge::new(
        "kvwatch_active_watchers",
        "Watchers currently registered"
    )
    .expect("metric can not be created");

    pub static ref WATCH_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("kvwatch_watch_calls_total", "Completed Watch calls by end reason"),
        &["end"]
    )
    .expect("Should succeed to create metric");

    pub static ref REGISTRY: Registry = Registry::new();
}

static REGISTER_METRICS: Once = Once::new();

fn register_custom_metrics() {
    REGISTER_METRICS.call_once(|| {
        REGISTRY
            .register(Box::new(CHANGE_EVENTS.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(NOTIFICATIONS_DELIVERED.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(NOTIFICATIONS_DROPPED.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(ACTIVE_WATCHERS.clone()))
            .expect("collector can be registered");
        REGISTRY
            .register(Box::new(WATCH_CALLS.clone()))
            .expect("collector can be registered");
    });
}

/// Serves `/metrics` on `port` until `shutdown_signal` fires.
pub async fn start_metrics_server(
    port: u16,
    mut shutdown_signal: watch::Receiver<()>,
) {
    register_custom_metrics();

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    info!("Serving Prometheus metrics on port {}", port);
    let (_, server) =
        warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
            let _ = shutdown_signal.changed().await;
        });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    Ok(gather_metrics())
}

/// Text exposition of every kvwatch collector
pub fn gather_metrics() -> String {
    use prometheus::Encoder;

    register_custom_metrics();
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    };
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
