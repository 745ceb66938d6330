//! Prometheus metrics for bot activity.
//!
//! The statics are registered by the server binary; recording is cheap and
//! works whether or not they are registered.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Updates routed, by route name ("start", "inline", "download", "search", "unmatched").
pub static UPDATES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("copelk_updates_total", "Total chat updates received"),
        &["route"],
    )
    .unwrap()
});

/// Searches by mode ("text", "inline") and result ("success", "failed").
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("copelk_searches_total", "Total subtitle searches"),
        &["mode", "result"],
    )
    .unwrap()
});

/// Records returned per successful search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "copelk_search_results",
            "Number of records returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["mode"],
    )
    .unwrap()
});

/// Downloads by kind ("single", "bulk") and result.
pub static DOWNLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("copelk_downloads_total", "Total subtitle downloads"),
        &["kind", "result"],
    )
    .unwrap()
});

/// Errors turned into chat replies, by error kind.
pub static HANDLER_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "copelk_handler_errors_total",
            "Errors reported back to the user",
        ),
        &["kind"],
    )
    .unwrap()
});

fn result_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failed"
    }
}

/// Record a search; `results` is `None` when it failed.
pub fn record_search(mode: &str, results: Option<usize>) {
    SEARCHES_TOTAL
        .with_label_values(&[mode, result_label(results.is_some())])
        .inc();
    if let Some(n) = results {
        SEARCH_RESULTS.with_label_values(&[mode]).observe(n as f64);
    }
}

pub fn record_download(kind: &str, success: bool) {
    DOWNLOADS_TOTAL
        .with_label_values(&[kind, result_label(success)])
        .inc();
}

pub fn record_update(route: &str) {
    UPDATES_TOTAL.with_label_values(&[route]).inc();
}

pub fn record_handler_error(kind: &str) {
    HANDLER_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

/// Every core collector, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(UPDATES_TOTAL.clone()),
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(DOWNLOADS_TOTAL.clone()),
        Box::new(HANDLER_ERRORS_TOTAL.clone()),
    ]
}
