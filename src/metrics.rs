//! Metrics for backend latency and bet placement outcomes.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Bets submitted counter metric name.
pub const METRIC_BETS_SUBMITTED: &str = "bets_submitted_total";
/// Bets accepted counter metric name.
pub const METRIC_BETS_PLACED: &str = "bets_placed_total";
/// Bets refused by the backend counter metric name.
pub const METRIC_BETS_REJECTED: &str = "bets_rejected_total";
/// Bets lost to transport errors counter metric name.
pub const METRIC_BETS_FAILED: &str = "bets_failed_total";
/// Slip entries skipped as stale counter metric name.
pub const METRIC_SLIP_ENTRIES_SKIPPED: &str = "slip_entries_skipped_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "Backend HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_BETS_SUBMITTED, "Total number of bets submitted");
    describe_counter!(METRIC_BETS_PLACED, "Total number of bets accepted");
    describe_counter!(
        METRIC_BETS_REJECTED,
        "Total number of bets refused by the backend"
    );
    describe_counter!(
        METRIC_BETS_FAILED,
        "Total number of bets that never got a backend answer"
    );
    describe_counter!(
        METRIC_SLIP_ENTRIES_SKIPPED,
        "Total number of slip entries skipped because their market was gone"
    );

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment bets submitted counter.
pub fn inc_bets_submitted() {
    counter!(METRIC_BETS_SUBMITTED).increment(1);
}

/// Increment bets placed counter.
pub fn inc_bets_placed() {
    counter!(METRIC_BETS_PLACED).increment(1);
}

/// Increment bets rejected counter.
pub fn inc_bets_rejected() {
    counter!(METRIC_BETS_REJECTED).increment(1);
}

/// Increment bets failed counter.
pub fn inc_bets_failed() {
    counter!(METRIC_BETS_FAILED).increment(1);
}

/// Increment skipped slip entries counter.
pub fn inc_slip_entries_skipped() {
    counter!(METRIC_SLIP_ENTRIES_SKIPPED).increment(1);
}

/// RAII guard timing one backend request.
/// Records latency for its endpoint when dropped.
pub struct RequestTimer {
    start: Instant,
    endpoint: &'static str,
}

impl RequestTimer {
    /// Start timing a request to `endpoint`.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn request_timer_measures_time() {
        let timer = RequestTimer::new("/saldo");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
    }
}
