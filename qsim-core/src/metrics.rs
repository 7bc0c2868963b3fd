//! Metric emission through the `metrics` facade
//!
//! The engine reports its counters, gauges and histograms here. Without an
//! installed recorder every call is a no-op.

use ::metrics::{counter, gauge, histogram};

pub const ARRIVALS_TOTAL: &str = "qsim_arrivals_total";
pub const REJECTED_TOTAL: &str = "qsim_rejected_total";
pub const SERVED_TOTAL: &str = "qsim_served_total";
pub const DEGENERATE_SAMPLES_TOTAL: &str = "qsim_degenerate_samples_total";
pub const WAIT_TIME: &str = "qsim_wait_time";
pub const SYSTEM_TIME: &str = "qsim_system_time";
pub const QUEUE_LENGTH: &str = "qsim_queue_length";
pub const SYSTEM_LENGTH: &str = "qsim_system_length";

pub(crate) fn record_arrival() {
    counter!(ARRIVALS_TOTAL).increment(1);
}

pub(crate) fn record_rejection() {
    counter!(REJECTED_TOTAL).increment(1);
}

pub(crate) fn record_departure(wait: f64, system_time: f64) {
    counter!(SERVED_TOTAL).increment(1);
    histogram!(WAIT_TIME).record(wait);
    histogram!(SYSTEM_TIME).record(system_time);
}

pub(crate) fn record_degenerate_sample(stream: &'static str) {
    counter!(DEGENERATE_SAMPLES_TOTAL, "stream" => stream).increment(1);
}

pub(crate) fn record_lengths(queue_length: usize, system_length: usize) {
    gauge!(QUEUE_LENGTH).set(queue_length as f64);
    gauge!(SYSTEM_LENGTH).set(system_length as f64);
}
