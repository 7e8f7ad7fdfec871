//! Metrics collection and export for courier.
//!
//! Metric names live in [`messages`]; record them through the re-exported
//! `metrics` facade macros. With the `prometheus` feature the recorder
//! renders the Prometheus text format, otherwise metrics are discarded.
//!
//! ```rust,ignore
//! use courier_metrics::{counter, messages};
//!
//! counter!(messages::SEND_MEDIA_TOTAL).increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
