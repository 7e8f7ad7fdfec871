//! Metric name definitions.

/// Outgoing message metrics
pub mod messages {
    /// Total `messages.sendMedia` requests
    pub const SEND_MEDIA_TOTAL: &str = "courier_messages_send_media_total";
    /// Failed `messages.sendMedia` requests, labeled by error `code`
    pub const SEND_MEDIA_ERRORS_TOTAL: &str = "courier_messages_send_media_errors_total";
    /// End-to-end `messages.sendMedia` duration in seconds
    pub const SEND_MEDIA_DURATION_SECONDS: &str = "courier_messages_send_media_duration_seconds";
    /// Draft-clear tasks started
    pub const DRAFT_CLEAR_TOTAL: &str = "courier_messages_draft_clear_total";
    /// Draft-clear tasks that failed
    pub const DRAFT_CLEAR_ERRORS_TOTAL: &str = "courier_messages_draft_clear_errors_total";
}

/// Common label keys
pub mod labels {
    pub const CODE: &str = "code";
}

/// Standard histogram buckets
pub mod buckets {
    use once_cell::sync::Lazy;

    /// Request durations including the downstream delivery call.
    /// Covers 1ms to 30s
    pub static SEND_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]
    });
}
