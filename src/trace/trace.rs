use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One perception pass, as recorded in the JSONL trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub pass: String,

    pub url: Option<String>,

    pub element_count: Option<usize>,
    pub active_count: Option<usize>,
    pub suppressed_count: Option<usize>,

    pub duration_ms: Option<u128>,
}

impl TraceEvent {
    pub fn now(pass: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            pass: pass.to_string(),
            url: None,
            element_count: None,
            active_count: None,
            suppressed_count: None,
            duration_ms: None,
        }
    }

    pub fn with_url(mut self, url: Option<&str>) -> Self {
        self.url = url.map(str::to_string);
        self
    }

    pub fn with_element_count(mut self, count: usize) -> Self {
        self.element_count = Some(count);
        self
    }

    pub fn with_active_count(mut self, count: usize) -> Self {
        self.active_count = Some(count);
        self
    }

    pub fn with_suppressed_count(mut self, count: usize) -> Self {
        self.suppressed_count = Some(count);
        self
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}
