//! Impression sinks for dev and tests.
//!
//! - **RecordingImpressionSink**: keeps every impression in memory
//! - **TracingImpressionSink**: one `info` event per impression
//! - **NoopImpressionSink**: drops everything

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{Impression, SinkError};
use crate::ports::ImpressionSink;

#[derive(Debug, Default)]
pub struct RecordingImpressionSink {
    recorded: Mutex<Vec<Impression>>,
}

impl RecordingImpressionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in emission order.
    pub async fn impressions(&self) -> Vec<Impression> {
        self.recorded.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.recorded.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.recorded.lock().await.is_empty()
    }
}

#[async_trait]
impl ImpressionSink for RecordingImpressionSink {
    async fn emit(&self, impression: Impression) -> Result<(), SinkError> {
        self.recorded.lock().await.push(impression);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingImpressionSink;

#[async_trait]
impl ImpressionSink for TracingImpressionSink {
    async fn emit(&self, impression: Impression) -> Result<(), SinkError> {
        info!(
            player = %impression.player,
            page = %impression.page,
            banner = %impression.banner.id,
            client = %impression.banner.client_id,
            shown_at = %impression.shown_at,
            "impression"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImpressionSink;

#[async_trait]
impl ImpressionSink for NoopImpressionSink {
    async fn emit(&self, _impression: Impression) -> Result<(), SinkError> {
        Ok(())
    }
}
