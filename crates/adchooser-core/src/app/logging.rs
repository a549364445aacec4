use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{ChooserError, Decision, Impression, PageId, PlayerId};
use crate::ports::{AdChooser, Clock, ImpressionSink};

/// LoggingAdChooser records an impression for every banner it hands out.
///
/// Sits outside the cache, so cache hits count as impressions too. A sink
/// failure is logged and dropped; the caller still gets the banner. The
/// impression has been handed to the sink by the time `get_ad` returns.
pub struct LoggingAdChooser<C> {
    inner: C,
    sink: Arc<dyn ImpressionSink>,
    clock: Arc<dyn Clock>,
}

impl<C: AdChooser> LoggingAdChooser<C> {
    pub fn new(inner: C, sink: Arc<dyn ImpressionSink>, clock: Arc<dyn Clock>) -> Self {
        Self { inner, sink, clock }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: AdChooser> AdChooser for LoggingAdChooser<C> {
    async fn get_ad(&self, player: PlayerId, page: &PageId) -> Result<Decision, ChooserError> {
        let decision = self.inner.get_ad(player, page).await?;
        if let Decision::Show(banner) = &decision {
            let impression =
                Impression::new(player, page.clone(), banner.clone(), self.clock.now());
            if let Err(err) = self.sink.emit(impression).await {
                warn!(
                    %player,
                    %page,
                    banner = %banner.id,
                    error = %err,
                    kind = ?err.kind(),
                    "failed to record impression"
                );
            }
        }
        Ok(decision)
    }
}
