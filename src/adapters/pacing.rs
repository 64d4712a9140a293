use crate::domain::ports::Pacer;
use async_trait::async_trait;
use std::time::Duration;

/// 固定間隔節流，阻塞目前這個唯一的執行流程直到時間到
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        tracing::debug!("⏳ Waiting {:?} before next send", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Dry runs never wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

#[async_trait]
impl Pacer for NoPause {
    async fn pause(&self, _delay: Duration) {}
}
