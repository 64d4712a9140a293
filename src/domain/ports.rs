use crate::domain::model::ContactRow;
use crate::utils::error::{Result, SendError};
use async_trait::async_trait;
use std::time::Duration;

pub trait ContactStore: Send + Sync {
    /// 依來源順序回傳資料列（不含表頭）
    fn load_rows(&self) -> impl std::future::Future<Output = Result<Vec<ContactRow>>> + Send;

    fn describe(&self) -> String;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// 每次呼叫自行建立並釋放連線
    async fn send(&self, to: &str, subject: &str, body: &str) -> std::result::Result<(), SendError>;
}

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}
