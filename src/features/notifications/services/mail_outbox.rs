use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::features::notifications::models::OutgoingMail;

/// Destination for queued mail documents
#[async_trait]
pub trait MailOutbox: Send + Sync {
    async fn enqueue(&self, mail: OutgoingMail) -> Result<()>;
}

/// Queues mail in the `mail_queue` table
pub struct PgMailOutbox {
    pool: PgPool,
}

impl PgMailOutbox {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MailOutbox for PgMailOutbox {
    async fn enqueue(&self, mail: OutgoingMail) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO mail_queue (recipient, subject, html)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&mail.to)
        .bind(&mail.subject)
        .bind(&mail.html)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Keeps queued mail in memory; used with the in-memory record store
#[derive(Default)]
pub struct MemoryMailOutbox {
    queued: Mutex<Vec<OutgoingMail>>,
}

impl MemoryMailOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn queued(&self) -> Vec<OutgoingMail> {
        self.queued.lock().await.clone()
    }
}

#[async_trait]
impl MailOutbox for MemoryMailOutbox {
    async fn enqueue(&self, mail: OutgoingMail) -> Result<()> {
        tracing::debug!("Queued mail for {}: {}", mail.to, mail.subject);
        self.queued.lock().await.push(mail);
        Ok(())
    }
}
