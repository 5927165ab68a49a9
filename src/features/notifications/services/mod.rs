mod mail_outbox;
mod notification_service;

pub use mail_outbox::{MailOutbox, MemoryMailOutbox, PgMailOutbox};
pub use notification_service::NotificationService;
