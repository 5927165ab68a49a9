//! New-report notifications.
//!
//! After a sighting is created, one mail document is queued in the
//! `mail_queue` table, which an external mailer drains. Queueing failures are
//! logged and never fail the report itself.

pub mod models;
pub mod services;

pub use services::{MailOutbox, MemoryMailOutbox, NotificationService, PgMailOutbox};
