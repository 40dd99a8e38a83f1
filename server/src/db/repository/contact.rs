//! Contact Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Contact, ContactStatus};

const CONTACT_TABLE: &str = "contact";

#[derive(Clone)]
pub struct ContactRepository {
    base: BaseRepository,
}

impl ContactRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Store a contact form submission
    pub async fn create(&self, name: String, email: String, message: String) -> RepoResult<Contact> {
        let contact = Contact {
            id: None,
            name,
            email: email.trim().to_lowercase(),
            message,
            status: ContactStatus::Pending,
            created_at: Utc::now(),
        };
        let created: Option<Contact> = self
            .base
            .db()
            .create(CONTACT_TABLE)
            .content(contact)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create contact".to_string()))
    }

    /// All submissions, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Contact>> {
        let contacts: Vec<Contact> = self
            .base
            .db()
            .query("SELECT * FROM contact ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(contacts)
    }

    /// Change handling status
    pub async fn update_status(&self, id: &str, status: ContactStatus) -> RepoResult<Contact> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        result
            .take::<Option<Contact>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Contact message {} not found", id)))
    }

    /// Count of submissions still pending
    pub async fn count_pending(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count FROM (SELECT count() FROM contact WHERE status = 'pending' GROUP ALL)")
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }
}
