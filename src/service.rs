use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::model::{Message, MessageUpdate, NewMessage, Page};
use crate::store::MessageStore;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Message logic layer. Every operation is a single synchronous round trip to
/// the store; store faults propagate unchanged.
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Assign a fresh id, stamp the creation time and persist the record.
    pub fn create(&self, new: NewMessage) -> Result<Message, ServiceError> {
        let message = Message {
            id: Uuid::new_v4(),
            author: new.author,
            content: new.content,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
            like_count: 0,
        };
        self.store.save(&message)?;
        Ok(message)
    }

    pub fn get(&self, id: &Uuid) -> Result<Message, ServiceError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(ServiceError::not_found)
    }

    /// Replace the content of an existing message. The body id must match the
    /// path id; author, creation time and like count are never altered.
    pub fn update(&self, id: &Uuid, update: MessageUpdate) -> Result<Message, ServiceError> {
        let mut message = self.get(id)?;
        if update.id != Some(message.id) {
            return Err(ServiceError::wrong_update_id());
        }
        message.content = update.content;
        self.store.save(&message)?;
        Ok(message)
    }

    /// Delete an existing message. Fails NotFound without deleting anything
    /// when the id is unknown.
    pub fn delete(&self, id: &Uuid) -> Result<bool, ServiceError> {
        self.get(id)?;
        self.store.delete_by_id(id)?;
        Ok(true)
    }

    /// One page of messages ordered by creation time descending.
    pub fn list(&self, page: Option<u64>, size: Option<u64>) -> Result<Page<Message>, ServiceError> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let content = self.store.list_page(page.saturating_mul(size), size)?;
        let total = self.store.count()?;
        Ok(Page::new(content, page, size, total))
    }
}
