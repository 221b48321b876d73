use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored message. `id` and `created_at` are assigned once at creation and
/// never change; only `content` is mutable through the update operation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: i64,
    pub like_count: u32,
}

/// Payload for creating a message. The server assigns the id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewMessage {
    pub author: String,
    pub content: String,
}

/// Payload for updating a message. The body id must match the path id; a
/// missing id counts as a mismatch.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageUpdate {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub content: String,
}

/// One page of an ordered listing plus totals.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page; `size` must be non-zero.
    pub fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }
}
