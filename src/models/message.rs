use super::profile::ProfileSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A direct message. Immutable once created except `is_read`, which flips
/// to true when the receiver opens the thread.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<ProfileSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ProfileSnapshot>,
}
