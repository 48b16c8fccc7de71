use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub graduation_year: Option<i32>,
    pub is_alumni: bool,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized participant info carried on messages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_alumni: bool,
}

impl From<&Profile> for ProfileSnapshot {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.clone(),
            email: p.email.clone(),
            full_name: p.full_name.clone(),
            is_alumni: p.is_alumni,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserTag {
    pub id: String,
    pub user_id: String,
    pub tag: String,
    pub created_at: DateTime<Utc>,
}
