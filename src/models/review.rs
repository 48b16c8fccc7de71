use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Internship,
    Interview,
    Es,
    General,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompanyReview {
    pub id: String,
    pub company_id: String,
    pub user_id: String,
    pub review_type: ReviewType,
    pub title: String,
    pub content: String,
    pub rating: u8,
    pub is_online: Option<bool>,
    pub location: Option<String>,
    pub passed: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
