use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompanyLocation {
    pub id: String,
    pub company_id: String,
    pub address: String,
    pub city: Option<String>,
    pub prefecture: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
