use crate::{auth::CurrentUser, config::Config, errors::ApiError, store::Store};
use crate::models::company::Company;
use crate::routes::reviews::review_with_author;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn list_companies(
    store: web::Data<Store>,
    _user: CurrentUser,
    q: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let state = store.read()?;
    let needle = q.q.as_deref().unwrap_or("").trim().to_lowercase();
    let companies: Vec<&Company> = state
        .companies
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.industry
                    .as_deref()
                    .is_some_and(|i| i.to_lowercase().contains(&needle))
        })
        .collect();
    Ok(HttpResponse::Ok().json(companies))
}

#[derive(Deserialize)]
pub struct CreateCompanyReq {
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

pub async fn create_company(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    _user: CurrentUser,
    body: web::Json<CreateCompanyReq>,
) -> Result<HttpResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("company name required".into()));
    }

    cfg.simulate_latency().await;

    let now = chrono::Utc::now();
    let company = Company {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        industry: body.industry.clone().filter(|s| !s.trim().is_empty()),
        description: body.description.clone().filter(|s| !s.trim().is_empty()),
        website: body.website.clone().filter(|s| !s.trim().is_empty()),
        logo_url: None,
        created_at: now,
        updated_at: now,
    };
    store.write()?.companies.push(company.clone());
    Ok(HttpResponse::Ok().json(company))
}

pub async fn get_company(
    store: web::Data<Store>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let company_id = path.into_inner();
    let state = store.read()?;
    let company = state
        .companies
        .iter()
        .find(|c| c.id == company_id)
        .ok_or(ApiError::NotFound)?;

    let reviews: Vec<serde_json::Value> = state
        .reviews
        .iter()
        .filter(|r| r.company_id == company_id)
        .map(|r| review_with_author(&state, r))
        .collect();
    let average_rating = if reviews.is_empty() {
        0.0
    } else {
        state
            .reviews
            .iter()
            .filter(|r| r.company_id == company_id)
            .map(|r| f64::from(r.rating))
            .sum::<f64>()
            / reviews.len() as f64
    };
    let locations: Vec<_> = state
        .company_locations
        .iter()
        .filter(|l| l.company_id == company_id)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "company": company,
        "reviews": reviews,
        "review_count": reviews.len(),
        "average_rating": average_rating,
        "locations": locations,
    })))
}
