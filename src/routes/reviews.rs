use crate::{auth::CurrentUser, config::Config, errors::ApiError, store::Store};
use crate::models::review::{CompanyReview, ReviewType};
use crate::store::State;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

/// Review payload with the author fields the company page renders.
pub(crate) fn review_with_author(state: &State, review: &CompanyReview) -> serde_json::Value {
    let author = state
        .profiles
        .iter()
        .find(|p| p.id == review.user_id)
        .map(|p| {
            serde_json::json!({
                "full_name": p.full_name,
                "department": p.department,
                "graduation_year": p.graduation_year,
                "is_alumni": p.is_alumni,
            })
        });
    serde_json::json!({
        "id": review.id,
        "company_id": review.company_id,
        "user_id": review.user_id,
        "review_type": review.review_type,
        "title": review.title,
        "content": review.content,
        "rating": review.rating,
        "is_online": review.is_online,
        "location": review.location,
        "passed": review.passed,
        "created_at": review.created_at,
        "updated_at": review.updated_at,
        "profiles": author,
    })
}

pub async fn list_reviews(
    store: web::Data<Store>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let company_id = path.into_inner();
    let state = store.read()?;
    if !state.companies.iter().any(|c| c.id == company_id) {
        return Err(ApiError::NotFound);
    }
    let mut reviews: Vec<&CompanyReview> = state
        .reviews
        .iter()
        .filter(|r| r.company_id == company_id)
        .collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let reviews: Vec<serde_json::Value> = reviews
        .into_iter()
        .map(|r| review_with_author(&state, r))
        .collect();
    Ok(HttpResponse::Ok().json(reviews))
}

#[derive(Deserialize)]
pub struct PostReviewReq {
    pub review_type: ReviewType,
    pub title: String,
    pub content: String,
    pub rating: u8,
    pub is_online: Option<bool>,
    pub location: Option<String>,
    pub passed: Option<bool>,
}

pub async fn post_review(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    user: CurrentUser,
    path: web::Path<String>,
    body: web::Json<PostReviewReq>,
) -> Result<HttpResponse, ApiError> {
    let company_id = path.into_inner();
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(ApiError::BadRequest("title and content required".into()));
    }
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::BadRequest("rating must be between 1 and 5".into()));
    }
    if !store.read()?.companies.iter().any(|c| c.id == company_id) {
        return Err(ApiError::NotFound);
    }

    cfg.simulate_latency().await;

    let now = chrono::Utc::now();
    let review = CompanyReview {
        id: uuid::Uuid::new_v4().to_string(),
        company_id,
        user_id: user.user_id,
        review_type: body.review_type,
        title: body.title.trim().to_string(),
        content: body.content.trim().to_string(),
        rating: body.rating,
        is_online: body.is_online,
        location: body.location.clone().filter(|s| !s.trim().is_empty()),
        passed: body.passed,
        created_at: now,
        updated_at: now,
    };
    store.write()?.reviews.push(review.clone());
    Ok(HttpResponse::Ok().json(review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    fn test_app_data() -> (web::Data<Config>, web::Data<Store>) {
        (
            web::Data::new(Config::for_tests()),
            web::Data::new(Store::with_demo_data()),
        )
    }

    #[actix_web::test]
    async fn rating_outside_domain_is_rejected() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store.clone())
                .route("/companies/{id}/reviews", web::post().to(post_review)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/companies/company-1/reviews")
            .set_json(serde_json::json!({
                "review_type": "interview",
                "title": "一次面接",
                "content": "技術面接でした",
                "rating": 6,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        assert_eq!(store.read().unwrap().reviews.len(), 2);
    }

    #[actix_web::test]
    async fn review_for_unknown_company_is_404() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store)
                .route("/companies/{id}/reviews", web::post().to(post_review)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/companies/company-999/reviews")
            .set_json(serde_json::json!({
                "review_type": "general",
                "title": "タイトル",
                "content": "内容",
                "rating": 3,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn posted_review_is_attributed_to_the_demo_user() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store.clone())
                .route("/companies/{id}/reviews", web::post().to(post_review)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/companies/company-3/reviews")
            .set_json(serde_json::json!({
                "review_type": "es",
                "title": "ES対策",
                "content": "志望動機を深掘りされました",
                "rating": 4,
                "passed": true,
            }))
            .to_request();
        let created: CompanyReview = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.user_id, "demo-user-1");
        assert_eq!(created.review_type, ReviewType::Es);
        assert_eq!(store.read().unwrap().reviews.len(), 3);
    }

    #[actix_web::test]
    async fn reviews_are_listed_newest_first() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store)
                .route("/companies/{id}/reviews", web::get().to(list_reviews)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/companies/company-1/reviews")
            .to_request();
        let reviews: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0]["profiles"]["is_alumni"], true);
    }
}
