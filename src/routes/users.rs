use crate::{
    auth,
    auth::CurrentUser,
    config::Config,
    errors::ApiError,
    store::{State, Store},
};
use crate::models::profile::Profile;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

fn profile_with_tags(state: &State, profile: &Profile) -> serde_json::Value {
    let tags: Vec<&str> = state
        .user_tags
        .iter()
        .filter(|t| t.user_id == profile.id)
        .map(|t| t.tag.as_str())
        .collect();
    serde_json::json!({
        "id": profile.id,
        "email": profile.email,
        "full_name": profile.full_name,
        "student_id": profile.student_id,
        "department": profile.department,
        "faculty": profile.faculty,
        "graduation_year": profile.graduation_year,
        "is_alumni": profile.is_alumni,
        "bio": profile.bio,
        "location": profile.location,
        "avatar_url": profile.avatar_url,
        "points": profile.points,
        "created_at": profile.created_at,
        "updated_at": profile.updated_at,
        "tags": tags,
    })
}

pub async fn me(store: web::Data<Store>, user: CurrentUser) -> Result<HttpResponse, ApiError> {
    let state = store.read()?;
    let profile = state
        .profiles
        .iter()
        .find(|p| p.id == user.user_id)
        .ok_or(ApiError::NotFound)?;

    let messages_count = state
        .messages
        .iter()
        .filter(|m| m.sender_id == user.user_id || m.receiver_id == user.user_id)
        .count();
    let unread_count = state
        .messages
        .iter()
        .filter(|m| m.receiver_id == user.user_id && !m.is_read)
        .count();

    let mut body = profile_with_tags(&state, profile);
    body["messages_count"] = serde_json::json!(messages_count);
    body["unread_count"] = serde_json::json!(unread_count);
    Ok(HttpResponse::Ok().json(body))
}

#[derive(Deserialize)]
pub struct UpdateMeReq {
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub graduation_year: Option<i32>,
    pub is_alumni: Option<bool>,
    pub bio: Option<String>,
    pub location: Option<String>,
    /// Replaces the whole tag list when present.
    pub tags: Option<Vec<String>>,
}

pub async fn update_me(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    user: CurrentUser,
    body: web::Json<UpdateMeReq>,
) -> Result<HttpResponse, ApiError> {
    cfg.simulate_latency().await;

    let now = chrono::Utc::now();
    {
        let mut state = store.write()?;
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == user.user_id)
            .ok_or(ApiError::NotFound)?;

        // Provided text fields overwrite; blank means cleared.
        let text = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        if body.full_name.is_some() {
            profile.full_name = text(&body.full_name);
        }
        if body.student_id.is_some() {
            profile.student_id = text(&body.student_id);
        }
        if body.department.is_some() {
            profile.department = text(&body.department);
        }
        if body.faculty.is_some() {
            profile.faculty = text(&body.faculty);
        }
        if body.bio.is_some() {
            profile.bio = text(&body.bio);
        }
        if body.location.is_some() {
            profile.location = text(&body.location);
        }
        if let Some(year) = body.graduation_year {
            profile.graduation_year = Some(year);
        }
        if let Some(is_alumni) = body.is_alumni {
            profile.is_alumni = is_alumni;
        }
        profile.updated_at = now;

        if let Some(tags) = &body.tags {
            state.user_tags.retain(|t| t.user_id != user.user_id);
            for tag in tags {
                if tag.trim().is_empty() {
                    continue;
                }
                state.user_tags.push(crate::models::profile::UserTag {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user.user_id.clone(),
                    tag: tag.trim().to_string(),
                    created_at: now,
                });
            }
        }
    }

    me(store, user).await
}

#[derive(Deserialize)]
pub struct ChangePasswordReq {
    pub new_password: String,
    pub confirm_password: String,
}

// Demo only: validates the form, stores nothing.
pub async fn change_password(
    cfg: web::Data<Config>,
    _user: CurrentUser,
    body: web::Json<ChangePasswordReq>,
) -> Result<HttpResponse, ApiError> {
    if body.new_password != body.confirm_password {
        return Err(ApiError::BadRequest("passwords do not match".into()));
    }
    auth::validate_password(&body.new_password)?;
    cfg.simulate_latency().await;
    Ok(HttpResponse::Ok().finish())
}

#[derive(Deserialize)]
pub struct UserSearchQuery {
    pub q: Option<String>,
    pub department: Option<String>,
    /// Comma-separated; any listed tag qualifies a profile.
    pub tags: Option<String>,
}

const TAG_CURRENT_STUDENT: &str = "現役生";
const TAG_ALUMNI: &str = "OB/OG";

pub async fn list_users(
    store: web::Data<Store>,
    user: CurrentUser,
    q: web::Query<UserSearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let state = store.read()?;
    let needle = q.q.as_deref().unwrap_or("").trim().to_lowercase();
    let department = q.department.as_deref().unwrap_or("").trim();
    let tags: Vec<&str> = q
        .tags
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let contains = |field: &Option<String>, needle: &str| {
        field
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(needle))
    };

    let results: Vec<serde_json::Value> = state
        .profiles
        .iter()
        .filter(|p| p.id != user.user_id)
        .filter(|p| {
            needle.is_empty()
                || contains(&p.full_name, &needle)
                || contains(&p.department, &needle)
                || contains(&p.faculty, &needle)
                || contains(&p.location, &needle)
        })
        .filter(|p| {
            tags.is_empty()
                || tags.iter().any(|tag| match *tag {
                    TAG_CURRENT_STUDENT => !p.is_alumni,
                    TAG_ALUMNI => p.is_alumni,
                    other => state
                        .user_tags
                        .iter()
                        .any(|t| t.user_id == p.id && t.tag == other),
                })
        })
        .filter(|p| {
            department.is_empty()
                || p.department
                    .as_deref()
                    .is_some_and(|d| d.contains(department))
        })
        .map(|p| profile_with_tags(&state, p))
        .collect();

    Ok(HttpResponse::Ok().json(results))
}

pub async fn get_user(
    store: web::Data<Store>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let state = store.read()?;
    let profile = state
        .profiles
        .iter()
        .find(|p| p.id == user_id)
        .ok_or(ApiError::NotFound)?;

    // The user's reviews with the company fields the profile page shows.
    let reviews: Vec<serde_json::Value> = state
        .reviews
        .iter()
        .filter(|r| r.user_id == user_id)
        .map(|r| {
            let company = state
                .companies
                .iter()
                .find(|c| c.id == r.company_id)
                .map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "industry": c.industry,
                    })
                });
            serde_json::json!({
                "id": r.id,
                "review_type": r.review_type,
                "title": r.title,
                "rating": r.rating,
                "created_at": r.created_at,
                "companies": company,
            })
        })
        .collect();

    let mut body = profile_with_tags(&state, profile);
    body["reviews"] = serde_json::json!(reviews);
    Ok(HttpResponse::Ok().json(body))
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

    async fn search(uri: &str) -> Vec<serde_json::Value> {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store)
                .route("/users", web::get().to(list_users)),
        )
        .await;
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_and_read_body_json(&app, req).await
    }

    #[actix_web::test]
    async fn listing_excludes_the_requesting_user() {
        let users = search("/users").await;
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u["id"] != "demo-user-1"));
    }

    #[actix_web::test]
    async fn alumni_pseudo_tag_matches_alumni_flag() {
        let users = search("/users?tags=OB/OG").await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], "user-1");

        let users = search("/users?tags=%E7%8F%BE%E5%BD%B9%E7%94%9F").await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], "user-2");
    }

    #[actix_web::test]
    async fn plain_tags_match_the_tag_rows() {
        // ES通過 is on both seeded users
        let users = search("/users?tags=ES%E9%80%9A%E9%81%8E").await;
        assert_eq!(users.len(), 2);
        // 面接経験 only on user-1
        let users = search("/users?tags=%E9%9D%A2%E6%8E%A5%E7%B5%8C%E9%A8%93").await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], "user-1");
    }

    #[actix_web::test]
    async fn keyword_searches_name_and_location() {
        let users = search("/users?q=%E5%B1%B1%E7%94%B0").await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], "user-1");

        let users = search("/users?q=%E7%A6%8F%E5%B2%A1").await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["id"], "user-2");
    }

    #[actix_web::test]
    async fn me_includes_message_stats() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store)
                .route("/users/me", web::get().to(me)),
        )
        .await;
        let req = test::TestRequest::get().uri("/users/me").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "demo-user-1");
        assert_eq!(body["messages_count"], 2);
        assert_eq!(body["unread_count"], 0);
    }

    #[actix_web::test]
    async fn update_me_overwrites_fields_and_replaces_tags() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store.clone())
                .route("/users/me", web::patch().to(update_me)),
        )
        .await;
        let req = test::TestRequest::patch()
            .uri("/users/me")
            .set_json(serde_json::json!({
                "bio": "組込みエンジニア志望です",
                "tags": ["インターン参加"],
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["bio"], "組込みエンジニア志望です");
        assert_eq!(body["tags"], serde_json::json!(["インターン参加"]));

        let state = store.read().unwrap();
        let tags: Vec<_> = state
            .user_tags
            .iter()
            .filter(|t| t.user_id == "demo-user-1")
            .collect();
        assert_eq!(tags.len(), 1);
    }

    #[actix_web::test]
    async fn password_change_requires_matching_confirmation() {
        let (cfg, store) = test_app_data();
        let app = test::init_service(
            App::new()
                .app_data(cfg)
                .app_data(store)
                .route("/users/me/password", web::put().to(change_password)),
        )
        .await;
        let req = test::TestRequest::put()
            .uri("/users/me/password")
            .set_json(serde_json::json!({
                "new_password": "secret1",
                "confirm_password": "secret2",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
