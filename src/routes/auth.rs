use crate::{auth, config::Config, errors::ApiError, store::Store};
use crate::models::profile::Profile;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct SignupReq {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
pub struct AuthResp {
    token: String,
    user_id: String,
    email: String,
}

pub async fn signup(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    body: web::Json<SignupReq>,
) -> Result<HttpResponse, ApiError> {
    auth::validate_email(&body.email, &cfg)?;
    auth::validate_password(&body.password)?;
    if body.password != body.confirm_password {
        return Err(ApiError::BadRequest("passwords do not match".into()));
    }

    cfg.simulate_latency().await;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    {
        let mut state = store.write()?;
        if state.profiles.iter().any(|p| p.email == body.email) {
            return Err(ApiError::Conflict("email already registered".into()));
        }
        state.profiles.push(Profile {
            id: user_id.clone(),
            email: body.email.clone(),
            full_name: body.email.split('@').next().map(str::to_string),
            student_id: None,
            department: None,
            faculty: None,
            graduation_year: None,
            is_alumni: false,
            bio: None,
            location: None,
            avatar_url: None,
            points: 0,
            created_at: now,
            updated_at: now,
        });
    }

    let token = auth::create_session(&store, &user_id)?;
    Ok(HttpResponse::Ok().json(AuthResp {
        token,
        user_id,
        email: body.email.clone(),
    }))
}

#[derive(Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

pub async fn login(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    body: web::Json<LoginReq>,
) -> Result<HttpResponse, ApiError> {
    auth::validate_email(&body.email, &cfg)?;
    auth::validate_password(&body.password)?;

    cfg.simulate_latency().await;

    // Any valid-looking login works; unknown addresses land on the demo
    // identity.
    let user_id = {
        let state = store.read()?;
        state
            .profiles
            .iter()
            .find(|p| p.email == body.email)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| cfg.demo_user_id.clone())
    };

    let token = auth::create_session(&store, &user_id)?;
    Ok(HttpResponse::Ok().json(AuthResp {
        token,
        user_id,
        email: body.email.clone(),
    }))
}

#[derive(Deserialize)]
pub struct LogoutReq {
    pub token: String,
}

pub async fn logout(
    store: web::Data<Store>,
    body: web::Json<LogoutReq>,
) -> Result<HttpResponse, ApiError> {
    if !auth::drop_session(&store, &body.token)? {
        return Err(ApiError::NotFound);
    }
    Ok(HttpResponse::Ok().finish())
}
