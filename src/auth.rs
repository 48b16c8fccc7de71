use crate::config::Config;
use crate::errors::ApiError;
use crate::store::Store;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, err, ok};

// Demo sessions: opaque tokens in the in-memory store, no credentials kept.

pub fn validate_email(email: &str, cfg: &Config) -> Result<(), ApiError> {
    if !email.ends_with(&cfg.email_domain) {
        return Err(ApiError::BadRequest(format!(
            "email must end with {}",
            cfg.email_domain
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::BadRequest(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

pub fn create_session(store: &Store, user_id: &str) -> Result<String, ApiError> {
    let token = uuid::Uuid::new_v4().to_string();
    store
        .write()?
        .sessions
        .insert(token.clone(), user_id.to_string());
    Ok(token)
}

pub fn drop_session(store: &Store, token: &str) -> Result<bool, ApiError> {
    Ok(store.write()?.sessions.remove(token).is_some())
}

/// The identity a request acts as. Resolved from the presented session
/// token; requests without one fall back to the configured demo user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let cfg = req.app_data::<actix_web::web::Data<Config>>().unwrap();
        let store = req.app_data::<actix_web::web::Data<Store>>().unwrap();
        if let Some(h) = req.headers().get("Authorization") {
            if let Ok(s) = h.to_str() {
                if let Some(token) = s.strip_prefix("Bearer ") {
                    let state = match store.read() {
                        Ok(state) => state,
                        Err(e) => return err(e),
                    };
                    return match state.sessions.get(token) {
                        Some(user_id) => ok(CurrentUser {
                            user_id: user_id.clone(),
                        }),
                        None => err(ApiError::Unauthorized),
                    };
                }
            }
        }
        ok(CurrentUser {
            user_id: cfg.demo_user_id.clone(),
        })
    }
}
