use crate::{auth::CurrentUser, config::Config, errors::ApiError, messaging, store::Store};
use crate::models::message::Message;
use crate::models::profile::ProfileSnapshot;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

pub async fn list_conversations(
    store: web::Data<Store>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let state = store.read()?;
    let visible: Vec<Message> = state
        .messages
        .iter()
        .filter(|m| m.sender_id == user.user_id || m.receiver_id == user.user_id)
        .cloned()
        .collect();
    let conversations = messaging::aggregate_conversations(&visible, &user.user_id);
    Ok(HttpResponse::Ok().json(conversations))
}

/// Opening a thread is what marks it read, like selecting a conversation
/// in the UI. Requesting it again changes nothing.
pub async fn get_thread(
    store: web::Data<Store>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let counterpart_id = path.into_inner();
    let mut state = store.write()?;
    let counterpart: ProfileSnapshot = state
        .profiles
        .iter()
        .find(|p| p.id == counterpart_id)
        .map(ProfileSnapshot::from)
        .ok_or(ApiError::NotFound)?;

    let marked = messaging::mark_thread_read(&mut state.messages, &user.user_id, &counterpart_id);
    if marked > 0 {
        log::debug!(
            "marked {marked} messages from {counterpart_id} as read for {}",
            user.user_id
        );
    }

    let visible: Vec<Message> = state
        .messages
        .iter()
        .filter(|m| m.sender_id == user.user_id || m.receiver_id == user.user_id)
        .cloned()
        .collect();
    let thread = messaging::thread_with(&visible, &counterpart_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "counterpart": counterpart,
        "messages": thread,
    })))
}

#[derive(Deserialize)]
pub struct SendMessageReq {
    pub content: String,
}

pub async fn send_message(
    cfg: web::Data<Config>,
    store: web::Data<Store>,
    user: CurrentUser,
    path: web::Path<String>,
    body: web::Json<SendMessageReq>,
) -> Result<HttpResponse, ApiError> {
    let counterpart_id = path.into_inner();
    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("message content required".into()));
    }

    let (sender, receiver) = {
        let state = store.read()?;
        let receiver = state
            .profiles
            .iter()
            .find(|p| p.id == counterpart_id)
            .map(ProfileSnapshot::from)
            .ok_or(ApiError::NotFound)?;
        let sender = state
            .profiles
            .iter()
            .find(|p| p.id == user.user_id)
            .map(ProfileSnapshot::from);
        (sender, receiver)
    };

    cfg.simulate_latency().await;

    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: user.user_id.clone(),
        receiver_id: counterpart_id,
        content: content.to_string(),
        is_read: false,
        created_at: chrono::Utc::now(),
        sender,
        receiver: Some(receiver),
    };
    store.write()?.messages.push(message.clone());
    Ok(HttpResponse::Ok().json(message))
}
