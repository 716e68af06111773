//! Direct messaging handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fanevent_domain::{ConversationView, Message};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::utils::execute_logged;

#[derive(Debug, Deserialize)]
pub struct OpenConversation {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub body: String,
}

/// Paging for the message list; `before` is a message id cursor.
#[derive(Debug, Default, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub before: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: u32,
}

pub async fn list_conversations(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<ConversationView>>> {
    let conversations =
        execute_logged("messaging::list", || ctx.messaging.list_conversations(&user.actor)).await?;
    Ok(Json(conversations))
}

/// Open (or reuse) the one-to-one conversation with another user.
pub async fn open_conversation(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    ApiJson(body): ApiJson<OpenConversation>,
) -> ApiResult<Json<ConversationView>> {
    let view = execute_logged("messaging::open", || {
        ctx.messaging.open_conversation(&user.actor, &body.user_id)
    })
    .await?;
    Ok(Json(view))
}

pub async fn messages(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiQuery(page): ApiQuery<MessagePage>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = execute_logged("messaging::messages", || {
        ctx.messaging.messages(&user.actor, &id, page.limit, page.before.as_deref())
    })
    .await?;
    Ok(Json(messages))
}

pub async fn send_message(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SendMessage>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let message = execute_logged("messaging::send", || {
        ctx.messaging.send_message(&user.actor, &id, &body.body)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn mark_read(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    execute_logged("messaging::mark_read", || ctx.messaging.mark_read(&user.actor, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unread_count(
    State(ctx): State<Arc<AppContext>>,
    user: CurrentUser,
) -> ApiResult<Json<UnreadCount>> {
    let unread =
        execute_logged("messaging::unread", || ctx.messaging.unread_total(&user.actor)).await?;
    Ok(Json(UnreadCount { unread }))
}
