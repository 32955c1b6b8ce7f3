//! HTTP implementation of the chat service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tomo_core::chat::{ChatMessage, ChatReply, ChatService, ChatSession, MessageRole};
use tomo_core::error::Result;

use crate::client::ApiClient;
use crate::wire::parse_timestamp;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
    session_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    response: String,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct SessionRecord {
    session_id: String,
    last_message: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    id: i64,
    role: String,
    content: String,
    created_at: String,
}

fn map_session(record: SessionRecord) -> Result<ChatSession> {
    let timestamp = parse_timestamp(&record.timestamp)?;
    Ok(ChatSession {
        id: record.session_id,
        // The service stores no separate title; the last message doubles
        // as the display title.
        title: record.last_message.clone(),
        last_message: record.last_message,
        timestamp,
    })
}

fn map_message(record: MessageRecord) -> Result<ChatMessage> {
    Ok(ChatMessage {
        id: record.id.to_string(),
        role: MessageRole::from_wire(&record.role)?,
        text: record.content,
        // History replay has no structured citation data.
        citations: Vec::new(),
        timestamp: parse_timestamp(&record.created_at)?,
    })
}

/// Chat service backed by the `/chat` endpoints.
pub struct HttpChatService {
    client: Arc<ApiClient>,
}

impl HttpChatService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<ChatReply> {
        let response = self
            .client
            .post_json(
                "/chat/message",
                &SendMessageRequest {
                    message,
                    session_id,
                },
            )
            .await?;
        let reply: SendMessageResponse = self.client.handle_response(response).await?;
        Ok(ChatReply {
            response: reply.response,
            session_id: reply.session_id,
        })
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let response = self.client.get("/chat/sessions").await?;
        let records: Vec<SessionRecord> = self.client.handle_response(response).await?;
        records.into_iter().map(map_session).collect()
    }

    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let response = self
            .client
            .get(&format!("/chat/sessions/{session_id}/messages"))
            .await?;
        let records: Vec<MessageRecord> = self.client.handle_response(response).await?;
        records.into_iter().map(map_message).collect()
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(&format!("/chat/sessions/{session_id}"))
            .await?;
        self.client.handle_no_content(response).await
    }
}
