//! Conversation commands.

use anyhow::{Result, bail};

use tomo_application::{AppController, Screen};
use tomo_core::chat::MessageRole;

/// Sends one message in the active conversation (restored from the
/// persisted state) and prints the assistant's reply.
pub async fn send(controller: &AppController, message: &str) -> Result<()> {
    if controller.startup().await? == Screen::Login {
        bail!("not signed in; run `tomo login` first");
    }

    controller.send(message).await?;

    let messages = controller.messages().await;
    match messages.iter().rev().find(|m| m.role == MessageRole::Assistant) {
        Some(reply) => println!("{}", reply.text),
        None => println!("(no reply)"),
    }

    if let Some(session_id) = controller.active_session_id().await {
        tracing::debug!(%session_id, "conversation persisted");
    }
    Ok(())
}

/// Drops back to a fresh draft conversation.
pub async fn new_session(controller: &AppController) -> Result<()> {
    controller.new_session().await?;
    println!("Started a new conversation");
    Ok(())
}

pub async fn list_sessions(controller: &AppController) -> Result<()> {
    let sessions = controller.refresh_sessions().await?;
    if sessions.is_empty() {
        println!("No conversations yet");
        return Ok(());
    }

    let active = controller.active_session_id().await;
    for session in sessions {
        let marker = if active.as_deref() == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {}  {}",
            marker,
            session.id,
            session.timestamp.format("%Y-%m-%d %H:%M"),
            session.last_message
        );
    }
    Ok(())
}

pub async fn delete_session(controller: &AppController, session_id: &str) -> Result<()> {
    controller.delete_session(session_id).await?;
    println!("Deleted conversation {session_id}");
    Ok(())
}
