/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `tasks`: The caller's own tasks
/// - `admin`: Administrator surface over all users and tasks

use serde::{Deserialize, Serialize};

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

/// Confirmation body for delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
