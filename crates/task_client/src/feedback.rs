//! Maps classified failures to user-presentable prose.
//!
//! This is the only place technical failures become copy. The mapping is
//! total: every error and every context, including the empty one, yields a
//! non-empty string.

use crate::error::ClientError;

/// Convert a dispatcher failure into a message fit for a toast or an inline
/// error. `context` is a short operation tag ("task", "tag", "comment",
/// "user" or a gerund phrase like "loading tasks") used to pick specific
/// wording where the server message alone is too generic.
pub fn user_facing_message(error: &ClientError, context: &str) -> String {
    match error {
        ClientError::Network(_) => {
            "Unable to connect to the server. Please check your internet connection and try again."
                .to_string()
        }
        ClientError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
        ClientError::RateLimited { .. } => {
            "You're making too many requests. Please wait a moment and try again.".to_string()
        }
        // Field-check messages are already written for the user.
        ClientError::Validation(message) => message.clone(),
        ClientError::Api(message) => api_message(message, context),
    }
}

fn api_message(message: &str, context: &str) -> String {
    if message.contains("Token has expired") {
        return "Your session has expired. Please log in again.".to_string();
    }
    if message.contains("Authorization required") {
        return "Please log in to access this feature.".to_string();
    }
    if message.contains("Invalid credentials") {
        return "Incorrect email or password. Please try again.".to_string();
    }
    if message.contains("Admin privileges required") {
        return "You need administrator privileges to perform this action.".to_string();
    }
    if message.contains("permission") {
        return "You don't have permission to perform this action.".to_string();
    }
    if message.contains("already exists") {
        return match context {
            "tag" => "A tag with this name already exists. Please choose a different name.",
            "user" => "This email or username is already registered.",
            _ => "This item already exists. Please choose a different name.",
        }
        .to_string();
    }
    if message.contains("Rate limit exceeded") {
        return "You're making too many requests. Please wait a moment and try again.".to_string();
    }
    if message.contains("not found") {
        return match context {
            "task" => "This task no longer exists. It may have been deleted.",
            "tag" => "This tag no longer exists.",
            "comment" => "This comment no longer exists.",
            _ => "The requested item could not be found.",
        }
        .to_string();
    }
    if context.is_empty() {
        "Something went wrong. Please try again.".to_string()
    } else {
        format!("Something went wrong while {context}. Please try again.")
    }
}
