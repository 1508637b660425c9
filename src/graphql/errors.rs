//! Typed resolver errors
//!
//! Each variant maps to a stable `extensions.code` so clients can tell bad
//! input apart from missing credentials and server faults.

use std::fmt::Display;

use async_graphql::{Error, ErrorExtensions, Value};
use thiserror::Error;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected input or a failed write; carries the offending arguments
    #[error("{message}")]
    UserInput { message: String, invalid_args: Value },

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn user_input(message: impl Display, invalid_args: serde_json::Value) -> Self {
        Self::UserInput {
            message: message.to_string(),
            invalid_args: Value::from_json(invalid_args).unwrap_or(Value::Null),
        }
    }

    pub fn not_authenticated() -> Self {
        Self::Authentication("not authenticated".to_string())
    }

    pub fn internal(err: impl Display) -> Self {
        tracing::error!(error = %err, "Resolver failed");
        Self::Internal(err.to_string())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UserInput { .. } => BAD_USER_INPUT,
            Self::Authentication(_) => UNAUTHENTICATED,
            Self::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Self::UserInput { invalid_args, .. } = self {
                e.set("invalidArgs", invalid_args.clone());
            }
        })
    }
}
