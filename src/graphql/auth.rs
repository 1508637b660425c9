//! GraphQL authentication context
//!
//! The HTTP handler resolves the bearer token once per request and stores the
//! matching user as [`CurrentUser`] request data. Resolvers read it through
//! [`AuthExt`]; protected mutations use [`AuthGuard`].
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn protected_mutation(&self, ctx: &Context<'_>) -> Result<Book> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};

use crate::db::UserRecord;
use crate::services::{AuthError, AuthService};

use super::errors::ApiError;

/// The user a request was authenticated as
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Strip a case-insensitive `Bearer ` prefix from an Authorization header value
pub fn bearer_token(header: &str) -> Option<&str> {
    const PREFIX: &str = "bearer ";
    header
        .get(..PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(PREFIX))
        .map(|_| header[PREFIX.len()..].trim())
}

/// Resolve the Authorization header to a user.
///
/// No header, or a header without a bearer prefix, is an anonymous request.
/// A bearer token that fails verification is an error.
pub async fn resolve_current_user(
    auth: &AuthService,
    authorization: Option<&str>,
) -> Result<Option<CurrentUser>, AuthError> {
    let Some(token) = authorization.and_then(bearer_token) else {
        return Ok(None);
    };

    let user = auth.user_for_token(token).await?;
    tracing::debug!(user_id = %user.id, "Request authenticated");
    Ok(Some(CurrentUser(user)))
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or an authentication error
    fn auth_user(&self) -> Result<&UserRecord>;

    /// Get the authenticated user if present
    fn try_auth_user(&self) -> Option<&UserRecord>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&UserRecord> {
        self.try_auth_user()
            .ok_or_else(|| ApiError::not_authenticated().extend())
    }

    fn try_auth_user(&self) -> Option<&UserRecord> {
        self.data_opt::<CurrentUser>().map(|current| &current.0)
    }
}

/// Guard that requires authentication for GraphQL operations.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().map(|_| ());
        async move { result }
    }
}
