//! User mutations: account creation and login
//!
//! Neither mutation requires authentication.

use crate::services::{AuthError, AuthService};

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create a user. Without `password` the configured default password is used.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
        password: Option<String>,
    ) -> Result<Option<User>> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth
            .create_user(&username, &favorite_genre, password.as_deref())
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User created");
                Ok(Some(User::from(user)))
            }
            Err(AuthError::Hashing(e)) => Err(ApiError::internal(e).extend()),
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "User creation failed");
                Err(ApiError::user_input(
                    e,
                    json!({ "username": username, "favoriteGenre": favorite_genre }),
                )
                .extend())
            }
        }
    }

    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.login(&username, &password).await {
            Ok(value) => {
                tracing::info!(username = %username, "User logged in");
                Ok(Some(Token { value }))
            }
            Err(AuthError::WrongCredentials) => {
                tracing::warn!(username = %username, "Login failed");
                Err(ApiError::user_input("wrong credentials", json!({ "username": username }))
                    .extend())
            }
            Err(e) => Err(ApiError::internal(e).extend()),
        }
    }
}
