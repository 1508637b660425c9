use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The authenticated user, or null for anonymous requests
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.try_auth_user().map(User::from)
    }
}
