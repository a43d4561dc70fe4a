use async_graphql::{Context, Object, Result};

use crate::{
    auth::{self, AuthGuard, AuthUser, TokenService},
    error::DomainError,
    models::{
        Account, CoreOutput, CreateAccountInput, CreateAccountOutput, EditProfileInput,
        LoginInput, LoginOutput, SeeProfileOutput,
    },
    repository::RepositoryState,
};

/// UserQuery
///
/// Account-facing queries: the caller's own profile and lookups of other
/// accounts by id.
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated caller's own account. Guarded: an anonymous request
    /// is rejected before this resolver runs.
    #[graphql(guard = "AuthGuard")]
    async fn me(&self, ctx: &Context<'_>) -> Result<Account> {
        let user = ctx.data_unchecked::<AuthUser>();
        let repo = ctx.data_unchecked::<RepositoryState>();
        // The guard proved a token resolved to an account when the request
        // arrived; the record could still have vanished since.
        repo.get_account(user.id)
            .await
            .ok_or_else(|| async_graphql::Error::new(DomainError::UserNotFound.to_string()))
    }

    /// Looks up any account's public profile by id.
    async fn see_profile(&self, ctx: &Context<'_>, user_id: i64) -> SeeProfileOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        match repo.get_account(user_id).await {
            Some(user) => SeeProfileOutput {
                ok: true,
                error: None,
                user: Some(user),
            },
            None => SeeProfileOutput {
                ok: false,
                error: Some(DomainError::UserNotFound.to_string()),
                user: None,
            },
        }
    }
}

/// UserMutation
///
/// Account lifecycle: registration, login, profile edits.
#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Registers a new account. The password is hashed before it reaches the
    /// store; a duplicate email is a domain failure inside the envelope.
    async fn create_account(
        &self,
        ctx: &Context<'_>,
        input: CreateAccountInput,
    ) -> CreateAccountOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();

        let password_hash = match auth::hash_password(&input.password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("password hashing failed: {:?}", e);
                return CreateAccountOutput {
                    ok: false,
                    error: Some("Could not create account".to_string()),
                };
            }
        };

        match repo
            .create_account(input.email, password_hash, input.role)
            .await
        {
            Ok(id) => {
                tracing::info!(account_id = id, "account created");
                CreateAccountOutput {
                    ok: true,
                    error: None,
                }
            }
            Err(e) => CreateAccountOutput {
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Verifies credentials and issues a session token. The failure message is
    /// the same whether the email is unknown or the password is wrong.
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> LoginOutput {
        let repo = ctx.data_unchecked::<RepositoryState>();
        let tokens = ctx.data_unchecked::<TokenService>();

        let account = match repo.find_account_by_email(&input.email).await {
            Some(account) => account,
            None => return LoginOutput::invalid_credentials(),
        };

        if !auth::verify_password(&input.password, &account.password_hash) {
            return LoginOutput::invalid_credentials();
        }

        match tokens.issue(account.id) {
            Ok(token) => LoginOutput {
                ok: true,
                error: None,
                token: Some(token),
            },
            Err(e) => {
                tracing::error!("token signing failed: {:?}", e);
                LoginOutput {
                    ok: false,
                    error: Some("Could not log in".to_string()),
                    token: None,
                }
            }
        }
    }

    /// Partial update of the caller's own profile. Only supplied fields
    /// change; a new password is re-hashed, a new email re-checked for
    /// uniqueness. Guarded.
    #[graphql(guard = "AuthGuard")]
    async fn edit_profile(&self, ctx: &Context<'_>, input: EditProfileInput) -> CoreOutput {
        let user = ctx.data_unchecked::<AuthUser>();
        let repo = ctx.data_unchecked::<RepositoryState>();

        let password_hash = match input.password {
            Some(password) => match auth::hash_password(&password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    tracing::error!("password hashing failed: {:?}", e);
                    return CoreOutput {
                        ok: false,
                        error: Some("Could not update profile".to_string()),
                    };
                }
            },
            None => None,
        };

        repo.update_account(user.id, input.email, password_hash)
            .await
            .into()
    }
}

impl LoginOutput {
    fn invalid_credentials() -> Self {
        Self {
            ok: false,
            error: Some(DomainError::InvalidCredentials.to_string()),
            token: None,
        }
    }
}
