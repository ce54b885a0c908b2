//! Identity lifecycle: registration, authentication and profile updates.
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use gather_repository::{IdentityRepository, IdentityRepositoryError};
use gather_shared::types::{Identity, IdentityId, Username};
use tracing::{debug, info, instrument};

use crate::auth::{require_private_access, require_viewer};
use crate::context::RequestContext;
use crate::errors::DomainError;
use crate::password::PasswordHasher;

/// Fields for a new registration.
///
/// `Debug` output omits the password.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    /// Defaults to the empty string when absent.
    pub email: Option<String>,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Requested profile changes; `None` fields stay as they are.
///
/// `Debug` output omits both password fields.
#[derive(Clone, Default)]
pub struct ProfileUpdate {
    /// Must verify against the stored digest before anything changes.
    pub current_password: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Identity lifecycle operations.
pub struct AccountService {
    identities: Arc<dyn IdentityRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Creates a new `AccountService`.
    ///
    /// # Arguments
    ///
    /// * `identities` - The identity store; must be the same store the
    ///   request contexts read through, or cache and writes will disagree.
    /// * `hasher` - The password hashing strategy.
    pub fn new(identities: Arc<dyn IdentityRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { identities, hasher }
    }

    /// Registers a new identity, or signs the session in when the name and
    /// password both match an existing one.
    ///
    /// Matching credentials turn the call into a login (without the
    /// permanent-session hint); an existing name with a different password
    /// is the duplicate error. Note the earlier absence lookup stays
    /// memoized: within this same request the fresh identity still
    /// resolves to nothing, exactly as if another client had registered it
    /// concurrently.
    #[instrument(skip_all, fields(username = %account.username))]
    pub async fn register(
        &self,
        ctx: &mut RequestContext,
        account: NewAccount,
    ) -> Result<Identity, DomainError> {
        if let Some(existing) = ctx.identity_by_username(&account.username).await? {
            if self.hasher.verify(&account.password, &existing.password_digest) {
                ctx.session_mut().set_username(existing.username.as_str());
                info!(username = %existing.username, "registration matched existing credentials, signing in");
                return Ok(existing);
            }
            return Err(DomainError::DuplicateUsername(
                "A user with that name already exists",
            ));
        }

        validate_username_format(&account.username)?;
        validate_new_password(&account.password)?;

        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::random(),
            username: Username::new(account.username),
            email: account.email.unwrap_or_default(),
            password_digest: self.hasher.hash(&account.password)?,
            created_at: now,
            updated_at: now,
        };

        match self.identities.insert(&identity).await {
            Ok(()) => {}
            // Lost a registration race for the same name.
            Err(IdentityRepositoryError::DuplicateUsername(_)) => {
                return Err(DomainError::DuplicateUsername(
                    "A user with that name already exists",
                ));
            }
            Err(e) => return Err(e.into()),
        }

        ctx.session_mut().set_username(identity.username.as_str());
        info!(username = %identity.username, id = %identity.id, "identity registered");
        Ok(identity)
    }

    /// Verifies credentials and signs the session in, marking it permanent.
    ///
    /// Unknown usernames and wrong passwords produce the same error; the
    /// caller never learns which one it was.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        password: &str,
    ) -> Result<Identity, DomainError> {
        let identity = match ctx.identity_by_username(username).await? {
            Some(identity) if self.hasher.verify(password, &identity.password_digest) => identity,
            _ => return Err(DomainError::NotFound("User not found")),
        };

        ctx.session_mut().make_permanent();
        ctx.session_mut().set_username(identity.username.as_str());
        info!(username = %identity.username, "session authenticated");
        Ok(identity)
    }

    /// Signs the session out. Idempotent.
    pub fn logout(&self, ctx: &mut RequestContext) {
        ctx.session_mut().clear_username();
        debug!("session signed out");
    }

    /// Applies profile changes to the signed-in identity.
    ///
    /// The current password gates every change. A rename re-validates the
    /// new name (excluding the identity itself, so re-casing one's own
    /// name passes) and the session follows the rename once it persists.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        ctx: &mut RequestContext,
        update: ProfileUpdate,
    ) -> Result<Identity, DomainError> {
        let mut identity = require_viewer(ctx, "Anonymous users can't save settings").await?;

        if !self
            .hasher
            .verify(&update.current_password, &identity.password_digest)
        {
            return Err(DomainError::BadCredentials);
        }

        let mut renamed = false;
        if let Some(username) = update.username {
            if username != identity.username.as_str() {
                validate_username_format(&username)?;
                self.ensure_username_free(ctx, &username, identity.id)
                    .await?;
                identity.username = Username::new(username);
                renamed = true;
            }
        }
        if let Some(password) = update.password {
            validate_new_password(&password)?;
            identity.password_digest = self.hasher.hash(&password)?;
        }
        if let Some(email) = update.email {
            identity.email = email;
        }
        identity.updated_at = Utc::now();

        match self.identities.update(&identity).await {
            Ok(()) => {}
            // Lost a rename race for the same name.
            Err(IdentityRepositoryError::DuplicateUsername(_)) => {
                return Err(DomainError::DuplicateUsername(
                    "Another user with that name already exists",
                ));
            }
            Err(e) => return Err(e.into()),
        }

        if renamed {
            ctx.session_mut().set_username(identity.username.as_str());
        }
        info!(username = %identity.username, id = %identity.id, "profile updated");
        Ok(identity)
    }

    /// Resolver for the user query.
    ///
    /// A named lookup needs a signed-in viewer and returns `Ok(None)` when
    /// the name matches nobody; without a name the viewer itself comes
    /// back (`None` for anonymous sessions).
    pub async fn user(
        &self,
        ctx: &mut RequestContext,
        username: Option<&str>,
    ) -> Result<Option<Identity>, DomainError> {
        match username {
            Some(username) => {
                if ctx.resolve_viewer().await?.is_none() {
                    return Err(DomainError::Unauthenticated(
                        "Anonymous users can't view other users",
                    ));
                }
                Ok(ctx.identity_by_username(username).await?)
            }
            None => Ok(ctx.resolve_viewer().await?),
        }
    }

    /// Releases `subject`'s email to its owner only.
    pub async fn email_of(
        &self,
        ctx: &mut RequestContext,
        subject: &Identity,
    ) -> Result<String, DomainError> {
        require_private_access(ctx, subject).await?;
        Ok(subject.email.clone())
    }

    /// Duplicate check for a rename, excluding the identity itself.
    async fn ensure_username_free(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        me: IdentityId,
    ) -> Result<(), DomainError> {
        if let Some(existing) = ctx.identity_by_username(username).await? {
            if existing.id != me {
                return Err(DomainError::DuplicateUsername(
                    "Another user with that name already exists",
                ));
            }
        }
        Ok(())
    }
}

fn validate_username_format(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::InvalidUsername("Username is required"));
    }
    if username.chars().count() >= 32 {
        return Err(DomainError::InvalidUsername(
            "Username needs to be less than 32 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(DomainError::InvalidUsername(
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::InvalidPassword);
    }
    Ok(())
}
