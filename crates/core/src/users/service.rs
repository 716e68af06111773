//! User profile service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{
    EmailValidator, FieldValidator, StringValidator, UrlValidator, ValidationError,
};
use fanevent_domain::constants::{BIO_MAX_LENGTH, DEFAULT_PAGE_SIZE, DISPLAY_NAME_MAX_LENGTH};
use fanevent_domain::{
    new_id, FanEventError, IdentityClaims, ProfileUpdate, PublicProfile, Result, Role,
    UserProfile,
};
use tracing::{debug, info};

use super::ports::UserRepository;
use crate::access::Actor;
use crate::validation::{clean_optional, ensure_valid, page_size};

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create or refresh the local profile for a verified identity and
    /// return the caller.
    ///
    /// The stored role is never lowered here; the effective role is the
    /// higher of the stored role and the role carried by the token. The
    /// token's name and picture only fill a profile field that is unset.
    pub async fn sync_from_identity(
        &self,
        claims: &IdentityClaims,
    ) -> Result<(Actor, UserProfile)> {
        if EmailValidator::new().validate(claims.email.as_str()).is_err() {
            return Err(FanEventError::Auth("token email is not a valid address".into()));
        }

        let now = Utc::now();
        let profile = match self.users.get_by_subject(&claims.subject).await? {
            Some(mut existing) => {
                // Token name/picture only seed empty fields; edits made through
                // update_me take precedence.
                let name = existing.display_name.clone().or_else(|| claims.name.clone());
                let avatar = existing.avatar_url.clone().or_else(|| claims.picture.clone());
                let changed = existing.email != claims.email
                    || existing.display_name != name
                    || existing.avatar_url != avatar;
                if changed {
                    existing.email = claims.email.clone();
                    existing.display_name = name;
                    existing.avatar_url = avatar;
                    existing.updated_at = now;
                    self.users.update(existing.clone()).await?;
                    debug!(user_id = %existing.id, "Refreshed profile from identity token");
                }
                existing
            }
            None => {
                let profile = UserProfile {
                    id: new_id(),
                    auth_subject: claims.subject.clone(),
                    email: claims.email.clone(),
                    display_name: claims.name.clone(),
                    avatar_url: claims.picture.clone(),
                    bio: None,
                    role: Role::User,
                    created_at: now,
                    updated_at: now,
                };
                self.users.create(profile.clone()).await?;
                info!(user_id = %profile.id, "Created profile for new identity");
                profile
            }
        };

        let role = profile.role.max(claims.role);
        Ok((Actor::new(profile.id.clone(), role), profile))
    }

    /// The caller's own profile, reporting the effective role
    pub async fn get_me(&self, actor: &Actor) -> Result<UserProfile> {
        let mut profile = self.require(&actor.user_id).await?;
        profile.role = profile.role.max(actor.role);
        Ok(profile)
    }

    pub async fn update_me(&self, actor: &Actor, update: ProfileUpdate) -> Result<UserProfile> {
        let mut errors = ValidationError::new();
        errors
            .check_optional(
                "display_name",
                &StringValidator::bounded(1, DISPLAY_NAME_MAX_LENGTH),
                update.display_name.as_deref(),
            )
            .check_optional(
                "bio",
                &StringValidator::new().max_length(BIO_MAX_LENGTH),
                update.bio.as_deref(),
            )
            .check_optional(
                "avatar_url",
                &UrlValidator::new(),
                update.avatar_url.as_deref().filter(|url| !url.trim().is_empty()),
            );
        ensure_valid(errors)?;

        let mut profile = self.require(&actor.user_id).await?;
        if let Some(name) = update.display_name {
            profile.display_name = Some(name.trim().to_string());
        }
        if update.bio.is_some() {
            profile.bio = clean_optional(update.bio);
        }
        if update.avatar_url.is_some() {
            profile.avatar_url = clean_optional(update.avatar_url);
        }
        profile.updated_at = Utc::now();
        self.users.update(profile.clone()).await?;

        profile.role = profile.role.max(actor.role);
        Ok(profile)
    }

    /// Public view of any user
    pub async fn get_user(&self, id: &str) -> Result<PublicProfile> {
        let profile = self.require(id).await?;
        Ok(PublicProfile::from(&profile))
    }

    pub async fn list_users(
        &self,
        actor: &Actor,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<UserProfile>> {
        actor.require_admin()?;
        self.users.list(page_size(limit, DEFAULT_PAGE_SIZE), offset.unwrap_or(0)).await
    }

    /// Set a user's stored role. Admins cannot demote themselves.
    pub async fn set_role(&self, actor: &Actor, user_id: &str, role: Role) -> Result<UserProfile> {
        actor.require_admin()?;
        if actor.is(user_id) && role < Role::Admin {
            return Err(FanEventError::InvalidInput("admins cannot demote themselves".into()));
        }

        let mut profile = self.require(user_id).await?;
        if profile.role != role {
            profile.role = role;
            profile.updated_at = Utc::now();
            self.users.update(profile.clone()).await?;
            info!(user_id = %profile.id, role = %role, "Changed stored role");
        }
        Ok(profile)
    }

    async fn require(&self, id: &str) -> Result<UserProfile> {
        self.users.get_by_id(id).await?.ok_or_else(|| FanEventError::not_found("user", id))
    }
}
