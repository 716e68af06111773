//! Organizer application service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{StringValidator, ValidationError};
use fanevent_domain::constants::{
    DESCRIPTION_MAX_LENGTH, MODERATION_NOTE_MAX_LENGTH, MOTIVATION_MAX_LENGTH,
    MOTIVATION_MIN_LENGTH, ORGANIZATION_NAME_MAX_LENGTH,
};
use fanevent_domain::{
    new_id, FanEventError, ModerationStatus, NewOrganizerApplication, Notification,
    NotificationKind, OrganizerApplication, Result, Role,
};
use tracing::{info, warn};

use super::ports::ApplicationRepository;
use crate::access::Actor;
use crate::notifications::ports::NotificationRepository;
use crate::users::ports::UserRepository;
use crate::validation::{clean_optional, ensure_valid};

pub struct OrganizerApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl OrganizerApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { applications, users, notifications }
    }

    /// Ask to become an organizer. Only plain users without a pending
    /// application may apply.
    pub async fn apply(
        &self,
        actor: &Actor,
        payload: NewOrganizerApplication,
    ) -> Result<OrganizerApplication> {
        if actor.role != Role::User {
            return Err(FanEventError::InvalidInput("already an organizer".into()));
        }

        let organization_name = clean_optional(payload.organization_name);
        let experience = clean_optional(payload.experience);
        let motivation = payload.motivation.trim().to_string();

        let mut errors = ValidationError::new();
        errors
            .check(
                "motivation",
                &StringValidator::bounded(MOTIVATION_MIN_LENGTH, MOTIVATION_MAX_LENGTH),
                motivation.as_str(),
            )
            .check_optional(
                "organization_name",
                &StringValidator::new().max_length(ORGANIZATION_NAME_MAX_LENGTH),
                organization_name.as_deref(),
            )
            .check_optional(
                "experience",
                &StringValidator::new().max_length(DESCRIPTION_MAX_LENGTH),
                experience.as_deref(),
            );
        ensure_valid(errors)?;

        if self.applications.find_pending_for_user(&actor.user_id).await?.is_some() {
            return Err(FanEventError::Conflict("an application is already pending".into()));
        }

        let application = OrganizerApplication {
            id: new_id(),
            user_id: actor.user_id.clone(),
            organization_name,
            motivation,
            experience,
            status: ModerationStatus::Pending,
            reviewer_id: None,
            review_note: None,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        self.applications.create(application.clone()).await?;
        info!(
            application_id = %application.id,
            user_id = %actor.user_id,
            "Organizer application filed"
        );
        Ok(application)
    }

    pub async fn my_applications(&self, actor: &Actor) -> Result<Vec<OrganizerApplication>> {
        self.applications.list_for_user(&actor.user_id).await
    }

    pub async fn list(
        &self,
        actor: &Actor,
        status: Option<ModerationStatus>,
    ) -> Result<Vec<OrganizerApplication>> {
        actor.require_admin()?;
        self.applications.list(status).await
    }

    /// Approve a pending application and raise the applicant to organizer
    pub async fn approve(
        &self,
        actor: &Actor,
        id: &str,
        note: Option<String>,
    ) -> Result<OrganizerApplication> {
        let application = self.review(actor, id, ModerationStatus::Approved, note).await?;

        let mut user = self
            .users
            .get_by_id(&application.user_id)
            .await?
            .ok_or_else(|| FanEventError::not_found("user", &application.user_id))?;
        if user.role < Role::Organizer {
            user.role = Role::Organizer;
            user.updated_at = Utc::now();
            self.users.update(user).await?;
        }

        self.notify(Notification::new(
            &application.user_id,
            NotificationKind::OrganizerApproved,
            "You are now an organizer",
            application.review_note.clone().unwrap_or_else(|| {
                "Your organizer application was approved.".to_string()
            }),
        ))
        .await;
        Ok(application)
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        id: &str,
        note: Option<String>,
    ) -> Result<OrganizerApplication> {
        let application = self.review(actor, id, ModerationStatus::Rejected, note).await?;

        self.notify(Notification::new(
            &application.user_id,
            NotificationKind::OrganizerRejected,
            "Organizer application declined",
            application.review_note.clone().unwrap_or_else(|| {
                "Your organizer application was not approved.".to_string()
            }),
        ))
        .await;
        Ok(application)
    }

    async fn review(
        &self,
        actor: &Actor,
        id: &str,
        outcome: ModerationStatus,
        note: Option<String>,
    ) -> Result<OrganizerApplication> {
        actor.require_admin()?;

        let note = clean_optional(note);
        let mut errors = ValidationError::new();
        errors.check_optional(
            "note",
            &StringValidator::new().max_length(MODERATION_NOTE_MAX_LENGTH),
            note.as_deref(),
        );
        ensure_valid(errors)?;

        let mut application = self
            .applications
            .get(id)
            .await?
            .ok_or_else(|| FanEventError::not_found("application", id))?;
        if application.status != ModerationStatus::Pending {
            return Err(FanEventError::InvalidInput(format!(
                "application is already {}",
                application.status
            )));
        }

        application.status = outcome;
        application.reviewer_id = Some(actor.user_id.clone());
        application.review_note = note;
        application.reviewed_at = Some(Utc::now());
        self.applications.update(application.clone()).await?;
        info!(application_id = %id, status = %outcome, "Organizer application reviewed");
        Ok(application)
    }

    async fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifications.create(notification).await {
            warn!(error = %err, "Failed to store application notification");
        }
    }
}
