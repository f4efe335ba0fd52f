//! Capability checks for mutating actions.
//!
//! Each action maps to an ordered list of capabilities that the acting user must hold.
//! Handlers resolve the actor and the owner of the target row, then call [`authorize`]
//! before changing anything.

use crate::database::models::User;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateArticle,
    DeleteArticle,
    AttachCategories,
    DeleteCategory,
    DeleteComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Holds a valid token for an existing user
    Authenticated,
    /// Owns the target row, or is an admin
    OwnerOrAdmin,
    Admin,
}

impl Action {
    /// Capabilities required for this action. `strict` is `security.strict_ownership`.
    pub fn requirements(self, strict: bool) -> &'static [Capability] {
        use Capability::*;

        match (self, strict) {
            (Action::DeleteArticle, _) => &[Authenticated, OwnerOrAdmin],
            (Action::UpdateArticle, true)
            | (Action::AttachCategories, true)
            | (Action::DeleteComment, true) => &[Authenticated, OwnerOrAdmin],
            (Action::DeleteCategory, true) => &[Authenticated, Admin],
            (_, false) => &[Authenticated],
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Action::UpdateArticle => "update this article",
            Action::DeleteArticle => "delete this article",
            Action::AttachCategories => "change this article's categories",
            Action::DeleteCategory => "delete categories",
            Action::DeleteComment => "delete this comment",
        }
    }
}

/// Check every capability `action` requires. `owner_id` is the author of the target
/// row; actions without an owned target pass `None`.
pub fn authorize(
    action: Action,
    actor: &User,
    owner_id: Option<i64>,
    strict: bool,
) -> Result<(), ApiError> {
    for capability in action.requirements(strict) {
        let granted = match capability {
            Capability::Authenticated => true,
            Capability::OwnerOrAdmin => actor.is_admin || owner_id == Some(actor.id),
            Capability::Admin => actor.is_admin,
        };

        if !granted {
            tracing::warn!(
                "User {} denied {:?} (missing {:?})",
                actor.id,
                action,
                capability
            );
            return Err(ApiError::forbidden(format!(
                "You are not allowed to {}",
                action.describe()
            )));
        }
    }

    Ok(())
}
