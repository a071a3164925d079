//! Role-derived capability set.
//!
//! The original UI re-derived role checks inline all over the place. Here
//! they are computed once per session and exposed as pure functions; the
//! backend still enforces the real checks.

use crate::models::{Comment, Role, SessionUser};

/// What the current session is allowed to do, derived from role plus the
/// relationship to the target entity.
#[derive(Debug, Clone)]
pub struct Capabilities {
    user_id: String,
    role: Role,
}

impl Capabilities {
    pub fn for_session(user: &SessionUser) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Editing is author-only, regardless of role.
    pub fn can_edit(&self, comment: &Comment) -> bool {
        comment.author.id == self.user_id
    }

    /// Whether deleting this comment goes through the owner endpoint.
    pub fn owns(&self, comment: &Comment) -> bool {
        comment.author.id == self.user_id
    }

    /// MOD/ADMIN may delete anyone's comment (via the admin endpoint).
    pub fn can_delete_any(&self) -> bool {
        self.role.is_staff()
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.owns(comment) || self.can_delete_any()
    }

    pub fn can_pin(&self) -> bool {
        self.role.is_staff()
    }

    pub fn can_moderate(&self) -> bool {
        self.role.is_staff()
    }

    /// Platform-wide block. MOD may not block MOD/ADMIN; nobody blocks
    /// themselves. Checked before any network call is attempted.
    pub fn can_block(&self, target_id: &str, target_role: Role) -> bool {
        if target_id == self.user_id {
            return false;
        }
        match self.role {
            Role::Admin => true,
            Role::Mod => !target_role.is_staff(),
            Role::User | Role::Premium => false,
        }
    }
}
