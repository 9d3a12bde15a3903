use async_trait::async_trait;

/// Authentication/authorization collaborator.
///
/// The billing core consumes `current_user` for audit attribution only.
/// `has_privilege` exists for UI-layer callers; no engine operation is
/// gated on it.
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// The user the current operation runs as, if anyone is signed in.
    async fn current_user(&self) -> Option<String>;

    /// Whether a user holds a named capability (e.g. `"delete_records"`).
    async fn has_privilege(&self, user: &str, capability: &str) -> bool;
}

/// Fixed-identity `AccessControl` for tests and single-user deployments.
pub struct StaticUser {
    username: String,
}

impl StaticUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[async_trait]
impl AccessControl for StaticUser {
    async fn current_user(&self) -> Option<String> {
        Some(self.username.clone())
    }

    async fn has_privilege(&self, _user: &str, _capability: &str) -> bool {
        true
    }
}
