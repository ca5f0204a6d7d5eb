use async_trait::async_trait;

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    /// Returns `true` only if the user accepted.
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Grants access to the microphone.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Request recording permission, returning whether it was granted.
    async fn request_recording_permission(&self) -> bool;
}
