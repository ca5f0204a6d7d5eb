use voice_memo_core::capability::PermissionProvider;

use async_trait::async_trait;
use cpal::traits::HostTrait;
use tracing::{info, instrument, warn};

/// Grants recording when the host exposes a default input device.
///
/// Desktop platforms gate microphone access at the OS level; the closest
/// check available here is whether an input device can be reached at all.
#[derive(Debug, Default)]
pub struct DevicePermission;

#[async_trait]
impl PermissionProvider for DevicePermission {
    #[instrument(skip(self))]
    async fn request_recording_permission(&self) -> bool {
        let granted = tokio::task::spawn_blocking(|| {
            cpal::default_host().default_input_device().is_some()
        })
        .await
        .unwrap_or(false);

        if granted {
            info!("Microphone available");
        } else {
            warn!("No microphone found, recording permission denied");
        }

        granted
    }
}
