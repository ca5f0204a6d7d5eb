use crate::CoreResult;

use async_trait::async_trait;

/// Hardware playback primitive.
///
/// A player holds at most one source. `replace` swaps the source and rewinds;
/// `pause` keeps the position so a following `play` resumes.
#[async_trait]
pub trait Player: Send {
    /// Load `uri` as the current source, discarding the previous one.
    async fn replace(&mut self, uri: &str) -> CoreResult<()>;

    /// Start or resume playback of the current source.
    async fn play(&mut self) -> CoreResult<()>;

    /// Pause playback. Pausing an idle player is not an error.
    async fn pause(&mut self) -> CoreResult<()>;
}
