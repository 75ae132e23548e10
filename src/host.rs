use crate::error::Result;

/// What the core needs from the media player.
pub trait Host {
    fn speed(&self) -> Result<f64>;
    fn set_speed(&self, speed: f64) -> Result<()>;
    /// Start delivering position and speed changes.
    fn subscribe(&self) -> Result<()>;
    fn unsubscribe(&self) -> Result<()>;
}
