use crate::error::Result;
use crate::host::Host;
use crate::segment::Classification;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Mode {
    Normal,
    /// Speed is owned by the controller until `restore_speed` is put back.
    Accelerated { restore_speed: f64 },
}

pub struct SpeedController {
    factor: f64,
    mode: Mode,
}

impl SpeedController {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            mode: Mode::Normal,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn classification_change<H: Host>(&mut self, host: &H, classification: Classification) -> Result<()> {
        match (self.mode, classification) {
            (Mode::Normal, Classification::Silent) => {
                // Sample before overriding, never while already accelerated
                let restore_speed = host.speed()?;
                host.set_speed(self.factor)?;
                log::info!("Entering silence, speed {} -> {}", restore_speed, self.factor);
                self.mode = Mode::Accelerated { restore_speed };
            }
            (Mode::Accelerated { .. }, Classification::Active) => self.restore(host)?,
            _ => {}
        }

        Ok(())
    }

    /// Leaves Accelerated whatever the current segment is.
    pub fn force_normal<H: Host>(&mut self, host: &H) -> Result<()> {
        self.restore(host)
    }

    /// Called when the player reports a speed change. Returns `true` if the speed was released.
    pub fn speed_change(&mut self, speed: f64) -> bool {
        // If accelerated by the plugin and the user picked another speed then plugin doesn't own speed
        if let Mode::Accelerated { .. } = self.mode {
            if speed != self.factor {
                log::info!("Speed changed to {} during silence. Releasing speed", speed);
                self.mode = Mode::Normal;
                return true;
            }
        }

        false
    }

    fn restore<H: Host>(&mut self, host: &H) -> Result<()> {
        if let Mode::Accelerated { restore_speed } = self.mode {
            // Ownership ends even if the restore fails
            self.mode = Mode::Normal;
            host.set_speed(restore_speed)?;
            log::info!("Leaving silence, speed restored to {}", restore_speed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::segment::Classification::*;

    #[test]
    fn enter_and_leave() {
        let host = FakeHost::new(1.25);
        let mut controller = SpeedController::new(3.0);

        controller.classification_change(&host, Silent).unwrap();
        assert_eq!(controller.mode(), Mode::Accelerated { restore_speed: 1.25 });
        assert_eq!(host.speed.get(), 3.0);

        controller.classification_change(&host, Active).unwrap();
        assert_eq!(controller.mode(), Mode::Normal);
        assert_eq!(host.calls(), [3.0, 1.25]);
    }

    #[test]
    fn idempotent_entry() {
        let host = FakeHost::new(1.0);
        let mut controller = SpeedController::new(3.0);

        controller.classification_change(&host, Silent).unwrap();
        controller.classification_change(&host, Silent).unwrap();
        controller.classification_change(&host, Silent).unwrap();

        assert_eq!(host.calls(), [3.0]);
        assert_eq!(controller.mode(), Mode::Accelerated { restore_speed: 1.0 });
    }

    #[test]
    fn active_while_normal_is_noop() {
        let host = FakeHost::new(1.0);
        let mut controller = SpeedController::new(3.0);

        controller.classification_change(&host, Active).unwrap();
        assert!(host.calls().is_empty());
        assert_eq!(controller.mode(), Mode::Normal);
    }

    #[test]
    fn force_normal() {
        let host = FakeHost::new(2.0);
        let mut controller = SpeedController::new(3.0);

        controller.force_normal(&host).unwrap();
        assert!(host.calls().is_empty());

        controller.classification_change(&host, Silent).unwrap();
        controller.force_normal(&host).unwrap();
        controller.force_normal(&host).unwrap();
        assert_eq!(host.calls(), [3.0, 2.0]);
        assert_eq!(controller.mode(), Mode::Normal);
    }

    #[test]
    fn user_speed_change_releases_ownership() {
        let host = FakeHost::new(1.0);
        let mut controller = SpeedController::new(3.0);

        controller.classification_change(&host, Silent).unwrap();
        assert!(!controller.speed_change(3.0));
        assert_eq!(controller.mode(), Mode::Accelerated { restore_speed: 1.0 });

        host.speed.set(1.5);
        assert!(controller.speed_change(1.5));
        assert_eq!(controller.mode(), Mode::Normal);

        controller.classification_change(&host, Active).unwrap();
        controller.force_normal(&host).unwrap();
        assert_eq!(host.calls(), [3.0]);
        assert_eq!(host.speed.get(), 1.5);
    }

    #[test]
    fn speed_change_while_normal_is_ignored() {
        let mut controller = SpeedController::new(3.0);
        assert!(!controller.speed_change(2.0));
        assert_eq!(controller.mode(), Mode::Normal);
    }
}
