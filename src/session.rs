use crate::artifact;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::segment::SegmentMap;
use crate::speed::{Mode, SpeedController};

use std::path::Path;

/// Handle on the host's position updates. Must be cancelled before another is made.
#[derive(Debug)]
pub struct Subscription {
    active: bool,
}

impl Subscription {
    pub fn new<H: Host>(host: &H) -> Result<Self> {
        host.subscribe()?;
        Ok(Self { active: true })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel<H: Host>(&mut self, host: &H) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        host.unsubscribe()
    }
}

/// Segment tracking for one loaded file.
pub struct Session {
    map: SegmentMap,
    cursor: Cursor,
    controller: SpeedController,
    subscription: Subscription,
    /// Segment whose speed the user took over.
    released: Option<usize>,
}

impl Session {
    /// Loads the side-car of `path`. A file that was never analysed gives `None`.
    pub fn start<H: Host, P: AsRef<Path>>(host: &H, path: P, factor: f64) -> Option<Self> {
        match artifact::lookup(&path) {
            Ok(map) => Self::with_map(host, map, factor)
                .map_err(|e| log::error!("Failed to start session: {}", e))
                .ok(),
            Err(Error::ArtifactUnavailable(e)) => {
                log::debug!("No analysis for {}: {}", path.as_ref().display(), e);
                None
            }
            Err(e) => {
                log::debug!("Ignoring analysis for {}: {}", path.as_ref().display(), e);
                None
            }
        }
    }

    pub fn with_map<H: Host>(host: &H, map: SegmentMap, factor: f64) -> Result<Self> {
        let subscription = Subscription::new(host)?;
        log::info!("Tracking {} segment(s)", map.len());

        Ok(Self {
            map,
            cursor: Cursor::new(),
            controller: SpeedController::new(factor),
            subscription,
            released: None,
        })
    }

    pub fn segments(&self) -> &SegmentMap {
        &self.map
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn position_change<H: Host>(&mut self, host: &H, position: i64) {
        if !self.subscription.is_active() {
            return;
        }

        let segment = match self.cursor.resolve(&self.map, position) {
            Some(s) => s,
            None => {
                log::trace!("Position {} is past the last segment", position);
                return;
            }
        };

        // Working only once leaving the segment the user took over
        if let Some(released) = self.released {
            if released == self.cursor.index() {
                return;
            }
            self.released = None;
        }

        if let Err(e) = self.controller.classification_change(host, segment.classification) {
            log::error!("Failed to change speed in {}: {}", segment, e);
        }
    }

    pub fn speed_change(&mut self, speed: f64) {
        if self.subscription.is_active() && self.controller.speed_change(speed) {
            self.released = Some(self.cursor.index());
        }
    }

    /// Safe to call more than once.
    pub fn stop<H: Host>(&mut self, host: &H) {
        if !self.subscription.is_active() {
            return;
        }

        if let Err(e) = self.subscription.cancel(host) {
            log::error!("Failed to unsubscribe: {}", e);
        }

        if let Err(e) = self.controller.force_normal(host) {
            log::error!("Failed to restore speed: {}", e);
        }

        log::trace!("Session stopped");
    }
}
