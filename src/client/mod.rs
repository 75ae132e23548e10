use crate::analysis::Analyzer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::session::Session;

use std::ops::Deref;
use std::path::Path;
use std::time::Duration;

use mpv_client::{mpv_handle, Handle};

static NAME_PROP_PATH: &str = "path";
static NAME_PROP_TIME: &str = "time-pos";
static NAME_PROP_SPEED: &str = "speed";
static NAME_PROP_FRAME: &str = "estimated-frame-number";

pub const REPL_PROP_TIME: u64 = 1;
pub const REPL_PROP_SPEED: u64 = 2;

static SECTION: &str = "skip-silence";
const RUN_BINDING: &str = "run-auto-editor";

const NOTICE_DURATION: Duration = Duration::from_secs(3);
/// Event wait while auto-editor runs, in seconds.
const ANALYSIS_POLL: f64 = 0.25;

impl Host for Handle {
    fn speed(&self) -> Result<f64> {
        self.get_property(NAME_PROP_SPEED).map_err(Error::mpv)
    }

    fn set_speed(&self, speed: f64) -> Result<()> {
        self.set_property(NAME_PROP_SPEED, speed).map_err(Error::mpv)
    }

    fn subscribe(&self) -> Result<()> {
        self.observe_property::<f64>(REPL_PROP_TIME, NAME_PROP_TIME)
            .and_then(|_| self.observe_property::<f64>(REPL_PROP_SPEED, NAME_PROP_SPEED))
            .map_err(Error::mpv)
    }

    fn unsubscribe(&self) -> Result<()> {
        self.unobserve_property(REPL_PROP_TIME)
            .and_then(|_| self.unobserve_property(REPL_PROP_SPEED))
            .map_err(Error::mpv)
    }
}

pub struct Client {
    mpv: Handle,
    config: Config,
    analyzer: Analyzer,
    session: Option<Session>,
}

impl Client {
    pub fn from_ptr(handle: *mut mpv_handle) -> Result<Self> {
        let client = Self {
            mpv: Handle::from_ptr(handle),
            config: Config::get(),
            analyzer: Analyzer::new()?,
            session: None,
        };

        client.bind_key();
        Ok(client)
    }

    pub fn start_file(&mut self) {
        self.stop_session();

        let path: String = match self.mpv.get_property(NAME_PROP_PATH) {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to get file path: {}", e);
                return;
            }
        };

        self.load_session(&path);
    }

    pub fn end_file(&mut self) {
        self.stop_session();
    }

    pub fn shutdown(&mut self) {
        self.stop_session();
        self.analyzer.stop();
    }

    /// Timeout for the next `wait_event`, short while an analysis has to be polled.
    pub fn event_timeout(&self) -> f64 {
        if self.analyzer.is_running() {
            ANALYSIS_POLL
        } else {
            -1.
        }
    }

    pub fn time_change(&mut self) {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return,
        };

        match self.mpv.get_property(NAME_PROP_FRAME) {
            Ok(frame) => session.position_change(&self.mpv, frame),
            Err(e) => log::trace!("No frame number: {}", e),
        }
    }

    pub fn speed_change(&mut self, speed: f64) {
        if let Some(session) = self.session.as_mut() {
            session.speed_change(speed);
        }
    }

    pub fn client_message(&mut self, args: &[&str]) {
        match args {
            ["key-binding", RUN_BINDING, "u-" | "p-", ..] => self.run_analysis(),
            [RUN_BINDING] => self.run_analysis(),
            _ => {}
        };
    }

    fn bind_key(&self) {
        let binding = format!("{} script-binding {}/{}", self.config.key, self.client_name(), RUN_BINDING);
        let defined = self
            .command(["define-section", SECTION, binding.as_str(), "default"])
            .and_then(|_| self.command(["enable-section", SECTION]));

        match defined {
            Ok(_) => log::debug!("Bound {} to {}", self.config.key, RUN_BINDING),
            Err(e) => log::error!("Failed to bind {}: {}", self.config.key, e),
        }
    }

    fn load_session(&mut self, path: &str) {
        self.session = Session::start(&self.mpv, path, self.config.acceleration_factor);

        if let Some(session) = &self.session {
            self.notice(format!("auto-editor: Loaded {} segments", session.segments().len()));
        }
    }

    fn stop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop(&self.mpv);
        }
    }

    fn run_analysis(&mut self) {
        if self.analyzer.is_running() {
            self.notice("auto-editor: An analysis is already in progress");
            return;
        }

        let path: String = match self.mpv.get_property(NAME_PROP_PATH) {
            Ok(path) => path,
            Err(e) => {
                log::error!("Failed to get file path: {}", e);
                return;
            }
        };

        match self.analyzer.request(&self.config, &path) {
            Ok(_) => self.notice("auto-editor: Running analysis"),
            Err(Error::AnalysisInProgress) => self.notice("auto-editor: An analysis is already in progress"),
            Err(e) => log::error!("Failed to start analysis: {}", e),
        }
    }

    /// Collects a finished analysis, if any.
    pub fn poll_analysis(&mut self) {
        let (path, result) = match self.analyzer.finish() {
            Some(finished) => finished,
            None => return,
        };

        if let Err(e) = result {
            log::error!("{}", e);
            self.notice("auto-editor: Analysis failed");
            return;
        }

        log::info!("Analysis of {} finished", path.display());

        // Reload only if the analysed file is still playing
        let current: String = match self.mpv.get_property(NAME_PROP_PATH) {
            Ok(current) => current,
            Err(e) => {
                log::debug!("No file playing: {}", e);
                return;
            }
        };

        if Path::new(&current) == path {
            self.stop_session();
            self.load_session(&current);
        } else {
            log::debug!("Analysed file is no longer playing");
        }
    }

    fn notice<S: AsRef<str>>(&self, message: S) {
        log::info!("{}", message.as_ref());
        if self.config.notice {
            if let Err(e) = self.osd_message(message.as_ref(), NOTICE_DURATION) {
                log::error!("Failed to show message: {}", e);
            }
        }
    }
}

impl Deref for Client {
    type Target = Handle;

    #[inline]
    fn deref(&self) -> &Handle {
        &self.mpv
    }
}
