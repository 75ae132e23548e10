use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    AnalysisInProgress,
    AnalysisFailed(String),
    AnalysisCancelled,
    ArtifactUnavailable(io::Error),
    ArtifactMalformed(String),
    Mpv(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::ArtifactUnavailable(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::ArtifactMalformed(e.to_string())
    }
}

impl Error {
    /// mpv-client keeps its error type private, only its message is kept.
    pub fn mpv<E: fmt::Display>(e: E) -> Self {
        Self::Mpv(e.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ArtifactUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AnalysisInProgress => write!(f, "an analysis is already in progress"),
            Self::AnalysisFailed(reason) => write!(f, "analysis failed: {}", reason),
            Self::AnalysisCancelled => write!(f, "analysis cancelled"),
            Self::ArtifactUnavailable(e) => write!(f, "analysis file unavailable: {}", e),
            Self::ArtifactMalformed(reason) => write!(f, "analysis file malformed: {}", reason),
            Self::Mpv(e) => write!(f, "mpv: {}", e),
        }
    }
}
