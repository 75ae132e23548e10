use crate::error::Result;
use crate::segment::SegmentMap;

use std::path::{Path, PathBuf};

/// auto-editor writes its export next to the input, with a `.json` extension.
pub fn sidecar_path<P: AsRef<Path>>(path: P) -> PathBuf {
    path.as_ref().with_extension("json")
}

pub fn lookup<P: AsRef<Path>>(path: P) -> Result<SegmentMap> {
    let sidecar = sidecar_path(path);
    log::trace!("Reading analysis file {}", sidecar.display());
    let data = std::fs::read_to_string(&sidecar)?;
    SegmentMap::load(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    use tempfile::TempDir;

    #[test]
    fn sidecar_replaces_extension() {
        assert_eq!(sidecar_path("/videos/talk.mkv"), Path::new("/videos/talk.json"));
        assert_eq!(sidecar_path("/videos/talk.final.mp4"), Path::new("/videos/talk.final.json"));
        assert_eq!(sidecar_path("/videos/talk"), Path::new("/videos/talk.json"));
    }

    #[test]
    fn lookup_reads_sidecar() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("talk.json"), r#"{"chunks": [[0, 10, 1], [10, 20, 99999]]}"#).unwrap();

        let map = lookup(dir.path().join("talk.mp4")).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn lookup_missing_sidecar() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            lookup(dir.path().join("talk.mp4")),
            Err(Error::ArtifactUnavailable(_))
        ));
    }

    #[test]
    fn lookup_malformed_sidecar() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("talk.json"), "{\"chunks\": ").unwrap();
        assert!(matches!(
            lookup(dir.path().join("talk.mp4")),
            Err(Error::ArtifactMalformed(_))
        ));
    }
}
