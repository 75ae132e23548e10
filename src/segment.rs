use crate::error::{Error, Result};

use std::fmt;

use serde_derive::Deserialize;

/// Speed value auto-editor writes for chunks it would cut.
const SILENT_SPEED: f64 = 99999.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Classification {
    Active,
    Silent,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Active => write!(f, "active"),
            Classification::Silent => write!(f, "silent"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: i64,
    pub end: i64,
    pub classification: Classification,
}

impl Segment {
    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && position < self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment [{}] {} - {}", self.classification, self.start, self.end)
    }
}

/// auto-editor `--export_as_json` output.
#[derive(Debug, Deserialize)]
struct Export {
    chunks: Option<Vec<(i64, i64, f64)>>,
}

/// Ordered, non-overlapping segments of one file. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMap(Vec<Segment>);

impl SegmentMap {
    pub fn load(raw: &str) -> Result<Self> {
        let export: Export = serde_json::from_str(raw)?;
        let chunks = export
            .chunks
            .ok_or_else(|| Error::ArtifactMalformed("no chunks".to_string()))?;

        let segments = chunks
            .into_iter()
            .map(|(start, end, speed)| Segment {
                start,
                end,
                classification: if speed == SILENT_SPEED {
                    Classification::Silent
                } else {
                    Classification::Active
                },
            })
            .collect();

        Self::new(segments)
    }

    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::ArtifactMalformed("no segments".to_string()));
        }

        if let Some(s) = segments.iter().find(|s| s.start >= s.end) {
            return Err(Error::ArtifactMalformed(format!("empty or reversed {}", s)));
        }

        if let Some(w) = segments.windows(2).find(|w| w[1].start < w[0].end) {
            return Err(Error::ArtifactMalformed(format!("{} overlaps {}", w[1], w[0])));
        }

        Ok(Self(segments))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }

    /// Index of the first segment ending after `position`.
    pub fn search(&self, position: i64) -> Option<usize> {
        let index = self.0.partition_point(|s| s.end <= position);
        (index < self.0.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_chunks() {
        let map = SegmentMap::load(r#"{"version": "1", "source": "a.mp4", "chunks": [[0, 100, 1], [100, 250, 99999], [250, 400, 1.5]]}"#).unwrap();
        assert_eq!(map.len(), 3);

        let classes: Vec<Classification> = map.iter().map(|s| s.classification).collect();
        assert_eq!(
            classes,
            [Classification::Active, Classification::Silent, Classification::Active]
        );
        assert_eq!(map.get(1).unwrap().start, 100);
        assert_eq!(map.get(1).unwrap().end, 250);
    }

    #[test]
    fn missing_chunks() {
        assert!(matches!(
            SegmentMap::load(r#"{"version": "1"}"#),
            Err(Error::ArtifactMalformed(_))
        ));
    }

    #[test]
    fn empty_chunks() {
        assert!(matches!(
            SegmentMap::load(r#"{"chunks": []}"#),
            Err(Error::ArtifactMalformed(_))
        ));
    }

    #[test]
    fn bad_json() {
        assert!(matches!(SegmentMap::load("not json"), Err(Error::ArtifactMalformed(_))));
        assert!(matches!(
            SegmentMap::load(r#"{"chunks": [[0, 10]]}"#),
            Err(Error::ArtifactMalformed(_))
        ));
    }

    #[test]
    fn non_increasing_bounds() {
        assert!(SegmentMap::load(r#"{"chunks": [[10, 10, 1]]}"#).is_err());
        assert!(SegmentMap::load(r#"{"chunks": [[10, 5, 1]]}"#).is_err());
        assert!(SegmentMap::load(r#"{"chunks": [[0, 10, 1], [5, 20, 1]]}"#).is_err());
    }

    #[test]
    fn gaps_are_allowed() {
        let map = SegmentMap::load(r#"{"chunks": [[0, 10, 1], [20, 30, 99999]]}"#).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn search() {
        let map = SegmentMap::load(r#"{"chunks": [[0, 100, 1], [100, 250, 99999], [250, 400, 1]]}"#).unwrap();
        assert_eq!(map.search(0), Some(0));
        assert_eq!(map.search(99), Some(0));
        assert_eq!(map.search(100), Some(1));
        assert_eq!(map.search(399), Some(2));
        assert_eq!(map.search(400), None);
    }

    #[test]
    fn display() {
        let segment = Segment {
            start: 1,
            end: 2,
            classification: Classification::Silent,
        };
        assert_eq!(segment.to_string(), "segment [silent] 1 - 2");
    }
}
