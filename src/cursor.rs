use crate::segment::{Segment, SegmentMap};

/// Tracks the segment holding the playback position.
///
/// Playback mostly moves forward, so the cursor remembers the last segment
/// and only scans ahead from it. Jumping before the current segment
/// falls back to a binary search over the whole map.
#[derive(Debug, Default)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `None` once the position is past the last segment.
    pub fn resolve<'m>(&mut self, map: &'m SegmentMap, position: i64) -> Option<&'m Segment> {
        let current = map.get(self.index)?;

        if current.contains(position) {
            return Some(current);
        }

        if position < current.start {
            // Seek backwards
            self.index = map.search(position)?;
            log::trace!("Cursor rewound to segment {}", self.index);
            return map.get(self.index);
        }

        let found = map
            .iter()
            .enumerate()
            .skip(self.index + 1)
            .find(|(_, s)| position < s.end)
            .map(|(i, _)| i)?;

        self.index = found;
        map.get(found)
    }
}
