//! Capped memo of URL validity verdicts.

use std::collections::HashMap;

/// URL → verdict memo. Once `capacity` verdicts are held, new verdicts are
/// no longer recorded; existing ones stay until [`ValidityMemo::clear`].
#[derive(Debug)]
pub struct ValidityMemo {
    verdicts: HashMap<String, bool>,
    capacity: usize,
}

impl ValidityMemo {
    pub fn new(capacity: usize) -> Self {
        Self { verdicts: HashMap::new(), capacity }
    }

    pub fn get(&self, url: &str) -> Option<bool> {
        self.verdicts.get(url).copied()
    }

    pub fn insert(&mut self, url: &str, verdict: bool) {
        if self.verdicts.len() < self.capacity || self.verdicts.contains_key(url) {
            self.verdicts.insert(url.to_owned(), verdict);
        }
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_recording_at_capacity() {
        let mut memo = ValidityMemo::new(2);
        memo.insert("a", true);
        memo.insert("b", false);
        memo.insert("c", true);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.get("b"), Some(false));
        assert_eq!(memo.get("c"), None);
    }

    #[test]
    fn test_clear_makes_room() {
        let mut memo = ValidityMemo::new(1);
        memo.insert("a", true);
        memo.clear();
        assert!(memo.is_empty());
        memo.insert("b", true);
        assert_eq!(memo.get("b"), Some(true));
    }
}
