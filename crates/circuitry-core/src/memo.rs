//! Render memoization
//!
//! A component view only re-renders (and re-reports its port geometry) when
//! its declared render key changed since the last frame.

/// Remembers the last render key and reports changes
#[derive(Debug, Clone)]
pub struct Memo<T> {
    last: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq + Clone> Memo<T> {
    /// Create an empty memo; the first key always counts as changed
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Store `next` and report whether it differs from the previous key
    pub fn changed(&mut self, next: &T) -> bool {
        if self.last.as_ref() == Some(next) {
            return false;
        }
        self.last = Some(next.clone());
        true
    }

    /// Force the next comparison to report a change
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Last stored key
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo() {
        let mut memo = Memo::new();
        assert!(memo.changed(&(1, "a")));
        assert!(!memo.changed(&(1, "a")));
        assert!(memo.changed(&(2, "a")));
        memo.invalidate();
        assert!(memo.changed(&(2, "a")));
        assert_eq!(memo.last(), Some(&(2, "a")));
    }
}
