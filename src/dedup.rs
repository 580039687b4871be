//! Set index
//!
//! A hash set of lines, used as the seen-set while deduplicating and as the
//! membership set of a diff base. Membership is exact byte equality.

use crate::lines::Line;

use ahash::RandomState;
use bstr::BStr;
use hashbrown::HashSet;

/// A set of distinct lines. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct LineSet {
    set: HashSet<Line, RandomState>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: HashSet::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Build a set from owned lines; duplicates collapse silently
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = Line>,
    {
        let lines = lines.into_iter();
        let mut set = Self::with_capacity(lines.size_hint().0);
        for line in lines {
            set.set.insert(line);
        }
        set
    }

    /// Add `line`, returning true if it was not present before
    pub fn insert<L: AsRef<[u8]>>(&mut self, line: L) -> bool {
        let line = line.as_ref();
        if self.set.contains(line) {
            return false;
        }
        self.set.insert(Line::from(line))
    }

    pub fn contains<L: AsRef<[u8]>>(&self, line: L) -> bool {
        self.set.contains(line.as_ref())
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BStr> {
        self.set.iter().map(BStr::new)
    }
}

impl FromIterator<Line> for LineSet {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Self::from_lines(iter)
    }
}

impl<'a> FromIterator<&'a str> for LineSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for line in iter {
            set.insert(line);
        }
        set
    }
}

/// Build the membership set of a line sequence
pub fn to_set<S: AsRef<[u8]>>(lines: &[S]) -> LineSet {
    let mut set = LineSet::with_capacity(lines.len());
    for line in lines {
        set.insert(line);
    }
    set
}
