//! Preloaded image strings.
//!
//! The image region holds strings that exist before any code runs. They are
//! registered with the intern table once at startup and never removed.

use crate::error::Result;
use rustc_hash::FxHashSet;
use std::path::Path;
use tern_common::{RtString, StrRef};

/// An ordered, deduplicated set of image strings.
#[derive(Debug, Default, Clone)]
pub struct ImageSpace {
    strings: Vec<StrRef>,
}

impl ImageSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// One string per line. Empty lines are skipped and later duplicates
    /// are dropped.
    pub fn from_lines(text: &str) -> Self {
        let mut seen = FxHashSet::default();
        let strings = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(RtString::from)
            .filter(|s| seen.insert(s.clone()))
            .map(StrRef::new)
            .collect();
        Self { strings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    pub fn strings(&self) -> &[StrRef] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
