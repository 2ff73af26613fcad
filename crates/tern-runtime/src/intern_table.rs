//! The runtime's intern table.
//!
//! Three tables share one lock:
//!
//! - `strong`: interned strings that are collector roots,
//! - `weak`: interned strings that do not keep their referent alive and are
//!   removed by [`InternTable::sweep_weaks`],
//! - `image`: strings registered from the boot image, never removed.
//!
//! A value lives in at most one of `strong` and `image`. A weak entry that
//! is strongly interned later is moved to `strong`, never copied, so the
//! caller that created it keeps the canonical instance.

use crate::config::{InternTableConfig, MAX_INITIAL_CAPACITY};
use crate::error::Result;
use crate::gc::{IsMarked, RootVisitor};
use crate::image::ImageSpace;
use crate::table::Table;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::io;
use tern_common::{RtString, StrRef};
use tracing::{debug, info, trace};

struct Tables {
    strong: Table,
    weak: Table,
    image: Table,
}

/// Entry counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternStats {
    pub strong: usize,
    pub weak: usize,
    pub image: usize,
}

impl fmt::Display for InternStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Intern table: {} strong; {} weak; {} image strong",
            self.strong, self.weak, self.image
        )
    }
}

/// Thread-safe strong/weak/image intern table.
pub struct InternTable {
    tables: Mutex<Tables>,
}

impl Default for InternTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InternTable {
    pub fn new() -> Self {
        Self::with_config(&InternTableConfig::default())
    }

    /// Capacities above [`MAX_INITIAL_CAPACITY`] are clamped; use
    /// [`InternTable::boot`] to reject them instead.
    pub fn with_config(config: &InternTableConfig) -> Self {
        let sizes = &config.table;
        let strong = sizes.strong_capacity.min(MAX_INITIAL_CAPACITY);
        let weak = sizes.weak_capacity.min(MAX_INITIAL_CAPACITY);
        let image = sizes.image_capacity.min(MAX_INITIAL_CAPACITY);
        info!(strong, weak, image, "creating intern table");
        Self {
            tables: Mutex::new(Tables {
                strong: Table::with_capacity(strong),
                weak: Table::with_capacity(weak),
                image: Table::with_capacity(image),
            }),
        }
    }

    /// Create the table and register the configured image, if any.
    pub fn boot(config: &InternTableConfig) -> Result<Self> {
        config.validate()?;
        let table = Self::with_config(config);
        if let Some(path) = &config.image.path {
            table.register_image(&ImageSpace::load(path)?);
        }
        Ok(table)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock()
    }

    /// Number of dynamically interned strings. Image strings are not counted.
    pub fn size(&self) -> usize {
        let tables = self.lock();
        tables.strong.len() + tables.weak.len()
    }

    pub fn stats(&self) -> InternStats {
        let tables = self.lock();
        InternStats {
            strong: tables.strong.len(),
            weak: tables.weak.len(),
            image: tables.image.len(),
        }
    }

    /// Write a one-line summary of the table sizes.
    pub fn dump_for_sigquit(&self, os: &mut impl io::Write) -> io::Result<()> {
        writeln!(os, "{}", self.stats())
    }

    /// Report every strong entry to `visitor`. Weak entries must not keep
    /// their referents alive and image entries are reachable through the
    /// image itself, so neither is visited.
    pub fn visit_roots(&self, visitor: &mut impl RootVisitor) {
        let tables = self.lock();
        for root in tables.strong.iter() {
            visitor.visit_root(root);
        }
    }

    /// Add `s` to the image table without checking for duplicates.
    ///
    /// Intended for startup, before other threads intern.
    pub fn register_strong(&self, s: StrRef) {
        let mut tables = self.lock();
        let hash_code = s.hash_code();
        tables.image.insert(s, hash_code);
    }

    /// Register every string in `image` under one lock acquisition.
    pub fn register_image(&self, image: &ImageSpace) {
        let mut tables = self.lock();
        for s in image.strings() {
            tables.image.insert(s.clone(), s.hash_code());
        }
        debug!(count = image.len(), total = tables.image.len(), "registered image strings");
    }

    /// Return the canonical instance for `s`, inserting it if none exists.
    pub fn insert(&self, s: StrRef, is_strong: bool) -> StrRef {
        let mut tables = self.lock();
        let hash_code = s.hash_code();

        if let Some(strong) = tables.strong.lookup(&s, hash_code) {
            return strong;
        }
        if let Some(image) = tables.image.lookup(&s, hash_code) {
            return image;
        }

        if is_strong {
            if let Some(weak) = tables.weak.lookup(&s, hash_code) {
                // Promote. The weak instance stays canonical.
                trace!(string = %weak, hash_code, "promoting weak intern");
                tables.weak.remove(&weak, hash_code);
                return tables.strong.insert(weak, hash_code);
            }
            trace!(string = %s, hash_code, "new strong intern");
            return tables.strong.insert(s, hash_code);
        }

        if let Some(weak) = tables.weak.lookup(&s, hash_code) {
            return weak;
        }
        trace!(string = %s, hash_code, "new weak intern");
        tables.weak.insert(s, hash_code)
    }

    pub fn intern_strong(&self, s: Option<StrRef>) -> Option<StrRef> {
        s.map(|s| self.insert(s, true))
    }

    pub fn intern_weak(&self, s: Option<StrRef>) -> Option<StrRef> {
        s.map(|s| self.insert(s, false))
    }

    /// Decode `utf16_length` units of modified UTF-8 and strongly intern the
    /// result.
    pub fn intern_strong_utf8(&self, utf16_length: usize, utf8_data: &[u8]) -> Result<StrRef> {
        let s = RtString::from_modified_utf8(utf16_length, utf8_data)?;
        Ok(self.insert(StrRef::new(s), true))
    }

    /// Decode NUL-terminated modified UTF-8 and strongly intern the result.
    pub fn intern_strong_utf8_nul(&self, utf8_data: &[u8]) -> Result<StrRef> {
        let s = RtString::from_modified_utf8_nul(utf8_data)?;
        Ok(self.insert(StrRef::new(s), true))
    }

    /// True if `s` itself is a weak intern. An equal but distinct string
    /// does not count.
    pub fn contains_weak(&self, s: &StrRef) -> bool {
        let tables = self.lock();
        tables.weak.contains_identity(s, s.hash_code())
    }

    /// Drop every weak entry the collector did not mark.
    pub fn sweep_weaks(&self, is_marked: &impl IsMarked) {
        let mut tables = self.lock();
        let removed = tables.weak.retain(|s| is_marked.is_marked(s));
        debug!(removed, retained = tables.weak.len(), "swept weak interns");
    }
}

impl fmt::Debug for InternTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InternTable").field(&self.stats()).finish()
    }
}
