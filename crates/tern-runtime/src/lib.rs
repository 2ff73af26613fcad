//! String interning for the tern runtime.
//!
//! The [`InternTable`] deduplicates immutable strings so that equal content
//! maps to one canonical object, and cooperates with the garbage collector:
//!
//! - strong interns are reported as roots by [`InternTable::visit_roots`],
//! - weak interns are dropped by [`InternTable::sweep_weaks`] when the
//!   collector's [`IsMarked`] oracle reports them unreachable,
//! - image strings registered at startup are neither roots nor swept.
//!
//! # Example
//!
//! ```
//! use tern_runtime::{InternTable, MarkSet, StrRef};
//!
//! let table = InternTable::new();
//! let weak = table.intern_weak(Some(StrRef::from("name"))).unwrap();
//! let strong = table.intern_strong(Some(StrRef::from("name"))).unwrap();
//! assert!(StrRef::ptr_eq(&weak, &strong));
//!
//! let marks = MarkSet::from_roots(|set| table.visit_roots(set));
//! table.sweep_weaks(&marks);
//! assert_eq!(table.size(), 1);
//! ```
//!
//! The collector may only call `visit_roots` and `sweep_weaks` at a point
//! where the mutators are paused; the table itself only serializes access.

mod config;
mod error;
mod gc;
mod image;
mod intern_table;
mod table;

pub use config::{ImageConfig, InternTableConfig, TableConfig, MAX_INITIAL_CAPACITY};
pub use error::{Result, RuntimeError};
pub use gc::{IsMarked, MarkSet, RootVisitor};
pub use image::ImageSpace;
pub use intern_table::{InternStats, InternTable};
pub use tern_common::{RtString, StrRef};
