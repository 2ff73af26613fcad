use crate::error::Result;
use crate::mutf8;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// An immutable managed string.
///
/// Content is stored as UTF-16 units so unpaired surrogates survive a
/// decode. The hash code is computed once at construction.
#[derive(Clone)]
pub struct RtString {
    units: Box<[u16]>,
    hash_code: u32,
}

impl RtString {
    pub fn from_utf16(units: impl Into<Box<[u16]>>) -> Self {
        let units = units.into();
        let hash_code = compute_hash_code(&units);
        Self { units, hash_code }
    }

    /// Decode exactly `utf16_length` units of modified UTF-8.
    pub fn from_modified_utf8(utf16_length: usize, bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_utf16(mutf8::decode_with_length(
            bytes,
            utf16_length,
        )?))
    }

    /// Decode NUL-terminated modified UTF-8.
    pub fn from_modified_utf8_nul(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_utf16(mutf8::decode_nul_terminated(bytes)?))
    }

    /// Content-derived hash: `h = 31 * h + unit` over all units, wrapping.
    pub fn hash_code(&self) -> u32 {
        self.hash_code
    }

    /// Value equality.
    pub fn equals(&self, other: &RtString) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.hash_code == other.hash_code && self.units == other.units
    }

    /// Length in UTF-16 units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

fn compute_hash_code(units: &[u16]) -> u32 {
    units
        .iter()
        .fold(0u32, |h, &unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

impl From<&str> for RtString {
    fn from(s: &str) -> Self {
        Self::from_utf16(s.encode_utf16().collect::<Vec<_>>())
    }
}

impl PartialEq for RtString {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for RtString {}

impl Hash for RtString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code);
    }
}

impl fmt::Display for RtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for RtString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

/// A reference to a heap-allocated managed string.
///
/// Cloning a `StrRef` copies the reference, not the string. Two references
/// are the same object only if [`StrRef::ptr_eq`] says so; value equality
/// goes through [`RtString::equals`].
#[derive(Clone)]
pub struct StrRef(Arc<RtString>);

impl StrRef {
    pub fn new(string: RtString) -> Self {
        Self(Arc::new(string))
    }

    /// Reference identity.
    pub fn ptr_eq(a: &StrRef, b: &StrRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the referenced object, usable as an identity key.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl Deref for StrRef {
    type Target = RtString;

    fn deref(&self) -> &RtString {
        &self.0
    }
}

impl From<RtString> for StrRef {
    fn from(string: RtString) -> Self {
        Self::new(string)
    }
}

impl From<&str> for StrRef {
    fn from(s: &str) -> Self {
        Self::new(RtString::from(s))
    }
}

impl fmt::Display for StrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for StrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:#x}", &*self.0, self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_code_matches_managed_runtime() {
        assert_eq!(RtString::from("").hash_code(), 0);
        assert_eq!(RtString::from("hello").hash_code(), 99162322);
        // wraps past i32::MAX
        assert_eq!(
            RtString::from("polygenelubricants").hash_code(),
            i32::MIN as u32
        );
    }

    #[test]
    fn test_equals_is_by_value() {
        let a = StrRef::from("java.lang.Object");
        let b = StrRef::from("java.lang.Object");
        assert!(a.equals(&b));
        assert!(!StrRef::ptr_eq(&a, &b));
        assert!(StrRef::ptr_eq(&a, &a.clone()));
        assert!(!a.equals(&StrRef::from("java.lang.Class")));
    }

    #[test]
    fn test_modified_utf8_constructors() {
        let with_len = RtString::from_modified_utf8(3, b"abcdef").unwrap();
        let nul = RtString::from_modified_utf8_nul(b"abc\0def").unwrap();
        assert_eq!(with_len, nul);
        assert_eq!(with_len.hash_code(), RtString::from("abc").hash_code());
        assert_eq!(nul.to_string(), "abc");
    }

    #[test]
    fn test_unpaired_surrogate_is_kept() {
        let s = RtString::from_modified_utf8(1, &[0xED, 0xA0, 0x80]).unwrap();
        assert_eq!(s.units(), &[0xD800]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.to_string_lossy(), "\u{FFFD}");
    }
}
