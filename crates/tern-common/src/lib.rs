mod error;
pub mod mutf8;
mod string;

pub use error::{DecodeError, Result};
pub use string::{RtString, StrRef};
