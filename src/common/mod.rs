//! Utility types.
mod bytestr;

pub use bytestr::ByteStr;
