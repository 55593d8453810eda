//! Error types surfaced by the action-table core.
//!
//! Most failure modes described in the design (an unmet precondition of a
//! packer operation, a caller passing badly-formed input) are caller bugs,
//! not recoverable runtime conditions, and are reported with `assert!`/
//! `panic!` the way the rest of this crate family does. The one condition
//! a caller can sensibly recover from -- the packed table growing too large
//! to allocate -- is reported here.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The packed action table could not grow to accommodate a new transaction.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfMemory => {
                write!(f, "unable to allocate memory for the packed action table")
            }
        }
    }
}

impl std::error::Error for Error {}
