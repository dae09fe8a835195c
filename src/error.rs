// Copyright 2018-2021 Developers of the Rand project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types.

use core::fmt;

/// Error type for engine and extension-table contract violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The stream of this configuration is fixed and cannot be selected.
    FixedStream,
    /// The two generators do not share a stream, so no distance between
    /// them exists.
    StreamMismatch,
    /// Extension table data does not match the table size.
    WrongTableSize,
    /// Table jumps are only defined for low-bit slot addressing.
    UnsupportedTableJump,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::FixedStream => "stream selection is fixed for this generator",
            Error::StreamMismatch => "generators do not share a stream",
            Error::WrongTableSize => "extension table data has the wrong length",
            Error::UnsupportedTableJump => {
                "table jumps require low-bit slot addressing"
            }
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
