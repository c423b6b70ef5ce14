// SPDX-License-Identifier: MIT

//! Single-line rendering of error chains, for log lines

use std::error::Error;
use std::fmt;

pub struct CompactErrorChain<'e>(&'e (dyn Error + 'e));

impl fmt::Display for CompactErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)?;

        let mut source = self.0.source();
        while let Some(err) = source {
            f.write_str(": ")?;
            fmt::Display::fmt(err, f)?;
            source = err.source();
        }
        Ok(())
    }
}

pub trait FmtCompact {
    /// Display the error followed by all its sources, `: ` separated
    fn fmt_compact(&self) -> CompactErrorChain<'_>;
}

impl<E> FmtCompact for E
where
    E: Error,
{
    fn fmt_compact(&self) -> CompactErrorChain<'_> {
        CompactErrorChain(self)
    }
}
