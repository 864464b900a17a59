use std::io::{ErrorKind, Read};

use crate::capture::error::{CaptureError, Result};

/// Outcome of a full-buffer read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    /// Bytes placed in the buffer; always the buffer length on success.
    pub bytes: usize,
    /// Number of `read` calls that returned data.
    pub calls: usize,
}

/// Fill `buf` completely from `reader`.
///
/// Short reads are continued and `Interrupted` is retried. End of file
/// before the buffer is full is a [`CaptureError::ShortRead`].
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<ReadStats> {
    let expected = buf.len();
    let mut filled = 0;
    let mut calls = 0;

    while filled < expected {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(CaptureError::ShortRead { filled, expected }),
            Ok(n) => {
                filled += n;
                calls += 1;
                tracing::trace!("read {n} bytes ({filled}/{expected})");
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(CaptureError::Read {
                    filled,
                    expected,
                    source,
                })
            }
        }
    }

    Ok(ReadStats {
        bytes: filled,
        calls,
    })
}
