//! Latest-row extraction from append-only perfmon files.
//!
//! A perfmon file is comma-delimited text where each line is one complete
//! sample snapshot and lines starting with `#` are comments. Only the most
//! recent data line matters, so the scan walks backward from the end of the
//! file instead of reading it front to back.

use crate::error::PollError;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes examined per backward step while searching for the previous line
/// terminator.
const SCAN_CHUNK: usize = 8 * 1024;

/// Reads the last complete, non-comment line of `path` and splits it into
/// its comma-separated fields. Field 0 is the row's leading timestamp
/// field.
///
/// The scan starts at the second-to-last byte, skipping the single
/// terminator a complete row ends with. A row ending at the current
/// end-of-file without that terminator may still be mid-append by the
/// writer, and this anchor keeps the scan off it. Delimiters are counted
/// on the way back to the previous newline (or the file start), which
/// fixes the field count of the line before it is split.
///
/// Stateless: nothing is cached between calls, and the file handle is
/// released on every exit path.
///
/// # Errors
///
/// Returns [`PollError`] if the file cannot be opened or read, is not a
/// regular file, is empty, or its last line is a comment.
pub fn read_last_row(path: &Path) -> Result<Vec<String>, PollError> {
    let io_err = |source| PollError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let meta = file.metadata().map_err(io_err)?;
    if !meta.is_file() {
        return Err(PollError::NotAFile(path.to_path_buf()));
    }
    let len = meta.len();
    if len == 0 {
        return Err(PollError::Empty(path.to_path_buf()));
    }

    // For a one-byte file the anchor is the only byte there is.
    let anchor = len.saturating_sub(2);
    let (line_start, delimiters) = scan_backward(&mut file, anchor).map_err(io_err)?;
    let field_count = delimiters + 1;

    let mut raw = vec![0u8; (len - line_start) as usize];
    file.seek(SeekFrom::Start(line_start)).map_err(io_err)?;
    file.read_exact(&mut raw).map_err(io_err)?;

    let mut line: &[u8] = &raw;
    if line.last() == Some(&b'\n') {
        line = &line[..line.len() - 1];
    }
    if line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }

    if line.first() == Some(&b'#') {
        return Err(PollError::CommentLastRow(path.to_path_buf()));
    }

    let text = String::from_utf8_lossy(line);
    let mut fields = Vec::with_capacity(field_count);
    fields.extend(text.split(',').take(field_count).map(str::to_owned));
    Ok(fields)
}

/// Walks backward from `anchor` (inclusive) to the start of the file,
/// counting `,` bytes, until a `\n` is found. Returns the offset of the
/// first byte after the terminator (or 0 if none was found) and the
/// delimiter count.
fn scan_backward(file: &mut File, anchor: u64) -> std::io::Result<(u64, usize)> {
    let mut delimiters = 0usize;
    let mut buf = vec![0u8; SCAN_CHUNK];
    // Last byte of the chunk still to be examined.
    let mut end = anchor;

    loop {
        let start = end.saturating_sub(SCAN_CHUNK as u64 - 1);
        let chunk = &mut buf[..(end - start + 1) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;

        for (offset, byte) in chunk.iter().enumerate().rev() {
            match *byte {
                b',' => delimiters += 1,
                b'\n' => return Ok((start + offset as u64 + 1, delimiters)),
                _ => {}
            }
        }

        if start == 0 {
            return Ok((0, delimiters));
        }
        end = start - 1;
    }
}
