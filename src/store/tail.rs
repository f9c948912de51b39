//! Reverse buffered tail read
//!
//! Resuming only needs the last persisted record, so the file is scanned
//! backwards in fixed-size chunks instead of being parsed front to back.
//! Cost is O(1) in the file size for any sane line length.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::consts::TAIL_CHUNK;

/// Return the last line of `file` that contains more than whitespace.
///
/// Trailing newlines and blank lines are skipped. Returns `None` for an
/// empty (or all-blank) file.
pub fn last_nonempty_line(file: &mut File) -> io::Result<Option<String>> {
    let mut pos = file.seek(SeekFrom::End(0))?;
    let mut buf = vec![0u8; TAIL_CHUNK];
    // Bytes of the current candidate line, collected right-to-left.
    let mut reversed: Vec<u8> = Vec::new();

    'scan: while pos > 0 {
        let read_len = TAIL_CHUNK.min(pos as usize);
        pos -= read_len as u64;
        file.seek(SeekFrom::Start(pos))?;
        let chunk = &mut buf[..read_len];
        file.read_exact(chunk)?;

        for &byte in chunk.iter().rev() {
            if byte == b'\n' {
                if !is_blank(&reversed) {
                    break 'scan;
                }
                reversed.clear();
            } else {
                reversed.push(byte);
            }
        }
    }

    if is_blank(&reversed) {
        return Ok(None);
    }

    reversed.reverse();
    let line = String::from_utf8(reversed)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(line.trim().to_string()))
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn open_with(content: &str) -> File {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp.reopen().unwrap()
    }

    #[test]
    fn test_last_line_simple() {
        let mut file = open_with("first\nsecond\nthird\n");
        assert_eq!(
            last_nonempty_line(&mut file).unwrap(),
            Some("third".to_string())
        );
    }

    #[test]
    fn test_no_trailing_newline() {
        let mut file = open_with("first\nsecond");
        assert_eq!(
            last_nonempty_line(&mut file).unwrap(),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_blank_lines_at_the_end() {
        let mut file = open_with("only\n\n   \n\n");
        assert_eq!(
            last_nonempty_line(&mut file).unwrap(),
            Some("only".to_string())
        );
    }

    #[test]
    fn test_empty_file() {
        let mut file = open_with("");
        assert_eq!(last_nonempty_line(&mut file).unwrap(), None);
    }

    #[test]
    fn test_single_line_no_newline() {
        let mut file = open_with("header");
        assert_eq!(
            last_nonempty_line(&mut file).unwrap(),
            Some("header".to_string())
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut file = open_with("a\r\nb\r\n");
        assert_eq!(last_nonempty_line(&mut file).unwrap(), Some("b".to_string()));
    }

    #[test]
    fn test_file_larger_than_one_chunk() {
        let mut content = String::new();
        for i in 0..2000 {
            content.push_str(&format!("row number {i}\n"));
        }
        let mut file = open_with(&content);
        assert_eq!(
            last_nonempty_line(&mut file).unwrap(),
            Some("row number 1999".to_string())
        );
    }

    #[test]
    fn test_last_line_spanning_chunks() {
        let long_line = "x".repeat(TAIL_CHUNK + 100);
        let content = format!("short\n{long_line}");
        let mut file = open_with(&content);
        assert_eq!(last_nonempty_line(&mut file).unwrap(), Some(long_line));
    }
}
