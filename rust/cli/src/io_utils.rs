//! File and stdin helpers used by the commands.
//!
//! Game histories may be stored plain (`.jsonl`) or Zstandard-compressed
//! (`.jsonl.zst`); [`read_text_auto`] picks the right reader from the file
//! extension.

use std::io::BufRead;

// Upper bound for a decompressed history file.
const MAX_DECOMPRESSED_BYTES: usize = 64 * 1024 * 1024;

/// Reads one line, trimmed. Returns `None` on EOF or a read error.
///
/// ```rust
/// use std::io::Cursor;
/// # use sabacc_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("  lock 1 \n");
/// assert_eq!(read_stdin_line(&mut input), Some("lock 1".to_string()));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Read a text file, decompressing it first when the path ends in `.zst`.
/// A leading UTF-8 BOM is stripped.
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path).map_err(|e| e.to_string())?;
        let dec = zstd::bulk::decompress(&comp, MAX_DECOMPRESSED_BYTES).map_err(|e| e.to_string())?;
        String::from_utf8(dec).map_err(|e| e.to_string())?
    } else {
        std::fs::read_to_string(path).map_err(|e| e.to_string())?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

pub fn is_history_file(path: &std::path::Path) -> bool {
    path.file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|name| name.ends_with(".jsonl") || name.ends_with(".jsonl.zst"))
}

pub fn ensure_parent_dir(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn read_line_trims_and_reports_eof() {
        let mut cursor = Cursor::new(b"  x 2  \n   \n".to_vec());
        assert_eq!(read_stdin_line(&mut cursor), Some("x 2".to_string()));
        assert_eq!(read_stdin_line(&mut cursor), Some(String::new()));
        assert_eq!(read_stdin_line(&mut cursor), None);
    }

    #[test]
    fn bom_is_stripped() {
        let mut s = "\u{feff}{}".to_string();
        strip_utf8_bom(&mut s);
        assert_eq!(s, "{}");
    }

    #[test]
    fn reads_compressed_histories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("games.jsonl.zst");
        let packed = zstd::bulk::compress(b"{\"a\":1}\n", 3).unwrap();
        std::fs::write(&path, packed).unwrap();

        let text = read_text_auto(&path.to_string_lossy()).unwrap();
        assert_eq!(text, "{\"a\":1}\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_text_auto("/nonexistent/games.jsonl").is_err());
    }

    #[test]
    fn history_extensions() {
        use std::path::Path;
        assert!(is_history_file(Path::new("a/b.jsonl")));
        assert!(is_history_file(Path::new("b.jsonl.zst")));
        assert!(!is_history_file(Path::new("b.json")));
    }

    #[test]
    fn ensure_parent_dir_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("runs").join("today").join("games.jsonl");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("runs").join("today").is_dir());
        assert!(ensure_parent_dir(std::path::Path::new("games.jsonl")).is_ok());
    }
}
