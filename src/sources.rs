use std::io::{self, IsTerminal, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// Gather feed sources: arguments first, then piped stdin, then the input
/// file, then the config file's `feeds`.
pub fn collect(args: &[String], input: Option<&Path>, extra: &[String]) -> Result<Vec<String>> {
    let stdin = io::stdin();
    let piped = if stdin.is_terminal() {
        Vec::new()
    } else {
        read_tokens(stdin.lock())?
    };

    gather(args, piped, input, extra)
}

pub fn gather(
    args: &[String],
    piped: Vec<String>,
    input: Option<&Path>,
    extra: &[String],
) -> Result<Vec<String>> {
    let mut sources = args.to_vec();
    sources.extend(piped);
    if let Some(path) = input {
        sources.extend(read_lines(path)?);
    }
    sources.extend(extra.iter().cloned());
    Ok(sources)
}

/// Whitespace separated tokens, as piped in by `cat feeds.txt | feed-digest`.
pub fn read_tokens<R: Read>(mut reader: R) -> Result<Vec<String>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(input.split_whitespace().map(String::from).collect())
}

/// Non-empty lines of a source list file. Lines starting with `#` are comments.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::InputFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_read_tokens_splits_on_any_whitespace() {
        let input = "https://a.example.com/rss  https://b.example.com/rss\n\n\thttps://c.example.com/rss\n";
        let tokens = read_tokens(input.as_bytes()).unwrap();
        assert_eq!(
            tokens,
            strings(&[
                "https://a.example.com/rss",
                "https://b.example.com/rss",
                "https://c.example.com/rss",
            ])
        );
    }

    #[test]
    fn test_read_tokens_empty() {
        assert!(read_tokens("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_lines_skips_blank_and_comments() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "# my feeds\nhttps://a.example.com/rss\n\n   \n  https://b.example.com/rss  \n"
        )
        .unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(
            lines,
            strings(&["https://a.example.com/rss", "https://b.example.com/rss"])
        );
    }

    #[test]
    fn test_read_lines_missing_file() {
        let result = read_lines(Path::new("/nonexistent/feeds.txt"));
        assert!(matches!(result, Err(Error::InputFile { .. })));
    }

    #[test]
    fn test_gather_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();

        let sources = gather(
            &strings(&["arg-1", "arg-2"]),
            strings(&["piped"]),
            Some(file.path()),
            &strings(&["from-config"]),
        )
        .unwrap();

        assert_eq!(
            sources,
            strings(&["arg-1", "arg-2", "piped", "from-file", "from-config"])
        );
    }

    #[test]
    fn test_gather_keeps_duplicates() {
        let sources = gather(&strings(&["a", "a"]), strings(&["a"]), None, &[]).unwrap();
        assert_eq!(sources.len(), 3);
    }
}
