use precis_core::text::{TextStats, compression_ratio};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SUMMARY_FILE_NAME: &str = "summary.txt";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("summary write failed: {0}")]
    Io(#[from] io::Error),
}

/// Write the summary verbatim to `<dir>/summary.txt`, replacing any previous one.
pub fn write_summary(dir: &Path, summary: &str) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SUMMARY_FILE_NAME);
    let tmp_path = dir.join(".summary.txt.tmp");
    fs::write(&tmp_path, summary.as_bytes())?;
    fs::rename(&tmp_path, &path)?;
    Ok(path)
}

pub fn input_stats_line(stats: &TextStats) -> String {
    format!(
        "text stats: {} words, {} characters",
        stats.words, stats.characters
    )
}

pub fn summary_stats_line(input: &TextStats, summary: &TextStats) -> String {
    format!(
        "summary stats: {} words, {} characters ({}% compression)",
        summary.words,
        summary.characters,
        compression_ratio(input.words, summary.words)
    )
}

#[cfg(test)]
mod tests {
    use super::{input_stats_line, summary_stats_line, write_summary};
    use precis_core::text::TextStats;
    use std::fs;

    #[test]
    fn writes_summary_exactly() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("out");
        let summary = "Le texte parle de chats.";
        let path = write_summary(&dir, summary).unwrap();
        assert_eq!(path.file_name().unwrap(), "summary.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), summary);
        assert!(!dir.join(".summary.txt.tmp").exists());
    }

    #[test]
    fn overwrites_previous_summary() {
        let temp = tempfile::tempdir().unwrap();
        write_summary(temp.path(), "first version of the summary").unwrap();
        let path = write_summary(temp.path(), "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn stats_lines_include_compression() {
        let input = TextStats {
            words: 300,
            characters: 1800,
        };
        let summary = TextStats {
            words: 100,
            characters: 600,
        };
        assert_eq!(
            input_stats_line(&input),
            "text stats: 300 words, 1800 characters"
        );
        assert_eq!(
            summary_stats_line(&input, &summary),
            "summary stats: 100 words, 600 characters (66.7% compression)"
        );
    }
}
