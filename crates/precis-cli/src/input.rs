use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIN_INPUT_CHARS: usize = 50;

const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unsupported file type {0}; upload a .txt or .md file")]
    UnsupportedType(PathBuf),
    #[error("error reading file: {0}")]
    Io(#[from] io::Error),
    #[error("error reading file: {0} is not valid UTF-8")]
    NotUtf8(String),
    #[error("please provide at least {MIN_INPUT_CHARS} characters of text for summarization")]
    TooShort,
}

/// Read input text from a `.txt`/`.md` file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, InputError> {
    let text = match path {
        Some(path) => read_file(path)?,
        None => {
            let mut bytes = Vec::new();
            io::stdin().lock().read_to_end(&mut bytes)?;
            decode(bytes, "stdin")?
        }
    };
    ensure_min_length(&text)?;
    Ok(text)
}

pub fn read_file(path: &Path) -> Result<String, InputError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(InputError::UnsupportedType(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    decode(bytes, &path.display().to_string())
}

fn decode(bytes: Vec<u8>, label: &str) -> Result<String, InputError> {
    String::from_utf8(bytes).map_err(|_| InputError::NotUtf8(label.to_string()))
}

pub fn ensure_min_length(text: &str) -> Result<(), InputError> {
    if text.trim().chars().count() < MIN_INPUT_CHARS {
        return Err(InputError::TooShort);
    }
    Ok(())
}
