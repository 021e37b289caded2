use crate::config::{Config, ConfigError, ConfigPaths};
use clap::Args;
use std::fs;
use std::io;
use std::path::Path;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Write GOOGLE_API_KEY to .env (defaults to GOOGLE_API_KEY from current env)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path of the env file to update
    #[arg(long, default_value = ".env")]
    pub env_file: String,
}

pub fn run(args: &InitArgs, paths: &ConfigPaths) -> Result<(), ConfigError> {
    Config::load_or_create(paths)?;
    println!("config ready at {}", paths.config_path.display());

    let env_key = std::env::var(API_KEY_ENV).ok();
    let key = args
        .api_key
        .as_deref()
        .or(env_key.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match key {
        Some(key) => {
            write_env_file(Path::new(&args.env_file), key)?;
            println!("{API_KEY_ENV} written to {}", args.env_file);
        }
        None => println!("no API key given; pass --api-key or set {API_KEY_ENV}"),
    }
    Ok(())
}

fn write_env_file(path: &Path, key: &str) -> Result<(), io::Error> {
    let mut lines = match fs::read_to_string(path) {
        Ok(contents) => contents.lines().map(|l| l.to_string()).collect(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err),
    };

    upsert_env_var(&mut lines, API_KEY_ENV, key);

    let mut joined = lines.join("\n");
    joined.push('\n');
    fs::write(path, joined)
}

fn upsert_env_var(lines: &mut Vec<String>, key: &str, value: &str) {
    let prefix = format!("{key}=");
    for line in lines.iter_mut() {
        if line.starts_with(&prefix) {
            *line = format!("{key}={value}");
            return;
        }
    }
    lines.push(format!("{key}={value}"));
}
