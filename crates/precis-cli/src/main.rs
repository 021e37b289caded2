mod config;
mod config_cmd;
mod init;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use config::{Config, ConfigPaths};
use precis_core::text::TextStats;
use precis_core::{ModelConfig, ModelInfo, Summarizer, SummaryRequest, SummaryStyle};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "precis", version, about = "AI text summarizer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print debug logs to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Create the config file and store an API key in .env
    Init(init::InitArgs),
    /// Show or change configuration
    Config(config_cmd::ConfigArgs),
    /// Check that the API key is accepted
    Check,
    /// Show the model in use
    Info,
}

#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Text file to summarize (.txt or .md); reads stdin when omitted
    file: Option<PathBuf>,

    /// Summary style: brief, detailed or bullet-points
    #[arg(long)]
    style: Option<String>,

    /// Approximate summary length in words (50-500)
    #[arg(long, value_name = "words")]
    length: Option<u32>,

    /// Output language
    #[arg(long)]
    language: Option<String>,

    /// Directory that receives summary.txt
    #[arg(long, value_name = "dir")]
    output: Option<PathBuf>,

    /// Do not write summary.txt
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Clone)]
struct ResolvedRunArgs {
    file: Option<PathBuf>,
    style: SummaryStyle,
    max_words: u32,
    language: String,
    save_dir: Option<PathBuf>,
}

impl RunArgs {
    fn resolve(self, config: &Config, cwd: &std::path::Path) -> ResolvedRunArgs {
        let style = SummaryStyle::from_label(
            self.style
                .as_deref()
                .unwrap_or(config.summary.style.as_str()),
        );
        let max_words = precis_core::clamp_summary_words(self.length.unwrap_or(config.summary.length));
        let language = self
            .language
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| config.summary.language.clone());
        let save_dir = if self.no_save || (!config.output.save && self.output.is_none()) {
            None
        } else {
            Some(self.output.unwrap_or_else(|| config.output_dir(cwd)))
        };

        ResolvedRunArgs {
            file: self.file,
            style,
            max_words,
            language,
            save_dir,
        }
    }
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `PRECIS_API_KEY` beats the config file, which beats `GOOGLE_API_KEY`.
fn resolve_api_key(
    config: &Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    lookup("PRECIS_API_KEY")
        .or_else(|| {
            let value = config.provider.api_key.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .or_else(|| lookup(init::API_KEY_ENV))
}

fn resolve_base_url(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("GEMINI_BASE_URL").unwrap_or_else(|| config.provider.base_url.clone())
}

fn build_summarizer(config: &Config) -> Result<Summarizer, String> {
    let api_key = resolve_api_key(config, env_override)
        .ok_or_else(|| format!("Google API key not found; set {}", init::API_KEY_ENV))?;
    let model = ModelConfig::new(&api_key)
        .map_err(|e| e.to_string())?
        .with_base_url(&resolve_base_url(config, env_override));
    Summarizer::from_config(model).map_err(|e| e.to_string())
}

fn render_model_info(info: &ModelInfo) -> String {
    format!(
        "model: {}\nprovider: {}\nframework: {}\nmax tokens: {}\ntemperature: {}",
        info.model_name, info.provider, info.framework, info.max_tokens, info.temperature
    )
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let paths = match ConfigPaths::from_home() {
        Ok(paths) => paths,
        Err(err) => fail("config paths error", err),
    };

    let (config, warnings) = match Config::load_or_create_with_warnings(&paths) {
        Ok(loaded) => loaded,
        Err(err) => fail("config load failed", err),
    };

    logging::init(logging::effective_level(cli.verbose, &config.log.level));
    config::emit_warnings(&warnings);

    let edits_config = matches!(cli.command, Some(Command::Config(_) | Command::Init(_)));
    if !edits_config && let Err(err) = config.validate() {
        fail("config invalid", err);
    }

    if let Some(command) = cli.command {
        match command {
            Command::Init(args) => {
                if let Err(e) = init::run(&args, &paths) {
                    fail("init failed", e);
                }
            }
            Command::Config(args) => {
                if let Err(e) = config_cmd::run(&args, &paths) {
                    fail("config failed", e);
                }
            }
            Command::Check => {
                let summarizer = build_summarizer(&config)
                    .unwrap_or_else(|e| fail("failed to initialize summarizer", e));
                if summarizer.validate_api_key() {
                    println!("API key is valid");
                } else {
                    fail("check failed", "API key was not accepted");
                }
            }
            Command::Info => {
                let summarizer = build_summarizer(&config)
                    .unwrap_or_else(|e| fail("failed to initialize summarizer", e));
                println!("{}", render_model_info(summarizer.model_info()));
            }
        }
        return;
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => fail("working directory unavailable", err),
    };
    let run = cli.run.resolve(&config, &cwd);

    let summarizer =
        build_summarizer(&config).unwrap_or_else(|e| fail("failed to initialize summarizer", e));

    let text = match input::read_input(run.file.as_deref()) {
        Ok(text) => text,
        Err(err) => fail("input rejected", err),
    };
    let input_stats = TextStats::from_text(&text);
    eprintln!("{}", output::input_stats_line(&input_stats));

    let request = SummaryRequest::new(text, run.style, run.max_words, run.language);
    let summary = match summarizer.summarize(&request) {
        Ok(summary) => summary,
        Err(err) => fail("error generating summary", err),
    };

    println!("{summary}");
    let summary_stats = TextStats::from_text(&summary);
    eprintln!("{}", output::summary_stats_line(&input_stats, &summary_stats));

    if let Some(dir) = run.save_dir {
        match output::write_summary(&dir, &summary) {
            Ok(path) => eprintln!("saved to {}", path.display()),
            Err(err) => fail("save failed", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RunArgs, render_model_info, resolve_api_key, resolve_base_url};
    use crate::config::Config;
    use precis_core::{ModelConfig, SummaryStyle};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn run_args() -> RunArgs {
        RunArgs {
            file: None,
            style: None,
            length: None,
            language: None,
            output: None,
            no_save: false,
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn resolve_uses_config_defaults() {
        let run = run_args().resolve(&Config::default(), Path::new("/work"));
        assert_eq!(run.style, SummaryStyle::Brief);
        assert_eq!(run.max_words, 150);
        assert_eq!(run.language, "english");
        assert_eq!(run.save_dir, Some(PathBuf::from("/work")));
    }

    #[test]
    fn resolve_prefers_flags_and_clamps_length() {
        let mut args = run_args();
        args.style = Some("Detailed".to_string());
        args.length = Some(5_000);
        args.language = Some("french".to_string());
        args.output = Some(PathBuf::from("/out"));
        let run = args.resolve(&Config::default(), Path::new("/work"));
        assert_eq!(run.style, SummaryStyle::Detailed);
        assert_eq!(run.max_words, 500);
        assert_eq!(run.language, "french");
        assert_eq!(run.save_dir, Some(PathBuf::from("/out")));
    }

    #[test]
    fn resolve_unknown_style_is_brief() {
        let mut args = run_args();
        args.style = Some("sonnet".to_string());
        let run = args.resolve(&Config::default(), Path::new("/work"));
        assert_eq!(run.style, SummaryStyle::Brief);
    }

    #[test]
    fn resolve_respects_save_switches() {
        let mut args = run_args();
        args.no_save = true;
        let run = args.resolve(&Config::default(), Path::new("/work"));
        assert_eq!(run.save_dir, None);

        let mut config = Config::default();
        config.output.save = false;
        let run = run_args().resolve(&config, Path::new("/work"));
        assert_eq!(run.save_dir, None);
    }

    #[test]
    fn api_key_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_api_key(&config, lookup(&[])), None);
        assert_eq!(
            resolve_api_key(&config, lookup(&[("GOOGLE_API_KEY", "google")])).as_deref(),
            Some("google")
        );
        config.provider.api_key = "from-config".to_string();
        assert_eq!(
            resolve_api_key(&config, lookup(&[("GOOGLE_API_KEY", "google")])).as_deref(),
            Some("from-config")
        );
        assert_eq!(
            resolve_api_key(
                &config,
                lookup(&[("GOOGLE_API_KEY", "google"), ("PRECIS_API_KEY", "override")])
            )
            .as_deref(),
            Some("override")
        );
    }

    #[test]
    fn base_url_env_wins_over_config() {
        let mut config = Config::default();
        config.provider.base_url = "http://config".to_string();
        assert_eq!(resolve_base_url(&config, lookup(&[])), "http://config");
        assert_eq!(
            resolve_base_url(&config, lookup(&[("GEMINI_BASE_URL", "http://env")])),
            "http://env"
        );
    }

    #[test]
    fn model_info_lists_descriptor_fields() {
        let info = ModelConfig::new("k").unwrap().model_info();
        let rendered = render_model_info(&info);
        assert!(rendered.contains("model: gemini-1.5-flash"));
        assert!(rendered.contains("provider: Google"));
        assert!(rendered.contains("max tokens: 1024"));
    }
}
