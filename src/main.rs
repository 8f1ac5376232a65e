// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, Log, Metadata, Record, Level, SetLoggerError, error, info, warn};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use wikilibs::app_config::{Config, LogLevel};
use wikilibs::article::{Article, ArticleSource, Token, placeholder_for};
use wikilibs::providers::ArticleProvider;
use wikilibs::providers::wikipedia::Wikipedia;
use wikilibs::speech::{PlaybackState, SpeechService};
use wikilibs::Controller;

const FETCH_MESSAGE: &str = "Fetching a random article...";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill in a random article and have it read aloud (default command)
    Play,

    /// Print a random article with its blanks and exit
    Show {
        /// Print the article as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions for wikilibs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Wikilibs - the silly encyclopedia
///
/// Fetches a random Wikipedia article, blanks out every linked phrase,
/// lets you fill the blanks in and reads the result aloud.
#[derive(Parser, Debug)]
#[command(name = "wikilibs")]
#[command(version)]
#[command(about = "Fill-in-the-blank games from random Wikipedia articles")]
#[command(long_about = "Wikilibs fetches a random Wikipedia article, turns every hyperlink into a blank \
and reads your completed version aloud.

EXAMPLES:
    wikilibs                             # Play with the default config
    wikilibs show                        # Print an article with its blanks
    wikilibs show --json                 # Same, as JSON tokens
    wikilibs --language en-GB            # Prefer British English voices
    wikilibs --log-level debug           # Verbose logging
    wikilibs completions bash > wikilibs.bash

WHILE READING:
    p  pause    r  resume    n  new article    q  quit")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "wikilibs.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Voice language code (e.g., 'en', 'en-US')
    #[arg(long, env = "WIKILIBS_LANGUAGE")]
    language: Option<String>,

    /// MediaWiki API endpoint
    #[arg(long)]
    endpoint: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "wikilibs", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    let provider = Wikipedia::from_config(&config.article)
        .context("Failed to create the Wikipedia client")?;
    let source = ArticleSource::new(provider).with_namespace(config.article.namespace);

    match cli.command {
        Some(Commands::Show { json }) => run_show(source, json).await,
        _ => run_play(source, &config).await,
    }
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(language) = &cli.language {
        config.speech.language = language.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.article.endpoint = endpoint.clone();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

// @returns: Output of `task`, with a spinner shown while it runs
async fn with_spinner<T>(message: &'static str, task: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = task.await;
    spinner.finish_and_clear();
    output
}

fn print_article(article: &Article) {
    println!("\n{}\nFrom Wikilibs, the silly encyclopedia\n", article.title());
    if let Some(image) = article.image_url() {
        println!("Image: {}\n", image);
    }

    let mut blank_number = 0;
    let words: Vec<String> = article
        .tokens()
        .iter()
        .enumerate()
        .map(|(index, token)| match token {
            Token::Word(word) => word.clone(),
            Token::Blank => {
                blank_number += 1;
                format!("[{}: {}]", blank_number, placeholder_for(index))
            }
        })
        .collect();
    println!("{}\n", words.join(" "));
}

async fn run_show(source: ArticleSource<Wikipedia>, json: bool) -> Result<()> {
    let article = with_spinner(FETCH_MESSAGE, source.fetch_random_article()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&article)?);
    } else {
        print_article(&article);
    }
    Ok(())
}

/// What the player asked for at a step of a round
#[derive(Debug, PartialEq)]
enum Next {
    Read,
    NewArticle,
    Quit,
}

#[cfg(unix)]
async fn run_play(source: ArticleSource<Wikipedia>, config: &Config) -> Result<()> {
    use wikilibs::language_utils::get_language_name;
    use wikilibs::speech::espeak::EspeakService;

    info!("Reading aloud with {} voices", get_language_name(&config.speech.language)?);
    let (speech, mut events) = EspeakService::with_channel(config.speech.program.clone());
    let mut controller = Controller::new(source, std::sync::Arc::new(speech), config.speech.language.clone());
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Err(e) = with_spinner(FETCH_MESSAGE, controller.load_random_article()).await {
            error!("There was an issue loading the article: {}", e);
            if ask_yes(&mut stdin, "Try another article?", e.is_retryable()).await? {
                continue;
            }
            break;
        }
        if let Some(article) = controller.article() {
            print_article(article);
        }

        match fill_blanks(&mut controller, &mut stdin).await? {
            Next::Read => {}
            Next::NewArticle => continue,
            Next::Quit => break,
        }

        let Some(text) = controller.readable_text() else {
            warn!("Nothing to read in this article");
            if ask_yes(&mut stdin, "Try another article?", true).await? {
                continue;
            }
            break;
        };
        println!("{}\n", text);

        if controller.read_aloud() != PlaybackState::Speaking {
            warn!("Speech is unavailable; check that {} is installed", config.speech.program);
        }

        let next = loop {
            if controller.playback_state() == PlaybackState::Idle {
                break if ask_yes(&mut stdin, "Another article?", true).await? {
                    Next::NewArticle
                } else {
                    Next::Quit
                };
            }

            tokio::select! {
                Some(event) = events.recv() => {
                    controller.handle_speech_event(event);
                }
                line = stdin.next_line() => {
                    match line?.as_deref().map(str::trim) {
                        Some("p") => { controller.pause_reading(); }
                        Some("r") => { controller.resume_reading(); }
                        Some("n") => break Next::NewArticle,
                        Some("q") | None => break Next::Quit,
                        Some(other) => println!("Unknown command '{}': p, r, n or q", other),
                    }
                }
                _ = tokio::signal::ctrl_c() => break Next::Quit,
            }
        };

        if let Next::Quit = next {
            break;
        }
    }

    controller.shutdown();
    info!("Bye!");
    Ok(())
}

#[cfg(not(unix))]
async fn run_play(_source: ArticleSource<Wikipedia>, _config: &Config) -> Result<()> {
    Err(anyhow!("Speech playback is only supported on unix; use `wikilibs show`"))
}

async fn fill_blanks<P: ArticleProvider, S: SpeechService, R: AsyncBufRead + Unpin>(
    controller: &mut Controller<P, S>,
    input: &mut Lines<R>,
) -> Result<Next> {
    let blanks: Vec<usize> = controller
        .article()
        .map(|article| article.blank_indices().collect())
        .unwrap_or_default();

    for (number, index) in blanks.iter().enumerate() {
        loop {
            print!("[{}] {}: ", number + 1, placeholder_for(*index));
            std::io::stdout().flush()?;

            let Some(line) = input.next_line().await? else {
                return Ok(Next::Quit);
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            controller
                .set_blank(*index, word)
                .map_err(|e| anyhow!("Cannot fill blank {}: {}", number + 1, e))?;
            break;
        }
    }

    info!("Filled {} of {} blanks", controller.filled_count(), blanks.len());
    Ok(Next::Read)
}

// @returns: The player's answer; an empty line takes `default_yes`, closed input is a no
async fn ask_yes<R: AsyncBufRead + Unpin>(input: &mut Lines<R>, question: &str, default_yes: bool) -> Result<bool> {
    print!("{} {} ", question, if default_yes { "[Y/n]" } else { "[y/N]" });
    std::io::stdout().flush()?;

    let Some(answer) = input.next_line().await? else {
        return Ok(false);
    };
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return Ok(default_yes);
    }
    Ok(answer.starts_with('y'))
}
