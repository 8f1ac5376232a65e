/*!
 * # Wikilibs - fill-in-the-blank games from random encyclopedia articles
 *
 * A Rust library that turns a random Wikipedia article into a word game and
 * reads the completed text aloud.
 *
 * ## Features
 *
 * - Fetch a random article (main namespace) with its thumbnail
 * - Tokenize the introduction; every hyperlink becomes a blank
 * - Collect the player's words and assemble the final text
 * - Read it aloud with pause/resume through a pluggable speech service
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `article`: Article pipeline:
 *   - `article::tokenizer`: HTML to tokens and blanks
 *   - `article::source`: Random article fetching
 *   - `article::blanks`: The player's entries
 *   - `article::assembler`: Final text assembly
 * - `speech`: Speech services and the playback state machine
 * - `app_controller`: Session controller tying article and playback together
 * - `language_utils`: ISO language code utilities
 * - `providers`: Remote article service clients:
 *   - `providers::wikipedia`: MediaWiki API client
 *   - `providers::mock`: Test double
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod article;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod speech;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FetchOutcome, FetchTicket};
pub use article::{Article, ArticleSource, BlankFillStore, Token};
pub use errors::{ArticleError, ProviderError, SessionError, SpeechError};
pub use speech::{PlaybackController, PlaybackState, SpeechService};
