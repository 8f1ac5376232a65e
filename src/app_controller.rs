use log::{debug, info, warn};
use std::sync::Arc;

use crate::article::{Article, ArticleSource, BlankFillStore, render};
use crate::errors::{ArticleError, SessionError};
use crate::providers::ArticleProvider;
use crate::speech::{PlaybackController, PlaybackState, SpeechEvent, SpeechService};

// @module: Session controller for one game

/// An article together with the entries typed against it
///
/// The two are only ever replaced together, so entries can never be looked
/// up against the wrong token sequence.
#[derive(Debug, Clone)]
pub struct Round {
    pub article: Article,
    pub blanks: BlankFillStore,
}

/// Identifies one article fetch; only the most recent ticket may install its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The article replaced the current round
    Installed,
    /// A newer fetch was started meanwhile; the result was dropped
    Superseded,
}

/// Main application controller for one game session
pub struct Controller<P: ArticleProvider, S: SpeechService> {
    // @field: Article fetching pipeline, shareable with spawned fetches
    source: Arc<ArticleSource<P>>,
    // @field: Current article and entries
    round: Option<Round>,
    // @field: Speech playback
    playback: PlaybackController<S>,
    // @field: Ticket of the latest fetch
    latest_fetch: u64,
}

impl<P: ArticleProvider, S: SpeechService> Controller<P, S> {
    // @method: Create a controller with no article loaded
    pub fn new(source: ArticleSource<P>, speech: Arc<S>, language: impl Into<String>) -> Self {
        Self {
            source: Arc::new(source),
            round: None,
            playback: PlaybackController::new(speech, language),
            latest_fetch: 0,
        }
    }

    pub fn source(&self) -> Arc<ArticleSource<P>> {
        Arc::clone(&self.source)
    }

    pub fn article(&self) -> Option<&Article> {
        self.round.as_ref().map(|round| &round.article)
    }

    pub fn blanks(&self) -> Option<&BlankFillStore> {
        self.round.as_ref().map(|round| &round.blanks)
    }

    /// Announce a new fetch
    ///
    /// Invalidates every earlier ticket and stops playback, since the text
    /// being read is about to be replaced.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        self.playback.teardown();
        debug!("Fetch #{} started", self.latest_fetch);
        FetchTicket(self.latest_fetch)
    }

    /// Install the result of the fetch identified by `ticket`
    ///
    /// Failures leave the current round untouched. Results of superseded
    /// fetches are dropped, successful or not.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Article, ArticleError>,
    ) -> Result<FetchOutcome, ArticleError> {
        if ticket.0 != self.latest_fetch {
            debug!("Dropping result of superseded fetch #{}", ticket.0);
            return Ok(FetchOutcome::Superseded);
        }

        let article = result?;
        info!("Now playing: {}", article.display_title());
        self.round = Some(Round {
            article,
            blanks: BlankFillStore::new(),
        });
        Ok(FetchOutcome::Installed)
    }

    /// Fetch a random article and make it the current round
    pub async fn load_random_article(&mut self) -> Result<&Article, ArticleError> {
        let ticket = self.begin_fetch();
        let result = self.source.fetch_random_article().await;
        if let Err(e) = &result {
            warn!("Fetching a random article failed: {}", e);
        }
        self.complete_fetch(ticket, result)?;
        self.article().ok_or(ArticleError::NoArticleFound)
    }

    /// Record the player's text for the blank at token `index`
    pub fn set_blank(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NoArticle)?;
        round.blanks.set(round.article.tokens(), index, text)
    }

    /// Blanks holding non-empty text
    pub fn filled_count(&self) -> usize {
        self.blanks().map(BlankFillStore::filled_count).unwrap_or(0)
    }

    /// Every blank of the current article is filled
    pub fn is_complete(&self) -> bool {
        self.round
            .as_ref()
            .is_some_and(|round| round.blanks.is_complete(&round.article))
    }

    /// The article text with entries substituted, whether complete or not
    pub fn render(&self) -> Option<String> {
        self.round
            .as_ref()
            .map(|round| render(round.article.tokens(), &round.blanks))
    }

    /// Text to read aloud: present only once every blank is filled and
    /// there is something to say
    pub fn readable_text(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        self.render().filter(|text| !text.trim().is_empty())
    }

    /// Whether the read control should be enabled
    pub fn can_read(&self) -> bool {
        self.readable_text().is_some()
    }

    /// Start reading the completed article; no-op while the read control is disabled
    pub fn read_aloud(&mut self) -> PlaybackState {
        match self.readable_text() {
            Some(text) => self.playback.start(&text),
            None => {
                debug!("Read requested before the article is complete");
                self.playback.state()
            }
        }
    }

    pub fn pause_reading(&mut self) -> PlaybackState {
        self.playback.pause()
    }

    pub fn resume_reading(&mut self) -> PlaybackState {
        self.playback.resume()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Feed an event from the speech service
    pub fn handle_speech_event(&mut self, event: SpeechEvent) -> PlaybackState {
        match event {
            SpeechEvent::Ended(handle) => self.playback.on_utterance_end(handle),
        }
    }

    /// End of session: silence the speech service
    pub fn shutdown(&mut self) {
        info!("Shutting down session");
        self.playback.teardown();
    }
}
