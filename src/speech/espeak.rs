use std::process::Stdio;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::sync::mpsc;

use crate::errors::SpeechError;
use crate::speech::{SpeechEvent, SpeechService, UtteranceHandle, Voice};

/// Speech service running one espeak-ng child process per utterance
///
/// Each child is owned by a waiter task. Pausing stops the child with
/// `SIGSTOP` and resuming continues it with `SIGCONT`; cancelling kills it.
/// End of utterance is reported on the event channel once the child exits on
/// its own.
pub struct EspeakService {
    program: String,
    args: Vec<String>,
    events: mpsc::UnboundedSender<SpeechEvent>,
    state: Arc<Mutex<EspeakState>>,
    voice_cache: Mutex<Option<Vec<Voice>>>,
}

#[derive(Debug, Default)]
struct EspeakState {
    active: Option<Utterance>,
    next_id: u64,
}

#[derive(Debug)]
struct Utterance {
    handle: UtteranceHandle,
    control: mpsc::UnboundedSender<Control>,
}

/// Requests forwarded to the task owning the child
#[derive(Debug, Clone, Copy)]
enum Control {
    Pause,
    Resume,
    Kill,
}

impl EspeakService {
    pub fn new(program: impl Into<String>, events: mpsc::UnboundedSender<SpeechEvent>) -> Self {
        Self {
            program: program.into(),
            args: vec!["--stdin".to_string()],
            events,
            state: Arc::new(Mutex::new(EspeakState::default())),
            voice_cache: Mutex::new(None),
        }
    }

    /// Create a service together with the receiver for its events
    pub fn with_channel(program: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(program, sender), receiver)
    }

    /// Replace the arguments passed after the voice selection (`--stdin` by default)
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn control(&self, handle: UtteranceHandle, control: Control) -> Result<(), SpeechError> {
        let state = self.state.lock();
        match &state.active {
            Some(utterance) if utterance.handle == handle => utterance
                .control
                .send(control)
                .map_err(|_| SpeechError::UnknownUtterance(handle.0)),
            _ => Err(SpeechError::UnknownUtterance(handle.0)),
        }
    }

    fn list_voices(&self) -> Vec<Voice> {
        match std::process::Command::new(&self.program).arg("--voices").output() {
            Ok(output) if output.status.success() => parse_voice_list(&String::from_utf8_lossy(&output.stdout)),
            Ok(output) => {
                warn!("{} --voices exited with {}", self.program, output.status);
                Vec::new()
            }
            Err(e) => {
                warn!("Cannot list voices with {}: {}", self.program, e);
                Vec::new()
            }
        }
    }
}

/// Parse the table printed by `espeak-ng --voices`
pub fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 {
                return None;
            }
            Some(Voice::new(fields[4], fields[3].replace('_', " "), fields[1]))
        })
        .collect()
}

fn send_signal(child: &Child, signal: libc::c_int) {
    // id() is None once the child has been reaped, so a recycled pid is never hit
    let Some(pid) = child.id() else {
        return;
    };
    // SAFETY: kill has no memory-safety preconditions
    if unsafe { libc::kill(pid as libc::pid_t, signal) } != 0 {
        warn!("Cannot signal pid {}: {}", pid, std::io::Error::last_os_error());
    }
}

/// Feed `text` to the child, then follow it until it exits
async fn supervise(
    mut child: Child,
    text: String,
    handle: UtteranceHandle,
    mut controls: mpsc::UnboundedReceiver<Control>,
    state: Arc<Mutex<EspeakState>>,
    events: mpsc::UnboundedSender<SpeechEvent>,
) {
    if let Some(mut stdin) = child.stdin.take() {
        // written apart from the wait so a paused child cannot stall control handling
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                warn!("Failed to pass text to the synthesizer: {}", e);
            }
        });
    }

    let status = loop {
        tokio::select! {
            status = child.wait() => break status,
            Some(control) = controls.recv() => match control {
                Control::Pause => send_signal(&child, libc::SIGSTOP),
                Control::Resume => send_signal(&child, libc::SIGCONT),
                Control::Kill => {
                    if let Err(e) = child.start_kill() {
                        warn!("Cannot kill {}: {}", handle, e);
                    }
                }
            },
        }
    };

    let finished = {
        let mut state = state.lock();
        if state.active.as_ref().map(|utterance| utterance.handle) == Some(handle) {
            state.active = None;
            true
        } else {
            false
        }
    };
    if finished {
        debug!("{} ended with {:?}", handle, status);
        let _ = events.send(SpeechEvent::Ended(handle));
    } else {
        debug!("{} stopped with {:?}", handle, status);
    }
}

impl SpeechService for EspeakService {
    /// Listed once per service; the listing blocks on a child process
    fn voices(&self) -> Vec<Voice> {
        let mut cache = self.voice_cache.lock();
        if let Some(voices) = cache.as_ref() {
            return voices.clone();
        }
        let voices = self.list_voices();
        debug!("{} offers {} voice(s)", self.program, voices.len());
        *cache = Some(voices.clone());
        voices
    }

    fn synthesize(&self, text: &str, voice: Option<&Voice>) -> Result<UtteranceHandle, SpeechError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SpeechError::Unavailable(format!("No async runtime: {}", e)))?;
        let _guard = runtime.enter();

        self.cancel_all();

        let mut command = tokio::process::Command::new(&self.program);
        if let Some(voice) = voice {
            command.arg("-v").arg(&voice.id);
        }
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("Cannot start {}: {}", self.program, e)))?;
        let pid = child
            .id()
            .ok_or_else(|| SpeechError::Failed(format!("{} exited immediately", self.program)))?;

        let (control, controls) = mpsc::unbounded_channel();
        let handle = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let handle = UtteranceHandle(state.next_id);
            state.active = Some(Utterance { handle, control });
            handle
        };
        debug!("Started {} (pid {}) for {}", self.program, pid, handle);

        runtime.spawn(supervise(
            child,
            text.to_string(),
            handle,
            controls,
            Arc::clone(&self.state),
            self.events.clone(),
        ));

        Ok(handle)
    }

    fn pause(&self, handle: UtteranceHandle) -> Result<(), SpeechError> {
        self.control(handle, Control::Pause)
    }

    fn resume(&self, handle: UtteranceHandle) -> Result<(), SpeechError> {
        self.control(handle, Control::Resume)
    }

    fn cancel_all(&self) {
        if let Some(utterance) = self.state.lock().active.take() {
            debug!("Cancelling {}", utterance.handle);
            let _ = utterance.control.send(Control::Kill);
        }
    }
}
