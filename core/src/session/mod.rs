//! Session context
//!
//! A [`Session`] is built once per run and owns everything the host's
//! instrumentation layer talks to: the configuration, the input aggregator
//! and, depending on the mode, the recorder or player. Every hooked call in
//! the host maps to one method here.

mod paths;

pub use paths::{INDEX_EXTENSION, LOG_EXTENSION, SessionPaths};

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Config;
use crate::input::{CapabilityProvider, InputAggregator, PlayerSlot, RawReport};
use crate::replay::{
    InputSample, Player, Recorder, ReplayError, SessionIndexReader, SessionIndexRecord,
    SessionIndexWriter,
};

/// Failure to set up a session. All variants end the run.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot open replay log {}: {source}", path.display())]
    LogUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open session index {}: {source}", path.display())]
    IndexUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// What the session does with nondeterministic values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Live,
    Recording,
    Replaying,
}

enum Mode<W: Write, R: Read> {
    Live,
    Recording {
        recorder: Recorder<W>,
        index: SessionIndexWriter<W>,
    },
    Replaying {
        player: Player<R>,
    },
}

/// Log and index streams handed back when a recording ends
pub struct RecordedStreams<W> {
    pub log: W,
    pub index: W,
}

pub struct Session<P, W = BufWriter<File>, R = BufReader<File>>
where
    P: CapabilityProvider,
    W: Write,
    R: Read,
{
    config: Config,
    input: InputAggregator<P>,
    mode: Mode<W, R>,
}

fn attach_input<P: CapabilityProvider>(config: &Config, provider: P) -> InputAggregator<P> {
    let mut input = InputAggregator::new(provider);
    let attached = input.attach_configured(config);
    debug!("{} input devices attached", attached);
    input
}

impl<P: CapabilityProvider> Session<P> {
    /// A session that neither records nor replays
    pub fn live(config: Config, provider: P) -> Self {
        let input = attach_input(&config, provider);
        Self {
            config,
            input,
            mode: Mode::Live,
        }
    }

    /// Start recording into `paths`, creating the directory if needed
    pub fn record_to(config: Config, provider: P, paths: &SessionPaths) -> Result<Self, SessionError> {
        if let Some(dir) = paths.log.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SessionError::Create {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let create = |path: &PathBuf| {
            File::create(path)
                .map(BufWriter::new)
                .map_err(|source| SessionError::Create {
                    path: path.clone(),
                    source,
                })
        };
        let log = create(&paths.log)?;
        let index = create(&paths.index)?;

        info!("Recording session to {}", paths.log.display());
        Self::recording(config, provider, log, index)
    }

    /// Replay `attempt` from the files at `paths`.
    ///
    /// A missing log is fatal. A missing index means the session predates
    /// attempt tracking and playback starts at frame 0.
    pub fn replay_from(
        config: Config,
        provider: P,
        paths: &SessionPaths,
        attempt: usize,
    ) -> Result<Self, SessionError> {
        let log = File::open(&paths.log).map_err(|source| SessionError::LogUnavailable {
            path: paths.log.clone(),
            source,
        })?;
        let index = match File::open(&paths.index) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No session index at {}, starting at frame 0", paths.index.display());
                None
            }
            Err(source) => {
                return Err(SessionError::IndexUnavailable {
                    path: paths.index.clone(),
                    source,
                });
            }
        };

        info!("Replaying {} (attempt {})", paths.log.display(), attempt);
        Self::replaying(config, provider, BufReader::new(log), index, attempt)
    }
}

impl<P, W, R> Session<P, W, R>
where
    P: CapabilityProvider,
    W: Write,
    R: Read,
{
    /// Record into arbitrary streams
    pub fn recording(config: Config, provider: P, log: W, index: W) -> Result<Self, SessionError> {
        let recorder = Recorder::new(log)?;
        let index = SessionIndexWriter::new(index).map_err(ReplayError::from)?;
        let input = attach_input(&config, provider);
        Ok(Self {
            config,
            input,
            mode: Mode::Recording { recorder, index },
        })
    }

    /// Replay from arbitrary streams, fast-forwarding to `attempt`
    pub fn replaying(
        config: Config,
        provider: P,
        log: R,
        index: Option<R>,
        attempt: usize,
    ) -> Result<Self, SessionError> {
        let start_frame = match index {
            Some(index) => SessionIndexReader::new(index)?.find_start(attempt)?,
            None => 0,
        };
        let player = Player::new(log)?.with_start_frame(start_frame);
        let input = attach_input(&config, provider);
        Ok(Self {
            config,
            input,
            mode: Mode::Replaying { player },
        })
    }

    pub fn mode(&self) -> SessionMode {
        match self.mode {
            Mode::Live => SessionMode::Live,
            Mode::Recording { .. } => SessionMode::Recording,
            Mode::Replaying { .. } => SessionMode::Replaying,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn input(&self) -> &InputAggregator<P> {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputAggregator<P> {
        &mut self.input
    }

    /// The player, while replaying
    pub fn player(&self) -> Option<&Player<R>> {
        match &self.mode {
            Mode::Replaying { player } => Some(player),
            _ => None,
        }
    }

    /// Forward a raw device report to the aggregator
    pub fn handle_report(&mut self, report: RawReport<'_>) {
        self.input.update(report);
    }

    /// Input focus lost: drop every held button
    pub fn focus_lost(&mut self) {
        debug!("Input focus lost, clearing buttons");
        self.input.clear_all();
    }

    /// Button words the host should see this frame.
    ///
    /// While replaying the recorded sample replaces live input entirely.
    pub fn sample_input(&mut self) -> Result<InputSample, ReplayError> {
        let live = || {
            InputSample::from_buttons(
                self.input.combined_buttons(PlayerSlot::One),
                self.input.combined_buttons(PlayerSlot::Two),
            )
        };
        match &mut self.mode {
            Mode::Live => Ok(live()),
            Mode::Recording { recorder, .. } => {
                let sample = live();
                recorder.log_input(sample)?;
                Ok(sample)
            }
            Mode::Replaying { player } => player.next_input(),
        }
    }

    /// A random draw. `draw` produces the live value and is not called
    /// while replaying.
    pub fn random(&mut self, draw: impl FnOnce() -> i32) -> Result<i32, ReplayError> {
        match &mut self.mode {
            Mode::Live => Ok(draw()),
            Mode::Recording { recorder, .. } => {
                let value = draw();
                recorder.log_random(value)?;
                Ok(value)
            }
            Mode::Replaying { player } => player.next_random(),
        }
    }

    /// A persistent-storage read into `buf`. `read` performs the live read
    /// and reports success; it is not called while replaying.
    pub fn storage_read(
        &mut self,
        buf: &mut [u8],
        read: impl FnOnce(&mut [u8]) -> bool,
    ) -> Result<bool, ReplayError> {
        match &mut self.mode {
            Mode::Live => Ok(read(buf)),
            Mode::Recording { recorder, .. } => {
                let success = read(&mut *buf);
                recorder.log_storage_read(success.then_some(&*buf))?;
                Ok(success)
            }
            Mode::Replaying { player } => player.next_storage_read(buf),
        }
    }

    /// A persistent-storage write. Suppressed (and reported as successful)
    /// while replaying.
    pub fn storage_write(&mut self, write: impl FnOnce() -> bool) -> bool {
        match &self.mode {
            Mode::Replaying { player } => {
                player.suppress_storage_write();
                true
            }
            Mode::Live | Mode::Recording { .. } => write(),
        }
    }

    /// An attempt ended. Appends its record to the index while recording.
    pub fn attempt_finished(&mut self, record: &SessionIndexRecord) -> Result<(), ReplayError> {
        if let Mode::Recording { index, .. } = &mut self.mode {
            index.append(record)?;
            debug!(
                "Attempt {} indexed: start frame {}, {} frames",
                index.len() - 1,
                record.start_frame,
                record.frames_played
            );
        }
        Ok(())
    }

    /// Whether `frame` should be presented. Always true unless replaying
    /// toward a later attempt.
    pub fn should_present(&self, frame: i32) -> bool {
        match &self.mode {
            Mode::Replaying { player } => player.should_present(frame),
            _ => true,
        }
    }

    /// End the session, flushing a recording and returning its streams
    pub fn finish(self) -> Result<Option<RecordedStreams<W>>, ReplayError> {
        match self.mode {
            Mode::Live => Ok(None),
            Mode::Recording { recorder, index } => {
                let attempts = index.len();
                let log = recorder.finish()?;
                let index = index.into_inner()?;
                info!("Session index holds {} attempts", attempts);
                Ok(Some(RecordedStreams { log, index }))
            }
            Mode::Replaying { player } => {
                let counts = player.counts();
                info!(
                    "Replay finished: {} inputs, {} random draws, {} storage reads",
                    counts.input, counts.random, counts.storage_read
                );
                Ok(None)
            }
        }
    }
}
