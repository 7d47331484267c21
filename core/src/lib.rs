//! Framelock Core - unified arcade input with deterministic replay
//!
//! This crate merges several heterogeneous input devices into one canonical
//! button mask per player, and records every nondeterministic value a host
//! game consumes (input samples, random draws, storage reads) so a later
//! session can replay the exact same outcomes frame for frame.
//!
//! # Architecture
//!
//! - [`Config`] - Dotted-key configuration store with typed, default-on-miss lookups
//! - [`InputAggregator`] - Owns attached devices and combines their button masks
//! - [`DirectionPriorityResolver`] - Last-pressed-wins directional override stack
//! - [`Recorder`] / [`Player`] - Nondeterminism log recording and playback
//! - [`SessionIndexWriter`] / [`SessionIndexReader`] - Per-attempt start frames
//! - [`Session`] - Session context the host's instrumentation layer drives

pub mod config;
pub mod input;
pub mod replay;
pub mod session;

pub use config::{Config, ConfigError, ConfigSource};
pub use input::{
    AxisRole, Buttons, CapabilityBinding, CapabilityProvider, Device, DeviceDescriptor,
    DeviceHandle, DirectionPriorityResolver, HidDevice, HidReport, InputAggregator,
    KeyboardDevice, LogicalMeaning, NoDevices, PlayerSlot, ProviderError, RawCapability,
    RawReport,
};
pub use replay::{
    EntryKind, InputSample, PlayTime, Player, Recorder, ReplayError, SessionIndexReader,
    SessionIndexRecord, SessionIndexWriter,
};
pub use session::{RecordedStreams, Session, SessionError, SessionMode, SessionPaths};

/// Initialize `tracing` output for the host process.
///
/// Honors `RUST_LOG` and falls back to `info`. Calling it more than once is
/// harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
