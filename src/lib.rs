pub mod config;
pub mod error;
pub mod io; // MIDI file codec boundary
pub mod naming; // General MIDI labels for output names
pub mod sequencing; // Track merging into one timeline
pub mod split; // Channel-to-voice demultiplexing

pub use config::SplitConfig;
pub use error::SplitError;

/// Number of channels addressable in a MIDI stream.
pub const CHANNEL_COUNT: u8 = 16;
/// Channel 10 in 1-based numbering, reserved for drums by General MIDI.
pub const PERCUSSION_CHANNEL: u8 = 9;
