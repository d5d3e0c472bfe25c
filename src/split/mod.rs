// Purpose: channel-to-voice demultiplexing
// Each channel is fanned out to as many monophonic voices as its polyphony needs

pub mod channel;
pub mod splitter;
pub mod voice;

pub use channel::{ChannelDemux, VoiceKey};
pub use splitter::{split, EmittedVoice, SplitSummary, StreamSplitter, VoiceLabel, VoiceSink};
pub use voice::{Voice, VoiceState};
