// Purpose - external interfaces, format conversions

pub mod converter;
pub mod file;
pub mod midi;

pub use file::{split_file, write_voice, MidiFile, MidiFileWriter, SplitOutput};
pub use midi::{Event, EventKind, MetaEvent, TextKind};
