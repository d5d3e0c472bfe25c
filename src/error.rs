use std::{fmt, io, path::PathBuf};

/// Errors that can abort a split
#[derive(Debug)]
pub enum SplitError {
    /// A NoteOff arrived while no voice on its channel was sounding that key
    MalformedSequence { channel: u8, key: u8, tick: u64 },
    /// Input file could not be read
    Read { path: PathBuf, source: io::Error },
    /// Input bytes are not a valid standard MIDI file
    Decode(midly::Error),
    /// An output voice could not be written
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::MalformedSequence { channel, key, tick } => write!(
                f,
                "Malformed sequence: note off for key {} on channel {} at tick {} has no sounding note",
                key, channel, tick
            ),
            SplitError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            SplitError::Decode(err) => write!(f, "Failed to parse MIDI file: {}", err),
            SplitError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::MalformedSequence { .. } => None,
            SplitError::Read { source, .. } | SplitError::Write { source, .. } => Some(source),
            SplitError::Decode(err) => Some(err),
        }
    }
}

impl From<midly::Error> for SplitError {
    fn from(err: midly::Error) -> Self {
        SplitError::Decode(err)
    }
}
