//! Standard MIDI file reading and per-voice writing.
//!
//! Reading merges every track of the file into one [`Timeline`]; writing
//! produces one single-track file per voice with the source file's timing.

use std::path::{Path, PathBuf};

use midly::{num::u28, Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};

use crate::{
    config::SplitConfig,
    error::SplitError,
    io::{converter, midi::Event},
    sequencing::Timeline,
    split::{split, SplitSummary, VoiceLabel, VoiceSink},
};

/// A decoded file: its time division plus the merged event stream
#[derive(Debug, Clone)]
pub struct MidiFile {
    pub timing: Timing,
    pub timeline: Timeline,
}

impl MidiFile {
    pub fn open(path: &Path) -> Result<Self, SplitError> {
        let data = std::fs::read(path).map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self, SplitError> {
        let smf = Smf::parse(data)?;
        let tracks = smf.tracks.iter().map(|track| decode_track(track));

        Ok(Self {
            timing: smf.header.timing,
            timeline: Timeline::merge(tracks),
        })
    }
}

/// Convert one track, folding the delta of skipped events into the next kept one.
fn decode_track(track: &[TrackEvent<'_>]) -> Vec<Event> {
    let mut carry: u32 = 0;
    let mut events = Vec::with_capacity(track.len());

    for event in track {
        let delta = carry.saturating_add(event.delta.as_int());
        match converter::midly_to_event(&event.kind) {
            Some(kind) => {
                events.push(Event::new(delta, kind));
                carry = 0;
            }
            None => carry = delta,
        }
    }

    events
}

/// Write `events` as a format 0 file. Returns the track length in ticks.
pub fn write_voice(path: &Path, timing: Timing, events: &[Event]) -> Result<u64, SplitError> {
    let mut track: Vec<TrackEvent<'_>> = events.iter().map(converter::event_to_midly).collect();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(Format::SingleTrack, timing));
    smf.tracks.push(track);
    smf.save(path).map_err(|source| SplitError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(events.iter().map(|e| u64::from(e.delta)).sum())
}

/// Sink that writes each voice to `<dir>/<label file name>`.
pub struct MidiFileWriter {
    dir: PathBuf,
    base_name: String,
    timing: Timing,
    written: Vec<PathBuf>,
}

impl MidiFileWriter {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>, timing: Timing) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            timing,
            written: Vec::new(),
        }
    }

    /// Paths written, in emission order
    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl VoiceSink for MidiFileWriter {
    fn accept(&mut self, label: &VoiceLabel, events: &[Event]) -> Result<(), SplitError> {
        let path = self.dir.join(label.file_name(&self.base_name));
        let ticks = write_voice(&path, self.timing, events)?;
        tracing::info!(path = %path.display(), ticks, "wrote voice");
        self.written.push(path);
        Ok(())
    }
}

/// What [`split_file`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub summary: SplitSummary,
    /// One path per emitted voice, in emission order
    pub paths: Vec<PathBuf>,
}

/// Read `input`, split it and write one file per voice.
pub fn split_file(input: &Path, config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let file = MidiFile::open(input)?;

    tracing::info!(
        input = %input.display(),
        events = file.timeline.events().len(),
        ticks = file.timeline.len_ticks(),
        "loaded"
    );
    for channel in file.timeline.channels() {
        tracing::debug!(
            channel,
            polyphony = file.timeline.max_polyphony(channel),
            "channel"
        );
    }

    let dir = config.resolve_output_dir(input);
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&dir).map_err(|source| SplitError::Write {
            path: dir.clone(),
            source,
        })?;
    }

    let mut writer = MidiFileWriter::new(dir, config.resolve_base_name(input), file.timing);
    let summary = split(&file.timeline, config, &mut writer)?;

    Ok(SplitOutput {
        summary,
        paths: writer.into_written(),
    })
}
