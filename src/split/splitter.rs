use std::collections::BTreeSet;

use crate::{
    config::SplitConfig,
    error::SplitError,
    io::midi::Event,
    sequencing::Timeline,
    split::channel::ChannelDemux,
};

/// Naming key handed to a sink alongside each voice's events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoiceLabel {
    pub channel: u8,
    pub instrument: u8,
    pub instrument_name: String,
    /// Present only when several voices share this channel and instrument
    pub instance: Option<usize>,
}

impl VoiceLabel {
    /// e.g. `song-ch00-Acoustic_Grand_Piano-2.mid`
    pub fn file_name(&self, base: &str) -> String {
        let name = self
            .instrument_name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        match self.instance {
            Some(n) => format!("{}-ch{:02}-{}-{}.mid", base, self.channel, name, n),
            None => format!("{}-ch{:02}-{}.mid", base, self.channel, name),
        }
    }
}

/// Receives each finished voice exactly once.
pub trait VoiceSink {
    fn accept(&mut self, label: &VoiceLabel, events: &[Event]) -> Result<(), SplitError>;
}

/// A voice collected in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedVoice {
    pub label: VoiceLabel,
    pub events: Vec<Event>,
}

impl VoiceSink for Vec<EmittedVoice> {
    fn accept(&mut self, label: &VoiceLabel, events: &[Event]) -> Result<(), SplitError> {
        self.push(EmittedVoice {
            label: label.clone(),
            events: events.to_vec(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Emitted voices, in channel then creation order
    pub voices: Vec<VoiceLabel>,
    /// Common length every voice was padded to
    pub length_ticks: u64,
}

/// Fans the merged stream out to one demultiplexer per channel.
pub struct StreamSplitter {
    channels: Vec<ChannelDemux>,
}

impl StreamSplitter {
    pub fn new<I>(channels: I, config: &SplitConfig) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let channels = channels
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|c| ChannelDemux::new(c, config.is_percussion(c)))
            .collect();

        Self { channels }
    }

    /// Offer one event to every channel.
    pub fn feed(&mut self, event: &Event) -> Result<(), SplitError> {
        for demux in &mut self.channels {
            demux.dispatch(event)?;
        }
        Ok(())
    }

    pub fn channels(&self) -> &[ChannelDemux] {
        &self.channels
    }

    /// Length every output will be padded to
    pub fn max_length(&self) -> u64 {
        self.channels
            .iter()
            .map(ChannelDemux::max_length)
            .max()
            .unwrap_or(0)
    }

    /// Pad all voices to the common length and emit them.
    pub fn finish<S>(self, sink: &mut S) -> Result<SplitSummary, SplitError>
    where
        S: VoiceSink + ?Sized,
    {
        let length_ticks = self.max_length();
        let mut voices = Vec::new();

        for demux in self.channels {
            tracing::debug!(
                channel = demux.channel(),
                voices = demux.voice_count(),
                "emitting channel"
            );
            voices.extend(demux.emit(length_ticks, sink)?);
        }

        Ok(SplitSummary {
            voices,
            length_ticks,
        })
    }
}

/// Split a merged timeline into monophonic voices.
///
/// Nothing reaches `sink` unless the whole stream was routed successfully.
pub fn split<S>(timeline: &Timeline, config: &SplitConfig, sink: &mut S) -> Result<SplitSummary, SplitError>
where
    S: VoiceSink + ?Sized,
{
    let mut splitter = StreamSplitter::new(timeline.channels(), config);
    for event in timeline.events() {
        splitter.feed(event)?;
    }
    splitter.finish(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(instrument_name: &str, instance: Option<usize>) -> VoiceLabel {
        VoiceLabel {
            channel: 9,
            instrument: 42,
            instrument_name: instrument_name.to_string(),
            instance,
        }
    }

    #[test]
    fn test_file_name_without_instance() {
        assert_eq!(
            label("Closed Hi-Hat", None).file_name("groove"),
            "groove-ch09-Closed_Hi_Hat.mid"
        );
    }

    #[test]
    fn test_file_name_with_instance() {
        assert_eq!(
            label("Acoustic Guitar (nylon)", Some(3)).file_name("song"),
            "song-ch09-Acoustic_Guitar_nylon-3.mid"
        );
    }

    #[test]
    fn test_channels_are_deduplicated_and_sorted() {
        let splitter = StreamSplitter::new([9, 0, 9, 3], &SplitConfig::default());
        let channels: Vec<u8> = splitter.channels().iter().map(|d| d.channel()).collect();
        assert_eq!(channels, vec![0, 3, 9]);
        assert!(splitter.channels()[2].is_percussion());
        assert!(!splitter.channels()[0].is_percussion());
    }

    #[test]
    fn test_meta_reaches_every_channel() {
        let timeline = Timeline::from_events(vec![
            Event::tempo(0, 500_000),
            Event::note_on(0, 0, 60, 100),
            Event::note_on(0, 1, 40, 100),
            Event::tempo(10, 400_000),
            Event::note_off(10, 0, 60),
            Event::note_off(0, 1, 40),
        ]);

        let mut out: Vec<EmittedVoice> = Vec::new();
        let summary = split(&timeline, &SplitConfig::default(), &mut out).unwrap();

        assert_eq!(summary.length_ticks, 20);
        assert_eq!(out.len(), 2);
        for voice in &out {
            let tempos = voice
                .events
                .iter()
                .filter(|e| matches!(e.kind, crate::io::midi::EventKind::Meta(_)))
                .count();
            assert_eq!(tempos, 2);
        }
    }

    #[test]
    fn test_failure_emits_nothing() {
        let timeline = Timeline::from_events(vec![
            Event::note_on(0, 0, 60, 100),
            Event::note_off(10, 0, 60),
            Event::note_off(10, 1, 50),
        ]);
        let mut out: Vec<EmittedVoice> = Vec::new();
        let result = split(&timeline, &SplitConfig::default(), &mut out);
        assert!(matches!(result, Err(SplitError::MalformedSequence { .. })));
        assert!(out.is_empty());
    }
}
