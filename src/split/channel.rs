use std::collections::BTreeMap;

use crate::{
    error::SplitError,
    io::midi::{Event, EventKind},
    naming,
    split::{
        splitter::{VoiceLabel, VoiceSink},
        voice::Voice,
    },
};

/// Identity of one output voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceKey {
    pub channel: u8,
    /// Program number, or the key itself on the percussion channel
    pub instrument: u8,
    /// 1-based, in creation order among voices sharing the instrument
    pub instance: usize,
}

/// Routes one channel's events onto as many monophonic voices as it needs.
///
/// A note-free template voice receives every broadcast event and every delay,
/// so a voice cloned from it starts in step with its siblings and already
/// carries the channel's program, controller and meta history.
#[derive(Debug, Clone)]
pub struct ChannelDemux {
    channel: u8,
    percussion: bool,
    instrument: u8,
    template: Voice,
    voices: Vec<(VoiceKey, Voice)>,
    tick: u64,
}

impl ChannelDemux {
    pub fn new(channel: u8, percussion: bool) -> Self {
        Self {
            channel,
            percussion,
            instrument: 0,
            template: Voice::new(),
            voices: Vec::new(),
            tick: 0,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn is_percussion(&self) -> bool {
        self.percussion
    }

    /// Program set by the latest ProgramChange
    pub fn current_instrument(&self) -> u8 {
        self.instrument
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> impl Iterator<Item = (&VoiceKey, &Voice)> + '_ {
        self.voices.iter().map(|(key, voice)| (key, voice))
    }

    /// Handle the next event of the merged stream.
    pub fn dispatch(&mut self, event: &Event) -> Result<(), SplitError> {
        self.tick += u64::from(event.delta);

        if event.channel().is_some_and(|c| c != self.channel) {
            self.delay_all(event.delta);
            return Ok(());
        }

        match event.kind {
            EventKind::NoteOn { key, .. } => self.note_on(event, key),
            EventKind::NoteOff { key, .. } => self.note_off(event, key)?,
            EventKind::ProgramChange { program, .. } => {
                self.instrument = program;
                self.broadcast(event);
            }
            EventKind::ControlChange { .. }
            | EventKind::PitchBend { .. }
            | EventKind::KeyPressure { .. }
            | EventKind::ChannelPressure { .. }
            | EventKind::SysEx(_)
            | EventKind::Meta(_) => self.broadcast(event),
        }

        Ok(())
    }

    fn note_on(&mut self, event: &Event, key: u8) {
        let instrument = if self.percussion { key } else { self.instrument };

        // First fit, not least recently used
        let free = self
            .voices
            .iter()
            .position(|(k, v)| k.instrument == instrument && v.is_free());
        let idx = match free {
            Some(idx) => idx,
            None => self.spawn(instrument),
        };

        self.route(idx, event);
    }

    fn note_off(&mut self, event: &Event, key: u8) -> Result<(), SplitError> {
        let idx = self
            .voices
            .iter()
            .position(|(_, v)| v.sounding() == Some(key))
            .ok_or(SplitError::MalformedSequence {
                channel: self.channel,
                key,
                tick: self.tick,
            })?;

        self.route(idx, event);
        Ok(())
    }

    fn spawn(&mut self, instrument: u8) -> usize {
        let siblings = self
            .voices
            .iter()
            .filter(|(k, _)| k.instrument == instrument)
            .count();
        let key = VoiceKey {
            channel: self.channel,
            instrument,
            instance: siblings + 1,
        };

        tracing::debug!(
            channel = key.channel,
            instrument = key.instrument,
            instance = key.instance,
            tick = self.tick,
            "allocating voice"
        );

        self.voices.push((key, self.template.clone()));
        self.voices.len() - 1
    }

    /// Write to one voice; every other voice just advances its clock.
    fn route(&mut self, idx: usize, event: &Event) {
        for (i, (_, voice)) in self.voices.iter_mut().enumerate() {
            if i == idx {
                voice.write(event);
            } else {
                voice.add_delay(event.delta);
            }
        }
        self.template.add_delay(event.delta);
    }

    fn broadcast(&mut self, event: &Event) {
        self.template.write(event);
        for (_, voice) in &mut self.voices {
            voice.write(event);
        }
    }

    fn delay_all(&mut self, ticks: u32) {
        self.template.add_delay(ticks);
        for (_, voice) in &mut self.voices {
            voice.add_delay(ticks);
        }
    }

    /// Longest voice on this channel; 0 when no note was ever played.
    pub fn max_length(&self) -> u64 {
        self.voices
            .iter()
            .map(|(_, v)| v.total_length())
            .max()
            .unwrap_or(0)
    }

    /// Pad every voice to `target_length` and hand it to `sink`.
    ///
    /// The template is never emitted, so a channel without notes produces
    /// no output.
    pub fn emit<S>(self, target_length: u64, sink: &mut S) -> Result<Vec<VoiceLabel>, SplitError>
    where
        S: VoiceSink + ?Sized,
    {
        let mut per_instrument: BTreeMap<u8, usize> = BTreeMap::new();
        for (key, _) in &self.voices {
            *per_instrument.entry(key.instrument).or_default() += 1;
        }

        let mut labels = Vec::with_capacity(self.voices.len());
        for (key, mut voice) in self.voices {
            voice.finalize(target_length);

            let shared = per_instrument.get(&key.instrument).copied().unwrap_or(0) > 1;
            let label = VoiceLabel {
                channel: key.channel,
                instrument: key.instrument,
                instrument_name: naming::instrument_name(key.instrument, self.percussion),
                instance: shared.then_some(key.instance),
            };

            sink.accept(&label, voice.events())?;
            labels.push(label);
        }

        Ok(labels)
    }
}
