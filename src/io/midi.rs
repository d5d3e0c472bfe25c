//! Owned MIDI event model used throughout the split pass.

/// One event of a delta-timed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Ticks since the previous event of the stream this event lives in
    pub delta: u32,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    KeyPressure { channel: u8, key: u8, pressure: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    SysEx(Vec<u8>),
    Meta(MetaEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    Tempo(u32),
    TimeSignature {
        numerator: u8,
        denominator: u8,
        clocks_per_click: u8,
        notes_per_quarter: u8,
    },
    KeySignature { sharps: i8, minor: bool },
    Text { kind: TextKind, bytes: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextKind {
    Text,
    Copyright,
    TrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
}

impl Event {
    pub fn new(delta: u32, kind: EventKind) -> Self {
        Self { delta, kind }
    }

    pub fn note_on(delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(
            delta,
            EventKind::NoteOn {
                channel,
                key,
                velocity,
            },
        )
    }

    pub fn note_off(delta: u32, channel: u8, key: u8) -> Self {
        Self::new(
            delta,
            EventKind::NoteOff {
                channel,
                key,
                velocity: 0,
            },
        )
    }

    pub fn program_change(delta: u32, channel: u8, program: u8) -> Self {
        Self::new(delta, EventKind::ProgramChange { channel, program })
    }

    pub fn tempo(delta: u32, micros_per_beat: u32) -> Self {
        Self::new(delta, EventKind::Meta(MetaEvent::Tempo(micros_per_beat)))
    }

    /// Empty text event: no audible or state effect, only advances time.
    pub fn padding(delta: u32) -> Self {
        Self::new(
            delta,
            EventKind::Meta(MetaEvent::Text {
                kind: TextKind::Text,
                bytes: Vec::new(),
            }),
        )
    }

    pub fn channel(&self) -> Option<u8> {
        self.kind.channel()
    }
}

impl EventKind {
    /// Channel of a channel-class event; `None` for SysEx and meta.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            EventKind::NoteOn { channel, .. }
            | EventKind::NoteOff { channel, .. }
            | EventKind::ProgramChange { channel, .. }
            | EventKind::ControlChange { channel, .. }
            | EventKind::PitchBend { channel, .. }
            | EventKind::KeyPressure { channel, .. }
            | EventKind::ChannelPressure { channel, .. } => Some(channel),
            EventKind::SysEx(_) | EventKind::Meta(_) => None,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, EventKind::NoteOn { .. })
    }

    pub fn is_note_off(&self) -> bool {
        matches!(self, EventKind::NoteOff { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_of_channel_events() {
        assert_eq!(Event::note_on(0, 3, 60, 100).channel(), Some(3));
        assert_eq!(Event::program_change(0, 9, 0).channel(), Some(9));
        assert_eq!(Event::tempo(0, 500_000).channel(), None);
        assert_eq!(Event::new(0, EventKind::SysEx(vec![0x7e])).channel(), None);
    }

    #[test]
    fn test_padding_is_not_a_channel_event() {
        let pad = Event::padding(30);
        assert_eq!(pad.delta, 30);
        assert_eq!(pad.channel(), None);
        assert!(!pad.kind.is_note_on() && !pad.kind.is_note_off());
    }
}
