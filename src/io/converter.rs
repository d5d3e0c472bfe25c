use midly::{
    num::{u24, u28, u4, u7},
    MetaMessage, MidiMessage, PitchBend, TrackEvent, TrackEventKind,
};

use crate::io::midi::{Event, EventKind, MetaEvent, TextKind};

/// Largest delta a standard MIDI file can store.
pub const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Convert a decoded track event into the owned model.
///
/// Returns `None` for messages that carry nothing a per-voice output needs
/// (end of track, SMPTE offset, port/channel prefixes, sequencer-specific and
/// unknown meta, escapes). A NoteOn with zero velocity is read as a NoteOff.
pub fn midly_to_event(kind: &TrackEventKind<'_>) -> Option<EventKind> {
    match *kind {
        TrackEventKind::Midi { channel, message } => Some(midi_message(channel.as_int(), message)),
        TrackEventKind::SysEx(data) => Some(EventKind::SysEx(data.to_vec())),
        TrackEventKind::Escape(_) => None,
        TrackEventKind::Meta(meta) => meta_message(meta).map(EventKind::Meta),
    }
}

fn midi_message(channel: u8, message: MidiMessage) -> EventKind {
    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => EventKind::NoteOff {
            channel,
            key: key.as_int(),
            velocity: 0,
        },
        MidiMessage::NoteOn { key, vel } => EventKind::NoteOn {
            channel,
            key: key.as_int(),
            velocity: vel.as_int(),
        },
        MidiMessage::NoteOff { key, vel } => EventKind::NoteOff {
            channel,
            key: key.as_int(),
            velocity: vel.as_int(),
        },
        MidiMessage::Aftertouch { key, vel } => EventKind::KeyPressure {
            channel,
            key: key.as_int(),
            pressure: vel.as_int(),
        },
        MidiMessage::Controller { controller, value } => EventKind::ControlChange {
            channel,
            controller: controller.as_int(),
            value: value.as_int(),
        },
        MidiMessage::ProgramChange { program } => EventKind::ProgramChange {
            channel,
            program: program.as_int(),
        },
        MidiMessage::ChannelAftertouch { vel } => EventKind::ChannelPressure {
            channel,
            pressure: vel.as_int(),
        },
        MidiMessage::PitchBend { bend } => EventKind::PitchBend {
            channel,
            value: bend.as_int(),
        },
    }
}

fn meta_message(meta: MetaMessage<'_>) -> Option<MetaEvent> {
    let text = |kind: TextKind, bytes: &[u8]| MetaEvent::Text {
        kind,
        bytes: bytes.to_vec(),
    };

    match meta {
        MetaMessage::Tempo(t) => Some(MetaEvent::Tempo(t.as_int())),
        MetaMessage::TimeSignature(numerator, denominator, clocks_per_click, notes_per_quarter) => {
            Some(MetaEvent::TimeSignature {
                numerator,
                denominator,
                clocks_per_click,
                notes_per_quarter,
            })
        }
        MetaMessage::KeySignature(sharps, minor) => Some(MetaEvent::KeySignature { sharps, minor }),
        MetaMessage::Text(b) => Some(text(TextKind::Text, b)),
        MetaMessage::Copyright(b) => Some(text(TextKind::Copyright, b)),
        MetaMessage::TrackName(b) => Some(text(TextKind::TrackName, b)),
        MetaMessage::InstrumentName(b) => Some(text(TextKind::InstrumentName, b)),
        MetaMessage::Lyric(b) => Some(text(TextKind::Lyric, b)),
        MetaMessage::Marker(b) => Some(text(TextKind::Marker, b)),
        MetaMessage::CuePoint(b) => Some(text(TextKind::CuePoint, b)),
        _ => None,
    }
}

/// Borrowing conversion back to the codec's event type.
pub fn event_to_midly(event: &Event) -> TrackEvent<'_> {
    let delta = if event.delta > MAX_DELTA {
        tracing::warn!(delta = event.delta, "delta exceeds file format range, clamping");
        MAX_DELTA
    } else {
        event.delta
    };

    TrackEvent {
        delta: u28::new(delta),
        kind: kind_to_midly(&event.kind),
    }
}

fn kind_to_midly(kind: &EventKind) -> TrackEventKind<'_> {
    let midi = |channel: u8, message: MidiMessage| TrackEventKind::Midi {
        channel: u4::new(channel & 0x0F),
        message,
    };
    let data = |byte: u8| u7::new(byte & 0x7F);

    match kind {
        EventKind::NoteOn {
            channel,
            key,
            velocity,
        } => midi(
            *channel,
            MidiMessage::NoteOn {
                key: data(*key),
                vel: data(*velocity),
            },
        ),
        EventKind::NoteOff {
            channel,
            key,
            velocity,
        } => midi(
            *channel,
            MidiMessage::NoteOff {
                key: data(*key),
                vel: data(*velocity),
            },
        ),
        EventKind::ProgramChange { channel, program } => midi(
            *channel,
            MidiMessage::ProgramChange {
                program: data(*program),
            },
        ),
        EventKind::ControlChange {
            channel,
            controller,
            value,
        } => midi(
            *channel,
            MidiMessage::Controller {
                controller: data(*controller),
                value: data(*value),
            },
        ),
        EventKind::PitchBend { channel, value } => midi(
            *channel,
            MidiMessage::PitchBend {
                bend: PitchBend::from_int(*value),
            },
        ),
        EventKind::KeyPressure {
            channel,
            key,
            pressure,
        } => midi(
            *channel,
            MidiMessage::Aftertouch {
                key: data(*key),
                vel: data(*pressure),
            },
        ),
        EventKind::ChannelPressure { channel, pressure } => midi(
            *channel,
            MidiMessage::ChannelAftertouch {
                vel: data(*pressure),
            },
        ),
        EventKind::SysEx(bytes) => TrackEventKind::SysEx(bytes),
        EventKind::Meta(meta) => TrackEventKind::Meta(meta_to_midly(meta)),
    }
}

fn meta_to_midly(meta: &MetaEvent) -> MetaMessage<'_> {
    match meta {
        MetaEvent::Tempo(t) => MetaMessage::Tempo(u24::new(*t & 0x00FF_FFFF)),
        MetaEvent::TimeSignature {
            numerator,
            denominator,
            clocks_per_click,
            notes_per_quarter,
        } => MetaMessage::TimeSignature(
            *numerator,
            *denominator,
            *clocks_per_click,
            *notes_per_quarter,
        ),
        MetaEvent::KeySignature { sharps, minor } => MetaMessage::KeySignature(*sharps, *minor),
        MetaEvent::Text { kind, bytes } => match kind {
            TextKind::Text => MetaMessage::Text(bytes),
            TextKind::Copyright => MetaMessage::Copyright(bytes),
            TextKind::TrackName => MetaMessage::TrackName(bytes),
            TextKind::InstrumentName => MetaMessage::InstrumentName(bytes),
            TextKind::Lyric => MetaMessage::Lyric(bytes),
            TextKind::Marker => MetaMessage::Marker(bytes),
            TextKind::CuePoint => MetaMessage::CuePoint(bytes),
        },
    }
}
