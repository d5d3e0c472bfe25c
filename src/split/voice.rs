use crate::io::{
    converter::MAX_DELTA,
    midi::{Event, EventKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    #[default]
    Free, // Available for the next note
    Sounding(u8), // Holding an open NoteOn for this key
}

/// One monophonic output line.
///
/// Events are appended in order. Time that passes while the voice receives
/// nothing is parked in `pending_delay` and folded into the next write.
/// No stored delta exceeds [`MAX_DELTA`]; longer gaps are bridged with
/// padding events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Voice {
    events: Vec<Event>,
    pending_delay: u64,
    state: VoiceState,
}

impl Voice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, event: &Event) {
        let delta = std::mem::take(&mut self.pending_delay) + u64::from(event.delta);
        let excess = delta.saturating_sub(u64::from(MAX_DELTA));
        self.pad(excess);

        match event.kind {
            EventKind::NoteOn { key, .. } => self.state = VoiceState::Sounding(key),
            EventKind::NoteOff { .. } => self.state = VoiceState::Free,
            _ => {}
        }

        // At most MAX_DELTA after padding
        self.events.push(Event::new((delta - excess) as u32, event.kind.clone()));
    }

    /// Account for ticks that elapsed on sibling voices.
    pub fn add_delay(&mut self, ticks: u32) {
        self.pending_delay += u64::from(ticks);
    }

    /// Absolute tick of the last written event
    pub fn total_length(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.delta)).sum()
    }

    /// Pad with no-op events so the voice spans `target_length` ticks.
    pub fn finalize(&mut self, target_length: u64) {
        let shortfall = target_length.saturating_sub(self.total_length());
        self.pad(shortfall);
        self.pending_delay = 0;
    }

    fn pad(&mut self, mut ticks: u64) {
        while ticks > 0 {
            let step = ticks.min(u64::from(MAX_DELTA));
            self.events.push(Event::padding(step as u32));
            ticks -= step;
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    /// Key of the open note, if any
    pub fn sounding(&self) -> Option<u8> {
        match self.state {
            VoiceState::Sounding(key) => Some(key),
            VoiceState::Free => None,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn pending_delay(&self) -> u64 {
        self.pending_delay
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
