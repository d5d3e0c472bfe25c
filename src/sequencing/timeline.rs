use std::collections::BTreeSet;

use crate::io::midi::{Event, EventKind};

/// All chunks of a file merged into one chronological, delta-timed stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: Vec<Event>,
    channels: BTreeSet<u8>,
}

impl Timeline {
    /// Build a timeline from a stream that is already in merged order.
    pub fn from_events(events: Vec<Event>) -> Self {
        let channels = events.iter().filter_map(Event::channel).collect();
        Self { events, channels }
    }

    /// Merge parallel chunks by absolute tick offset.
    ///
    /// Ties keep chunk order first, then event order within the chunk.
    pub fn merge<I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = Vec<Event>>,
    {
        let mut placed: Vec<(u64, usize, usize, EventKind)> = Vec::new();

        for (track_idx, track) in tracks.into_iter().enumerate() {
            let mut tick: u64 = 0;
            for (event_idx, event) in track.into_iter().enumerate() {
                tick += u64::from(event.delta);
                placed.push((tick, track_idx, event_idx, event.kind));
            }
        }

        placed.sort_by_key(|&(tick, track_idx, event_idx, _)| (tick, track_idx, event_idx));

        let mut last_tick = 0;
        let events = placed
            .into_iter()
            .map(|(tick, _, _, kind)| {
                // The predecessor in the event's own chunk is already placed,
                // so the gap is at most that chunk's delta.
                let gap = tick - last_tick;
                debug_assert!(gap <= u64::from(u32::MAX));
                let delta = gap as u32;
                last_tick = tick;
                Event::new(delta, kind)
            })
            .collect();

        Self::from_events(events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Distinct channel numbers used by any channel event, ascending
    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.channels.iter().copied()
    }

    /// Absolute tick of the last event
    pub fn len_ticks(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.delta)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most notes sounding at once on `channel`.
    ///
    /// Analysis only; voices are allocated lazily while splitting.
    pub fn max_polyphony(&self, channel: u8) -> usize {
        let mut sounding: usize = 0;
        let mut peak = 0;
        for event in &self.events {
            match event.kind {
                EventKind::NoteOn { channel: c, .. } if c == channel => {
                    sounding += 1;
                    peak = peak.max(sounding);
                }
                EventKind::NoteOff { channel: c, .. } if c == channel => {
                    sounding = sounding.saturating_sub(1);
                }
                _ => {}
            }
        }
        peak
    }
}
