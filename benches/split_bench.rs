//! Benchmarks for the split pass.
//!
//! Run with: cargo bench
//!
//! Cost grows with events x voices per channel, so the inputs scale both:
//!   - chords/N   N-note block chords on one channel
//!   - band/N     N bars of chords, bass and drums across three channels

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use voicesplit::{
    io::{Event, EventKind},
    sequencing::Timeline,
    split::{split, EmittedVoice},
    SplitConfig,
};

const PPQ: u64 = 480;

fn merged(mut placed: Vec<(u64, EventKind)>) -> Timeline {
    placed.sort_by_key(|(tick, _)| *tick);
    let mut last = 0;
    let events = placed
        .into_iter()
        .map(|(tick, kind)| {
            let delta = (tick - last) as u32;
            last = tick;
            Event::new(delta, kind)
        })
        .collect();
    Timeline::from_events(events)
}

fn note(placed: &mut Vec<(u64, EventKind)>, channel: u8, key: u8, on: u64, len: u64) {
    placed.push((on, Event::note_on(0, channel, key, 100).kind));
    placed.push((on + len, Event::note_off(0, channel, key).kind));
}

/// 64 bars of N-note chords, one per beat.
fn chords(size: u8) -> Timeline {
    let mut placed = Vec::new();
    for beat in 0..256u64 {
        for i in 0..size {
            note(&mut placed, 0, 48 + i * 3, beat * PPQ, PPQ);
        }
    }
    merged(placed)
}

fn band(bars: u64) -> Timeline {
    let mut placed = vec![(0, Event::tempo(0, 500_000).kind)];
    for bar in 0..bars {
        let start = bar * 4 * PPQ;
        for key in [60, 64, 67, 71] {
            note(&mut placed, 0, key, start, 4 * PPQ);
        }
        for beat in 0..4 {
            let t = start + beat * PPQ;
            note(&mut placed, 1, 36, t, PPQ / 2);
            note(&mut placed, 9, 36, t, PPQ / 4);
            note(&mut placed, 9, 42, t, PPQ / 8);
            note(&mut placed, 9, 42, t + PPQ / 2, PPQ / 8);
        }
    }
    merged(placed)
}

pub fn bench_split(c: &mut Criterion) {
    let config = SplitConfig::default();
    let mut group = c.benchmark_group("split");

    for size in [1u8, 4, 8] {
        let timeline = chords(size);
        group.bench_with_input(BenchmarkId::new("chords", size), &timeline, |b, t| {
            b.iter(|| {
                let mut out: Vec<EmittedVoice> = Vec::new();
                split(black_box(t), &config, &mut out).unwrap();
                out
            })
        });
    }

    for bars in [16u64, 128] {
        let timeline = band(bars);
        group.bench_with_input(BenchmarkId::new("band", bars), &timeline, |b, t| {
            b.iter(|| {
                let mut out: Vec<EmittedVoice> = Vec::new();
                split(black_box(t), &config, &mut out).unwrap();
                out
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
