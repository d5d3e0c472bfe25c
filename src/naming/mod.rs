//! Human-readable instrument labels for output file names.

pub mod percussion;
pub mod programs;

use percussion::{FIRST_PERCUSSION_KEY, PERCUSSION_NAMES};
use programs::PROGRAM_NAMES;

/// Label for a melodic program number.
pub fn program_name(program: u8) -> String {
    PROGRAM_NAMES
        .get(usize::from(program))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Program {}", program))
}

/// Label for a key on the percussion channel.
pub fn percussion_name(key: u8) -> String {
    key.checked_sub(FIRST_PERCUSSION_KEY)
        .and_then(|idx| PERCUSSION_NAMES.get(usize::from(idx)))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Percussion {}", key))
}

/// Label for an instrument id, which is a key when `percussion` is set.
pub fn instrument_name(instrument: u8, percussion: bool) -> String {
    if percussion {
        percussion_name(instrument)
    } else {
        program_name(instrument)
    }
}
