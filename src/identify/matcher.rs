use crate::config::ColorEntry;
use crate::error::{IdentifyError, Result};

/// Squared Euclidean distance over the three channels.
pub fn distance2(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| {
            let d = i32::from(p) - i32::from(q);
            (d * d) as u32
        })
        .sum()
}

/// Palette entry closest to `sample`. Ties go to the earliest entry.
pub fn nearest<'a>(sample: [u8; 3], palette: &'a [ColorEntry]) -> Result<&'a ColorEntry> {
    let mut best: Option<(&ColorEntry, u32)> = None;
    for entry in palette {
        let d = distance2(sample, entry.rgb);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((entry, d)),
        }
    }
    best.map(|(entry, _)| entry).ok_or(IdentifyError::EmptyPalette)
}
