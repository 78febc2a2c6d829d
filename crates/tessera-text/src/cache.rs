//! Fixed-size open-addressed glyph table.
//!
//! Keys are `(codepoint, font)`. Lookup and insertion probe linearly from a
//! hashed home slot, wrapping around the table. The table never grows: when
//! every slot is taken by other keys, an insertion overwrites its home slot.

use crate::font::FontId;

/// A rasterized glyph as placed in the atlas.
///
/// Pixel sizes and bearings are in screen pixels. `bearing_y` is the
/// distance from the baseline up to the bitmap's top edge. A glyph with no
/// bitmap still carries its advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub advance: f32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    /// `[u0, v0, u1, v1]` in atlas-normalized coordinates.
    pub uv: [f32; 4],
}

impl Glyph {
    /// Whitespace or a contourless glyph: advances the pen, draws nothing.
    pub fn blank(advance: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            advance,
            bearing_x: 0.0,
            bearing_y: 0.0,
            uv: [0.0; 4],
        }
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    codepoint: char,
    font: FontId,
    glyph: Glyph,
}

impl Slot {
    #[inline]
    fn matches(&self, codepoint: char, font: FontId) -> bool {
        self.codepoint == codepoint && self.font == font
    }
}

/// What [`GlyphCache::insert`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored in an empty slot.
    Vacant,
    /// Replaced the entry with the same key.
    Replaced,
    /// Table full: overwrote a different key in the home slot.
    Evicted,
}

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub occupied: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn usage(&self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            self.occupied as f32 / self.capacity as f32
        }
    }
}

pub struct GlyphCache {
    slots: Box<[Option<Slot>]>,
    occupied: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Home slot for a key. Mixes `(codepoint << 8) | font` with two
/// multiply-xorshift rounds.
pub fn home_slot(codepoint: char, font: FontId, slot_count: usize) -> usize {
    let mut key = ((codepoint as u32) << 8) | (font.index() as u32 & 0xFF);
    key = ((key >> 16) ^ key).wrapping_mul(0x045d_9f3b);
    key = ((key >> 16) ^ key).wrapping_mul(0x045d_9f3b);
    key = (key >> 16) ^ key;
    key as usize % slot_count
}

impl GlyphCache {
    /// `slot_count` is raised to at least 1.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count.max(1)].into_boxed_slice(),
            occupied: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Probe order starting at the key's home slot.
    #[inline]
    fn probe(&self, codepoint: char, font: FontId) -> impl Iterator<Item = usize> + use<> {
        let len = self.slots.len();
        let home = home_slot(codepoint, font, len);
        (0..len).map(move |i| (home + i) % len)
    }

    /// Look up a glyph, counting a hit or a miss.
    pub fn get(&mut self, codepoint: char, font: FontId) -> Option<Glyph> {
        let found = self.peek(codepoint, font).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Look up without touching the counters.
    pub fn peek(&self, codepoint: char, font: FontId) -> Option<&Glyph> {
        for index in self.probe(codepoint, font) {
            match &self.slots[index] {
                None => return None,
                Some(slot) if slot.matches(codepoint, font) => return Some(&slot.glyph),
                Some(_) => {}
            }
        }
        None
    }

    pub fn insert(&mut self, codepoint: char, font: FontId, glyph: Glyph) -> InsertOutcome {
        let entry = Slot {
            codepoint,
            font,
            glyph,
        };

        for index in self.probe(codepoint, font) {
            match &mut self.slots[index] {
                slot @ None => {
                    *slot = Some(entry);
                    self.occupied += 1;
                    return InsertOutcome::Vacant;
                }
                Some(existing) if existing.matches(codepoint, font) => {
                    *existing = entry;
                    return InsertOutcome::Replaced;
                }
                Some(_) => {}
            }
        }

        let home = home_slot(codepoint, font, self.slots.len());
        if let Some(victim) = &self.slots[home] {
            tracing::debug!(
                "Glyph cache full, evicting U+{:04X} (font {}) for U+{:04X} (font {})",
                victim.codepoint as u32,
                victim.font.index(),
                codepoint as u32,
                font.index()
            );
        }
        self.slots[home] = Some(entry);
        self.evictions += 1;
        InsertOutcome::Evicted
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            occupied: self.occupied,
            capacity: self.slots.len(),
        }
    }

    /// Zero the hit, miss and eviction counters.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }
}
