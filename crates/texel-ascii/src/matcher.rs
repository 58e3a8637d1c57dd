//! Correspondance luminosité → caractère sur un charset mutable.
//!
//! Chaque caractère entre avec sa luminosité brute (fraction de cellules
//! allumées de son glyphe). L'index ordonné stocke la luminosité normalisée
//! contre le min/max courant du charset :
//!
//! ```text
//! norm(raw) = (raw - min) / (max - min)    si max != min
//!           = 0                            sinon
//! ```
//!
//! Un ajout ou un retrait qui ne touche pas aux extrêmes ne décale aucune
//! autre valeur normalisée : il est appliqué directement dans l'index. Sinon
//! l'index est reconstruit.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use texel_core::error::CoreError;

use crate::glyph::GlyphBrightnessCache;

/// Clé `f64` totalement ordonnée pour le `BTreeMap`.
#[derive(Clone, Copy, Debug)]
struct NormKey(f64);

impl PartialEq for NormKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for NormKey {}

impl PartialOrd for NormKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Brightness-indexed character matcher.
///
/// # Example
/// ```
/// use texel_ascii::glyph::GlyphBrightnessCache;
/// use texel_ascii::matcher::CharMatcher;
///
/// let mut glyphs = GlyphBrightnessCache::default();
/// let mut matcher = CharMatcher::new(" .:+#".chars(), &mut glyphs).unwrap();
/// assert_eq!(matcher.query(0.0).unwrap(), ' ');
/// assert_eq!(matcher.query(1.0).unwrap(), '#');
///
/// matcher.remove_char('#');
/// matcher.add_char('M', &mut glyphs);
/// assert!(matcher.contains('M'));
/// ```
#[derive(Clone, Debug)]
pub struct CharMatcher {
    /// Luminosité brute de chaque caractère présent.
    chars: HashMap<char, f64>,
    /// Luminosité normalisée → caractères, jamais de bucket vide.
    index: BTreeMap<NormKey, BTreeSet<char>>,
    min_raw: f64,
    max_raw: f64,
}

impl CharMatcher {
    /// Build a matcher over `chars`, looking raw brightness up in `glyphs`.
    ///
    /// Duplicate characters are ignored.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidCharset`] if `chars` is empty.
    pub fn new(
        chars: impl IntoIterator<Item = char>,
        glyphs: &mut GlyphBrightnessCache,
    ) -> Result<Self, CoreError> {
        let mut matcher = Self {
            chars: HashMap::new(),
            index: BTreeMap::new(),
            min_raw: f64::INFINITY,
            max_raw: f64::NEG_INFINITY,
        };

        for ch in chars {
            let raw = glyphs.brightness(ch);
            matcher.min_raw = matcher.min_raw.min(raw);
            matcher.max_raw = matcher.max_raw.max(raw);
            matcher.chars.insert(ch, raw);
        }

        if matcher.chars.is_empty() {
            return Err(CoreError::InvalidCharset);
        }

        matcher.rebuild_index();
        Ok(matcher)
    }

    #[inline]
    fn normalize(&self, raw: f64) -> f64 {
        if self.max_raw == self.min_raw {
            return 0.0;
        }
        (raw - self.min_raw) / (self.max_raw - self.min_raw)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (&ch, &raw) in &self.chars {
            let key = NormKey(self.normalize(raw));
            self.index.entry(key).or_default().insert(ch);
        }
        log::debug!(
            "index reconstruit : {} caractères, {} niveaux",
            self.chars.len(),
            self.index.len()
        );
    }

    /// Add `ch`. Returns `false` if it was already present.
    ///
    /// A brightness strictly outside the current `[min, max]` rescales every
    /// character and triggers a full rebuild; anything else, including a tie
    /// with an extreme, goes straight into the index.
    pub fn add_char(&mut self, ch: char, glyphs: &mut GlyphBrightnessCache) -> bool {
        if self.chars.contains_key(&ch) {
            return false;
        }

        let raw = glyphs.brightness(ch);
        self.chars.insert(ch, raw);

        if raw > self.max_raw || raw < self.min_raw {
            self.max_raw = self.max_raw.max(raw);
            self.min_raw = self.min_raw.min(raw);
            self.rebuild_index();
        } else {
            let key = NormKey(self.normalize(raw));
            self.index.entry(key).or_default().insert(ch);
        }
        true
    }

    /// Remove `ch`. Returns `false` if it was absent.
    pub fn remove_char(&mut self, ch: char) -> bool {
        let Some(raw) = self.chars.remove(&ch) else {
            return false;
        };

        if raw < self.max_raw && raw > self.min_raw {
            let key = NormKey(self.normalize(raw));
            if let Some(bucket) = self.index.get_mut(&key) {
                bucket.remove(&ch);
                if bucket.is_empty() {
                    self.index.remove(&key);
                }
            }
            return true;
        }

        if self.chars.is_empty() {
            self.index.clear();
            self.min_raw = f64::INFINITY;
            self.max_raw = f64::NEG_INFINITY;
            return true;
        }

        let (min, max) = self
            .chars
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        self.min_raw = min;
        self.max_raw = max;
        self.rebuild_index();
        true
    }

    /// Closest character to `brightness` on the normalized scale.
    ///
    /// Exact hits and out-of-range values resolve to the nearest level;
    /// between two levels the closer one wins, the darker one on a tie.
    /// Inside a level the smallest code point wins.
    ///
    /// # Errors
    /// [`CoreError::EmptyMatcher`] if no character is left,
    /// [`CoreError::InvalidBrightness`] if `brightness` is NaN.
    ///
    /// # Example
    /// ```
    /// use texel_ascii::glyph::GlyphBrightnessCache;
    /// use texel_ascii::matcher::CharMatcher;
    /// let mut glyphs = GlyphBrightnessCache::default();
    /// let matcher = CharMatcher::new(['a'], &mut glyphs).unwrap();
    /// assert_eq!(matcher.query(0.9).unwrap(), 'a');
    /// assert!(matcher.query(f64::NAN).is_err());
    /// ```
    pub fn query(&self, brightness: f64) -> Result<char, CoreError> {
        if self.chars.is_empty() {
            return Err(CoreError::EmptyMatcher);
        }
        if brightness.is_nan() {
            return Err(CoreError::InvalidBrightness(brightness));
        }

        let key = NormKey(brightness);
        let bucket = if let Some(bucket) = self.index.get(&key) {
            bucket
        } else {
            let lower = self.index.range(..=key).next_back();
            let upper = self.index.range(key..).next();
            match (lower, upper) {
                (None, Some((_, first))) => first,
                (Some((_, last)), None) => last,
                (Some((lo, lo_bucket)), Some((hi, hi_bucket))) => {
                    if brightness - lo.0 <= hi.0 - brightness {
                        lo_bucket
                    } else {
                        hi_bucket
                    }
                }
                (None, None) => return Err(CoreError::EmptyMatcher),
            }
        };

        bucket.first().copied().ok_or(CoreError::EmptyMatcher)
    }

    /// Caractères présents, triés.
    #[must_use]
    pub fn charset(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.chars.keys().copied().collect();
        chars.sort_unstable();
        chars
    }

    /// `true` if `ch` is in the charset.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains_key(&ch)
    }

    /// Raw brightness `ch` entered with.
    #[must_use]
    pub fn raw_brightness(&self, ch: char) -> Option<f64> {
        self.chars.get(&ch).copied()
    }

    /// Nombre de caractères.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// `true` once every character has been removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::tests::FixedGlyphs;

    fn glyphs(counts: &[(char, usize)]) -> GlyphBrightnessCache {
        GlyphBrightnessCache::new(Box::new(FixedGlyphs::new(counts)))
    }

    fn probes() -> Vec<f64> {
        let mut values: Vec<f64> = (0..=200).map(|i| f64::from(i) / 200.0).collect();
        values.extend([-1.0, -0.001, 1.001, 2.0, f64::INFINITY, f64::NEG_INFINITY]);
        values
    }

    fn answers(matcher: &CharMatcher) -> Vec<char> {
        probes()
            .into_iter()
            .map(|b| matcher.query(b).unwrap())
            .collect()
    }

    /// Index state as a plain comparable structure.
    fn index_snapshot(matcher: &CharMatcher) -> Vec<(f64, Vec<char>)> {
        matcher
            .index
            .iter()
            .map(|(k, v)| (k.0, v.iter().copied().collect()))
            .collect()
    }

    /// L'index incrémental doit toujours égaler une reconstruction complète.
    fn assert_index_consistent(matcher: &CharMatcher, cache: &mut GlyphBrightnessCache) {
        if matcher.is_empty() {
            assert!(matcher.index.is_empty());
            return;
        }
        let fresh = CharMatcher::new(matcher.charset(), cache).unwrap();
        assert_eq!(index_snapshot(matcher), index_snapshot(&fresh));
    }

    const COUNTS: &[(char, usize)] = &[
        (' ', 0),
        ('.', 16),
        (':', 40),
        ('-', 40),
        ('+', 96),
        ('#', 160),
        ('%', 200),
        ('@', 256),
    ];

    #[test]
    fn empty_charset_is_invalid() {
        let mut cache = glyphs(COUNTS);
        assert_eq!(
            CharMatcher::new(std::iter::empty(), &mut cache).unwrap_err(),
            CoreError::InvalidCharset
        );
    }

    #[test]
    fn extremes_and_nearest() {
        let mut cache = glyphs(&[(' ', 0), ('+', 64), ('@', 256)]);
        let matcher = CharMatcher::new([' ', '+', '@'], &mut cache).unwrap();
        // niveaux : ' ' = 0.0, '+' = 0.25, '@' = 1.0
        assert_eq!(matcher.query(0.0).unwrap(), ' ');
        assert_eq!(matcher.query(0.1).unwrap(), ' ');
        assert_eq!(matcher.query(0.2).unwrap(), '+');
        assert_eq!(matcher.query(0.6).unwrap(), '+');
        assert_eq!(matcher.query(0.7).unwrap(), '@');
        assert_eq!(matcher.query(-3.0).unwrap(), ' ');
        assert_eq!(matcher.query(3.0).unwrap(), '@');
    }

    #[test]
    fn equidistant_query_prefers_darker_level() {
        let mut cache = glyphs(&[('a', 0), ('b', 256)]);
        let matcher = CharMatcher::new(['a', 'b'], &mut cache).unwrap();
        assert_eq!(matcher.query(0.5).unwrap(), 'a');
        assert_eq!(matcher.query(0.500_001).unwrap(), 'b');
    }

    #[test]
    fn shared_level_resolves_to_smallest_char() {
        let mut cache = glyphs(&[('A', 100), ('B', 100), (' ', 0), ('@', 200)]);
        let matcher = CharMatcher::new(['B', 'A', ' ', '@'], &mut cache).unwrap();
        assert_eq!(matcher.query(0.5).unwrap(), 'A');

        let pair = CharMatcher::new(['B', 'A'], &mut cache).unwrap();
        for b in probes() {
            assert_eq!(pair.query(b).unwrap(), 'A');
        }
    }

    #[test]
    fn single_char_answers_everything() {
        let mut cache = glyphs(COUNTS);
        let matcher = CharMatcher::new(['#'], &mut cache).unwrap();
        assert!(answers(&matcher).iter().all(|&c| c == '#'));
        assert_eq!(index_snapshot(&matcher), vec![(0.0, vec!['#'])]);
    }

    #[test]
    fn repeated_queries_are_stable() {
        let mut cache = glyphs(COUNTS);
        let matcher = CharMatcher::new(COUNTS.iter().map(|&(c, _)| c), &mut cache).unwrap();
        assert_eq!(answers(&matcher), answers(&matcher));
    }

    #[test]
    fn add_then_remove_restores_behavior() {
        let base = [' ', ':', '#', '%'];
        for &(extra, _) in COUNTS {
            if base.contains(&extra) {
                continue;
            }
            let mut cache = glyphs(COUNTS);
            let mut matcher = CharMatcher::new(base, &mut cache).unwrap();
            let before = answers(&matcher);
            let index_before = index_snapshot(&matcher);

            assert!(matcher.add_char(extra, &mut cache));
            assert_index_consistent(&matcher, &mut cache);
            assert!(matcher.remove_char(extra));

            assert_eq!(answers(&matcher), before, "ajout/retrait de {extra:?}");
            assert_eq!(index_snapshot(&matcher), index_before);
        }
    }

    #[test]
    fn add_and_remove_are_noops_when_redundant() {
        let mut cache = glyphs(COUNTS);
        let mut matcher = CharMatcher::new([' ', '@'], &mut cache).unwrap();
        assert!(!matcher.add_char('@', &mut cache));
        assert!(!matcher.remove_char('#'));
        assert_eq!(matcher.charset(), vec![' ', '@']);
    }

    #[test]
    fn middle_removal_drops_empty_level() {
        let mut cache = glyphs(COUNTS);
        let mut matcher = CharMatcher::new([' ', '+', '@'], &mut cache).unwrap();
        assert_eq!(matcher.index.len(), 3);
        matcher.remove_char('+');
        assert_eq!(matcher.index.len(), 2);
        assert_eq!(matcher.query(0.4).unwrap(), ' ');
    }

    #[test]
    fn removing_an_extreme_rescales() {
        let mut cache = glyphs(&[(' ', 0), ('+', 64), ('#', 128)]);
        let mut matcher = CharMatcher::new([' ', '+', '#'], &mut cache).unwrap();
        // '+' est à 0.5 tant que '#' est le maximum
        assert_eq!(matcher.query(0.5).unwrap(), '+');
        matcher.remove_char('#');
        // '+' devient le maximum et passe à 1.0
        assert_eq!(matcher.query(1.0).unwrap(), '+');
        assert_eq!(matcher.query(0.5).unwrap(), ' ');
        assert_index_consistent(&matcher, &mut cache);
    }

    #[test]
    fn tie_with_extreme_is_inserted_directly() {
        let mut cache = glyphs(&[(' ', 0), ('@', 256), ('_', 0), ('M', 256)]);
        let mut matcher = CharMatcher::new([' ', '@'], &mut cache).unwrap();
        matcher.add_char('_', &mut cache);
        matcher.add_char('M', &mut cache);
        assert_eq!(matcher.query(1.0).unwrap(), '@');
        assert_eq!(matcher.query(0.0).unwrap(), ' ');
        assert_index_consistent(&matcher, &mut cache);

        matcher.remove_char(' ');
        assert_eq!(matcher.query(0.0).unwrap(), '_');
        assert_index_consistent(&matcher, &mut cache);
    }

    #[test]
    fn draining_the_charset() {
        let mut cache = glyphs(COUNTS);
        let mut matcher = CharMatcher::new([' ', '#', '@'], &mut cache).unwrap();
        for ch in [' ', '#', '@'] {
            matcher.remove_char(ch);
            assert_index_consistent(&matcher, &mut cache);
        }
        assert!(matcher.is_empty());
        assert_eq!(matcher.query(0.5).unwrap_err(), CoreError::EmptyMatcher);

        // refill from empty
        matcher.add_char('+', &mut cache);
        assert_eq!(matcher.query(0.9).unwrap(), '+');
        matcher.add_char('@', &mut cache);
        assert_eq!(matcher.query(0.9).unwrap(), '@');
        assert_index_consistent(&matcher, &mut cache);
    }

    #[test]
    fn long_edit_sequence_stays_consistent() {
        let mut cache = glyphs(COUNTS);
        let mut matcher = CharMatcher::new([':', '+'], &mut cache).unwrap();
        let ops = [
            ('@', true),
            ('-', true),
            (' ', true),
            (':', false),
            ('%', true),
            ('@', false),
            ('.', true),
            ('+', false),
            (' ', false),
            ('#', true),
            ('-', false),
        ];
        for (ch, add) in ops {
            if add {
                matcher.add_char(ch, &mut cache);
            } else {
                matcher.remove_char(ch);
            }
            assert_index_consistent(&matcher, &mut cache);
        }
        assert_eq!(matcher.charset(), vec!['#', '%', '.']);
    }

    #[test]
    fn raw_brightness_is_exposed() {
        let mut cache = glyphs(COUNTS);
        let matcher = CharMatcher::new(['+'], &mut cache).unwrap();
        assert_eq!(matcher.raw_brightness('+'), Some(96.0 / 256.0));
        assert_eq!(matcher.raw_brightness('@'), None);
        assert_eq!(matcher.len(), 1);
    }
}
