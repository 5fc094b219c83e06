//! Lexical tone and rhyme family of Vietnamese syllables
//!
//! Both are pure functions of the syllable text. The tone comes from the
//! diacritic on the vowel; the rhyme family from the tone-stripped final
//! sound (vowel nucleus plus final consonant).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The six Vietnamese lexical tones
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Level (no mark)
    Ngang,
    /// Rising (acute)
    Sac,
    /// Falling (grave)
    Huyen,
    /// Broken (hook above)
    Hoi,
    /// Sharp broken (tilde)
    Nga,
    /// Heavy (dot below)
    Nang,
}

impl Tone {
    /// Vietnamese tone name
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Ngang => "ngang",
            Tone::Sac => "sắc",
            Tone::Huyen => "huyền",
            Tone::Hoi => "hỏi",
            Tone::Nga => "ngã",
            Tone::Nang => "nặng",
        }
    }

    /// Tone carried by a combining diacritic (decomposed input)
    fn from_combining(c: char) -> Option<Tone> {
        match c {
            '\u{0301}' => Some(Tone::Sac),
            '\u{0300}' => Some(Tone::Huyen),
            '\u{0309}' => Some(Tone::Hoi),
            '\u{0303}' => Some(Tone::Nga),
            '\u{0323}' => Some(Tone::Nang),
            _ => None,
        }
    }
}

/// Toned vowel → (base vowel, tone)
static TONED_VOWELS: Lazy<HashMap<char, (char, Tone)>> = Lazy::new(|| {
    // Each row: base vowel, then sắc huyền hỏi ngã nặng forms
    let rows: [(char, [char; 5]); 12] = [
        ('a', ['á', 'à', 'ả', 'ã', 'ạ']),
        ('ă', ['ắ', 'ằ', 'ẳ', 'ẵ', 'ặ']),
        ('â', ['ấ', 'ầ', 'ẩ', 'ẫ', 'ậ']),
        ('e', ['é', 'è', 'ẻ', 'ẽ', 'ẹ']),
        ('ê', ['ế', 'ề', 'ể', 'ễ', 'ệ']),
        ('i', ['í', 'ì', 'ỉ', 'ĩ', 'ị']),
        ('o', ['ó', 'ò', 'ỏ', 'õ', 'ọ']),
        ('ô', ['ố', 'ồ', 'ổ', 'ỗ', 'ộ']),
        ('ơ', ['ớ', 'ờ', 'ở', 'ỡ', 'ợ']),
        ('u', ['ú', 'ù', 'ủ', 'ũ', 'ụ']),
        ('ư', ['ứ', 'ừ', 'ử', 'ữ', 'ự']),
        ('y', ['ý', 'ỳ', 'ỷ', 'ỹ', 'ỵ']),
    ];
    let tones = [Tone::Sac, Tone::Huyen, Tone::Hoi, Tone::Nga, Tone::Nang];

    let mut table = HashMap::new();
    for (base, forms) in rows {
        for (form, tone) in forms.into_iter().zip(tones) {
            table.insert(form, (base, tone));
        }
    }
    table
});

/// Rhyme families and the tone-free endings that belong to them
const RHYME_FAMILIES: &[(&str, &[&str])] = &[
    ("a", &["a", "ă"]),
    ("â", &["â"]),
    ("e", &["e"]),
    ("ê", &["ê"]),
    ("i", &["i", "y"]),
    ("o", &["o"]),
    ("ô", &["ô"]),
    ("ơ", &["ơ"]),
    ("u", &["u"]),
    ("ư", &["ư"]),
    ("ai", &["ai"]),
    ("ao", &["ao"]),
    ("ay", &["ay"]),
    ("ây", &["ây"]),
    ("eo", &["eo"]),
    ("êu", &["êu"]),
    ("ia", &["ia"]),
    ("iê", &["iê"]),
    ("iu", &["iu"]),
    ("oa", &["oa"]),
    ("oă", &["oă"]),
    ("oe", &["oe"]),
    ("oi", &["oi"]),
    ("ôi", &["ôi"]),
    ("ơi", &["ơi"]),
    ("ua", &["ua"]),
    ("uâ", &["uâ"]),
    ("ui", &["ui"]),
    ("ưa", &["ưa"]),
    ("ưi", &["ưi"]),
    ("ươ", &["ươ"]),
    ("uô", &["uô"]),
    ("uy", &["uy"]),
    ("ưu", &["ưu"]),
    ("an", &["an"]),
    ("ăn", &["ăn"]),
    ("âm", &["âm"]),
    ("ân", &["ân"]),
    ("ang", &["ang"]),
    ("ăng", &["ăng"]),
    ("âng", &["âng"]),
    ("anh", &["anh"]),
    ("ănh", &["ănh"]),
    ("ânh", &["ânh"]),
    ("em", &["em"]),
    ("ên", &["ên"]),
    ("eng", &["eng"]),
    ("ênh", &["ênh"]),
    ("im", &["im"]),
    ("in", &["in"]),
    ("inh", &["inh"]),
    ("om", &["om"]),
    ("on", &["on"]),
    ("ông", &["ông"]),
    ("ong", &["ong"]),
    ("oong", &["oong"]),
    ("um", &["um"]),
    ("un", &["un"]),
    ("ung", &["ung"]),
    ("uông", &["uông"]),
    ("ươn", &["ươn"]),
    ("ương", &["ương"]),
];

/// Family for endings that match no entry
pub const OTHER_RHYME: &str = "other";

/// Detect the lexical tone of a syllable
pub fn detect_tone(syllable: &str) -> Tone {
    for c in syllable.to_lowercase().chars() {
        if let Some((_, tone)) = TONED_VOWELS.get(&c) {
            return *tone;
        }
        if let Some(tone) = Tone::from_combining(c) {
            return tone;
        }
    }
    Tone::Ngang
}

/// Lower-case the syllable, drop tone marks and surrounding punctuation
pub fn strip_tones(syllable: &str) -> String {
    syllable
        .to_lowercase()
        .chars()
        .filter(|c| Tone::from_combining(*c).is_none())
        .map(|c| TONED_VOWELS.get(&c).map_or(c, |(base, _)| *base))
        .collect::<String>()
        .trim_matches(|c: char| !c.is_alphabetic())
        .to_string()
}

/// Rhyme family of a syllable; the longest matching ending wins
pub fn rhyme_family(syllable: &str) -> String {
    let core = strip_tones(syllable);
    RHYME_FAMILIES
        .iter()
        .flat_map(|(family, endings)| endings.iter().map(move |ending| (*family, *ending)))
        .filter(|(_, ending)| core.ends_with(ending))
        .max_by_key(|(_, ending)| ending.chars().count())
        .map_or_else(|| OTHER_RHYME.to_string(), |(family, _)| family.to_string())
}

/// Tone and rhyme family of one syllable
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Phonetics {
    pub tone: Tone,
    pub rhyme_family: String,
}

impl Phonetics {
    pub fn of(syllable: &str) -> Self {
        Self {
            tone: detect_tone(syllable),
            rhyme_family: rhyme_family(syllable),
        }
    }
}

/// Per-call memo of syllable phonetics
#[derive(Debug, Default)]
pub struct PhoneticCache {
    entries: HashMap<String, Phonetics>,
}

impl PhoneticCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, syllable: &str) -> Phonetics {
        if let Some(cached) = self.entries.get(syllable) {
            return cached.clone();
        }
        let phonetics = Phonetics::of(syllable);
        self.entries.insert(syllable.to_string(), phonetics.clone());
        phonetics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_tone() {
        assert_eq!(detect_tone("ba"), Tone::Ngang);
        assert_eq!(detect_tone("rằng"), Tone::Huyen);
        assert_eq!(detect_tone("rí"), Tone::Sac);
        assert_eq!(detect_tone("của"), Tone::Hoi);
        assert_eq!(detect_tone("những"), Tone::Nga);
        assert_eq!(detect_tone("mạ"), Tone::Nang);
        assert_eq!(detect_tone("Người"), Tone::Huyen);
    }

    #[test]
    fn test_detect_tone_decomposed() {
        // "ma" + combining acute
        assert_eq!(detect_tone("ma\u{0301}"), Tone::Sac);
    }

    #[test]
    fn test_strip_tones() {
        assert_eq!(strip_tones("Rằng,"), "răng");
        assert_eq!(strip_tones("người"), "ngươi");
        assert_eq!(strip_tones("ma\u{0303}"), "ma");
    }

    #[test]
    fn test_rhyme_family_longest_ending() {
        assert_eq!(rhyme_family("rằng"), "ăng");
        assert_eq!(rhyme_family("ba"), "a");
        assert_eq!(rhyme_family("hoa"), "oa");
        assert_eq!(rhyme_family("thương"), "ương");
        assert_eq!(rhyme_family("xinh"), "inh");
        assert_eq!(rhyme_family("tay"), "ay");
        assert_eq!(rhyme_family("hát"), OTHER_RHYME);
    }

    #[test]
    fn test_phonetic_cache_memoizes() {
        let mut cache = PhoneticCache::new();
        let first = cache.lookup("rí");
        let second = cache.lookup("rí");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(first.tone, Tone::Sac);
        assert_eq!(first.rhyme_family, "i");
    }
}
