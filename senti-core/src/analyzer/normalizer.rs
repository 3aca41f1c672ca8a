//! Canonicalizes raw user text into the form the vectorizer was fitted on.

use serde_json::Value;
use unicode_normalization::char::decompose_compatible;

/// Marker for bytes that are removed from the output.
const DROP: u8 = 0xFF;

#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | 0x1C..=0x1F)
}

const fn build_ascii_table(strip_punctuation: bool) -> [u8; 128] {
    let mut table = [DROP; 128];
    let mut i = 0;
    while i < 128 {
        let b = i as u8;
        table[i] = if b.is_ascii_uppercase() {
            b + 32
        } else if b.is_ascii_alphanumeric() || b == b'_' || is_ascii_ws(b) || !strip_punctuation {
            b
        } else {
            DROP
        };
        i += 1;
    }
    table
}

/// Lowercases ASCII and drops everything that is not `[a-z0-9_]` or whitespace.
static CANONICAL_TABLE: [u8; 128] = build_ascii_table(true);

/// Lowercases ASCII and keeps punctuation.
static LOWERCASE_TABLE: [u8; 128] = build_ascii_table(false);

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Compatibility-decomposes every character and drops whatever is not ASCII.
    /// For example, "Não" becomes "nao" and "ﬁm" becomes "fim".
    pub strip_diacritics: bool,
    /// Removes every character that is neither a word character nor whitespace.
    pub strip_punctuation: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_diacritics: true,
            strip_punctuation: true,
        }
    }
}

/// Request-time text normalizer.
///
/// Performs, in order:
/// - Unicode-aware lowercasing
/// - NFKD decomposition, dropping combining marks and anything not representable in ASCII
/// - Removal of punctuation and symbols, keeping `[a-z0-9_]` and whitespace
///
/// Whitespace runs are kept verbatim; the output is never trimmed.
///
/// The normalizer holds no mutable state and is safe to share across threads.
///
/// # Examples
///
/// ```
/// use senti_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("Não gostei, PÉSSIMO!!!"), "nao gostei pessimo");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline]
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    #[inline(always)]
    fn table(&self) -> &'static [u8; 128] {
        if self.config.strip_punctuation {
            &CANONICAL_TABLE
        } else {
            &LOWERCASE_TABLE
        }
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let table = self.table();
        let mut rest = input;

        while !rest.is_empty() {
            let ascii_len = rest
                .bytes()
                .position(|b| !b.is_ascii())
                .unwrap_or(rest.len());
            let (ascii, tail) = rest.split_at(ascii_len);
            push_ascii(ascii.as_bytes(), table, out);

            let mut chars = tail.chars();
            if let Some(ch) = chars.next() {
                self.push_unicode(ch, table, out);
            }
            rest = chars.as_str();
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }

    /// Normalizes an arbitrary JSON value.
    ///
    /// Anything that is not a JSON string (absent, null, number, bool, array,
    /// object) normalizes to the empty string instead of failing.
    pub fn normalize_value(&self, input: Option<&Value>) -> String {
        match input {
            Some(Value::String(text)) => self.normalize(text),
            _ => String::new(),
        }
    }

    fn push_unicode(&self, ch: char, table: &[u8; 128], out: &mut String) {
        for lowered in ch.to_lowercase() {
            if self.config.strip_diacritics {
                decompose_compatible(lowered, |decomposed| {
                    if decomposed.is_ascii() {
                        push_ascii(&[decomposed as u8], table, out);
                    }
                });
            } else if lowered.is_ascii() {
                push_ascii(&[lowered as u8], table, out);
            } else if !self.config.strip_punctuation
                || lowered.is_alphanumeric()
                || lowered.is_whitespace()
            {
                out.push(lowered);
            }
        }
    }
}

#[inline(always)]
fn push_ascii(bytes: &[u8], table: &[u8; 128], out: &mut String) {
    for &b in bytes {
        let mapped = table[b as usize];
        if mapped != DROP {
            out.push(mapped as char);
        }
    }
}

/// Returns `true` if `text` only contains characters the default normalizer can emit.
pub fn is_canonical(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || is_ascii_ws(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn norm(input: &str) -> String {
        TextNormalizer::default().normalize(input)
    }

    fn norm_keep_punct(input: &str) -> String {
        TextNormalizer::new(NormalizerConfig {
            strip_diacritics: true,
            strip_punctuation: false,
        })
        .normalize(input)
    }

    #[test]
    fn portuguese_review() {
        assert_eq!(norm("Não gostei, PÉSSIMO!!!"), "nao gostei pessimo");
        assert_eq!(
            norm("Adorei o aplicativo, muito bom!"),
            "adorei o aplicativo muito bom"
        );
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("HeLlO"), "hello");
        assert_eq!(norm("123 ABC!"), "123 abc");
    }

    #[test]
    fn ascii_full_alphabet() {
        let upper: String = (b'A'..=b'Z').map(|b| b as char).collect();
        let lower: String = (b'a'..=b'z').map(|b| b as char).collect();
        assert_eq!(norm(&upper), lower);
    }

    #[test]
    fn underscore_is_a_word_character() {
        assert_eq!(norm("foo-bar_baz"), "foobar_baz");
    }

    #[test]
    fn punctuation_and_symbols_removed() {
        assert_eq!(norm("a.b,c;d:e?f!g"), "abcdefg");
        assert_eq!(norm("(R$ 10,00) #top @app"), "r 1000 top app");
        assert_eq!(norm("\"quoted\" 'single'"), "quoted single");
    }

    #[test]
    fn punctuation_kept_when_disabled() {
        assert_eq!(norm_keep_punct("Ótimo, Demais!"), "otimo, demais!");
    }

    #[test]
    fn whitespace_runs_preserved() {
        assert_eq!(norm("hello   world"), "hello   world");
        assert_eq!(norm("hello\t\nworld"), "hello\t\nworld");
        assert_eq!(norm("  padded  "), "  padded  ");
    }

    #[test]
    fn whitespace_left_by_punctuation_is_kept() {
        assert_eq!(norm("bom , ruim"), "bom  ruim");
        assert_eq!(norm("!!! "), " ");
    }

    #[test]
    fn information_separators_count_as_whitespace() {
        assert_eq!(norm("a\x1cb\x1fc"), "a\x1cb\x1fc");
        assert_eq!(norm("a\x0bb\x0cc"), "a\x0bb\x0cc");
    }

    #[test]
    fn control_chars_removed() {
        assert_eq!(norm("hello\x01\x02world"), "helloworld");
        assert_eq!(norm("a\0b"), "ab");
    }

    #[test]
    fn basic_diacritic_strip() {
        assert_eq!(norm("café"), "cafe");
        assert_eq!(norm("Müller"), "muller");
        assert_eq!(norm("São"), "sao");
        assert_eq!(norm("AÇÃO"), "acao");
    }

    #[test]
    fn extended_latin_strip() {
        assert_eq!(norm("Český"), "cesky");
        assert_eq!(norm("Żółć"), "zoc");
    }

    #[test]
    fn letters_without_decomposition_are_dropped() {
        assert_eq!(norm("straße"), "strae");
        assert_eq!(norm("Łódź"), "odz");
        assert_eq!(norm("æble"), "ble");
    }

    #[test]
    fn combining_marks_removed() {
        assert_eq!(norm("caf\u{0301}e"), "cafe");
        assert_eq!(norm("n\u{0303}"), "n");
    }

    #[test]
    fn compatibility_forms_decomposed() {
        assert_eq!(norm("ﬁm"), "fim");
        assert_eq!(norm("x²"), "x2");
        assert_eq!(norm("①"), "1");
    }

    #[test]
    fn compatibility_uppercase_is_lowercased() {
        assert_eq!(norm("ℌ"), "h");
        assert_eq!(norm("Ⅻ"), "xii");
    }

    #[test]
    fn turkish_dotted_i() {
        assert_eq!(norm("İstanbul"), "istanbul");
    }

    #[test]
    fn non_latin_scripts_dropped() {
        assert_eq!(norm("ПРИВЕТ"), "");
        assert_eq!(norm("مرحبا"), "");
        assert_eq!(norm("你好 world"), " world");
    }

    #[test]
    fn emoji_removed() {
        assert_eq!(norm("Amei 😍 demais"), "amei  demais");
    }

    #[test]
    fn non_breaking_space_becomes_space() {
        assert_eq!(norm("muito\u{00A0}bom"), "muito bom");
    }

    #[test]
    fn empty_input() {
        assert_eq!(norm(""), "");
    }

    #[test]
    fn non_textual_values_normalize_to_empty() {
        let n = TextNormalizer::default();
        assert_eq!(n.normalize_value(None), "");
        assert_eq!(n.normalize_value(Some(&Value::Null)), "");
        assert_eq!(n.normalize_value(Some(&json!(42))), "");
        assert_eq!(n.normalize_value(Some(&json!(true))), "");
        assert_eq!(n.normalize_value(Some(&json!(["texto"]))), "");
        assert_eq!(n.normalize_value(Some(&json!({"text": "x"}))), "");
    }

    #[test]
    fn textual_value_is_normalized() {
        let n = TextNormalizer::default();
        assert_eq!(n.normalize_value(Some(&json!("Olá, Mundo!"))), "ola mundo");
    }

    #[test]
    fn idempotent() {
        let n = TextNormalizer::default();
        let samples = [
            "Não gostei, PÉSSIMO!!!",
            "  muito   BOM ",
            "ℌello ﬁne Straße",
            "İİİ çççç 😍 ①②",
            "tab\tand\nnewline",
        ];

        for s in samples {
            let once = n.normalize(s);
            let twice = n.normalize(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn deterministic() {
        let n = TextNormalizer::default();
        let input = "Ação rápida, ótima!";
        assert_eq!(n.normalize(input), n.normalize(input));
    }

    #[test]
    fn output_is_canonical() {
        let inputs = [
            "hello",
            "café",
            "İstanbul",
            "ΠΡΟΒΛΗΜΑ",
            "こんにちは",
            "ℌ ℍ ℑ Ⅻ",
            "#$%&*()[]{}",
        ];

        for input in inputs {
            assert!(is_canonical(&norm(input)), "not canonical: {:?}", input);
        }
    }

    #[test]
    fn is_canonical_rejects_uppercase_and_punctuation() {
        assert!(is_canonical("nao gostei"));
        assert!(!is_canonical("Nao"));
        assert!(!is_canonical("nao!"));
        assert!(!is_canonical("não"));
    }

    #[test]
    fn normalize_into_reuses_capacity() {
        let normalizer = TextNormalizer::default();
        let mut buf = String::with_capacity(64);
        let cap = buf.capacity();

        normalizer.normalize_into("HELLO", &mut buf);
        assert_eq!(buf, "hello");
        assert_eq!(buf.capacity(), cap);

        normalizer.normalize_into("WORLD!", &mut buf);
        assert_eq!(buf, "world");
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn very_long_ascii() {
        let input = "A".repeat(10000);
        let out = norm(&input);
        assert_eq!(out.len(), 10000);
        assert!(out.chars().all(|c| c == 'a'));
    }

    #[test]
    fn output_not_longer_than_ascii_input() {
        let input = "HELLO,   WORLD!";
        assert!(norm(input).len() <= input.len());
    }
}
