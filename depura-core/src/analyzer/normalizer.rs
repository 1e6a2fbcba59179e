use unicode_normalization::char::{decompose_canonical, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

const DROP: u8 = 0;
const SPACE: u8 = b' ';

/// ASCII byte classes: lowercase letter to emit, `SPACE` for whitespace,
/// `DROP` for everything else.
const ASCII_FOLD: [u8; 128] = build_ascii_fold();

const fn build_ascii_fold() -> [u8; 128] {
    let mut table = [DROP; 128];
    let mut b = 0u8;
    while b < 128 {
        table[b as usize] = match b {
            b'A'..=b'Z' => b + 32,
            b'a'..=b'z' => b,
            b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C => SPACE,
            // File, group, record and unit separators.
            0x1C..=0x1F => SPACE,
            _ => DROP,
        };
        b += 1;
    }
    table
}

/// Letters outside ASCII that survive normalization.
///
/// After decomposition only `ñ` can actually reach this check, but the
/// accented vowels stay in the allowed class.
#[inline(always)]
const fn is_spanish_letter(c: char) -> bool {
    matches!(
        c,
        'á' | 'é' | 'í' | 'ó' | 'ú' | 'ü' | 'ñ' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'Ü' | 'Ñ'
    )
}

/// Information separators `U+001C..=U+001F` split words like whitespace.
#[inline(always)]
const fn is_separator_control(c: char) -> bool {
    matches!(c, '\u{1C}'..='\u{1F}')
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy)]
pub struct NormalizerConfig {
    /// Keep `ñ` as its own letter instead of folding it to `n`.
    /// Disabling it reproduces a plain NFD strip, where "año" becomes "ano".
    pub preserve_enye: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preserve_enye: true,
        }
    }
}

/// Spanish transcript normalizer.
///
/// Performs the following operations, in order:
/// - Lowercases (Unicode-aware)
/// - Strips diacritics through canonical decomposition (`é` → `e`), keeping `ñ`
/// - Deletes everything that is not a letter or whitespace (digits, punctuation, symbols)
/// - Collapses whitespace runs into single spaces and trims both ends
///
/// Output only ever contains `a-z`, `ñ` and single interior spaces, and
/// normalizing twice gives the same result as normalizing once.
///
/// # Examples
///
/// ```
/// use depura_core::analyzer::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("  ¡Está   BIEN, señor!  "), "esta bien señor");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    /// Pure-ASCII input takes a table-driven path that never allocates.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let mut sink = Sink {
            out,
            pending_space: false,
        };

        if input.is_ascii() {
            for &b in input.as_bytes() {
                match ASCII_FOLD[b as usize] {
                    DROP => {}
                    SPACE => sink.space(),
                    letter => sink.letter(letter as char),
                }
            }
            return;
        }

        let lowered = input.to_lowercase();
        if self.config.preserve_enye {
            // Compose first so a decomposed "n\u{303}" is seen as ñ.
            for ch in lowered.nfc() {
                if ch == 'ñ' {
                    sink.letter(ch);
                } else {
                    fold_char(ch, &mut sink);
                }
            }
        } else {
            for ch in lowered.chars() {
                fold_char(ch, &mut sink);
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Writes letters and deferred single spaces, so whitespace is never
/// emitted at either end or twice in a row.
struct Sink<'a> {
    out: &'a mut String,
    pending_space: bool,
}

impl Sink<'_> {
    #[inline(always)]
    fn space(&mut self) {
        if !self.out.is_empty() {
            self.pending_space = true;
        }
    }

    #[inline(always)]
    fn letter(&mut self, c: char) {
        if self.pending_space {
            self.out.push(' ');
            self.pending_space = false;
        }
        self.out.push(c);
    }
}

#[inline]
fn fold_char(ch: char, sink: &mut Sink<'_>) {
    decompose_canonical(ch, |c| {
        if is_combining_mark(c) {
            return;
        }
        if c.is_ascii_alphabetic() {
            sink.letter(c.to_ascii_lowercase());
        } else if is_spanish_letter(c) {
            sink.letter(c);
        } else if c.is_whitespace() || is_separator_control(c) {
            sink.space();
        }
    });
}
