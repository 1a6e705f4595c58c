//! Text normalization: authored question text to speakable English.
//!
//! Question banks are authored with a bounded vocabulary of technical
//! notation (inline LaTeX, Big-O, exponents, logic/set symbols, backtick
//! code spans). A synthesis engine reads that markup aloud as control
//! syntax, so every string is passed through an ordered list of
//! substitution rules before it reaches the engine. Unrecognized LaTeX
//! commands are deleted rather than kept, so malformed input degrades to
//! slightly terser speech instead of gibberish.
//!
//! The rule order is load-bearing: specific command rules must fire
//! before the generic command-deletion catch-all, and symbol spelling
//! runs on the output of the structural rules.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

/// How symbols and punctuation are rendered in the spoken text.
///
/// `Natural` leaves punctuation for the engine's own prosody handling;
/// `Literal` spells it out (`"+"` becomes `"plus"`), which suits content
/// where the exact symbols carry meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderingMode {
    #[default]
    Natural,
    Literal,
}

impl FromStr for RenderingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "natural" => Ok(RenderingMode::Natural),
            "literal" => Ok(RenderingMode::Literal),
            other => Err(format!(
                "unknown rendering mode {other:?} (expected \"natural\" or \"literal\")"
            )),
        }
    }
}

impl fmt::Display for RenderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderingMode::Natural => f.write_str("natural"),
            RenderingMode::Literal => f.write_str("literal"),
        }
    }
}

/// A pair of matching single backticks; the enclosed span is kept verbatim.
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));

/// Ordered notation rules. Specific commands first, the generic
/// backslash-command deletion last.
static NOTATION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\\\(", ""),
        (r"\\\)", ""),
        (r"\\\[", ""),
        (r"\\\]", ""),
        (r"\\log\b", "log"),
        (r"\\times\b", " times "),
        (r"\\cdot\b", " times "),
        (r"\\begin\{pmatrix\}", "the matrix: "),
        (r"\\end\{pmatrix\}", ""),
        (r"\\\\", "; "),
        (r"&", ", "),
        (r"\\[a-zA-Z]+", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// `O(expr)` up to the first closing parenthesis; no nesting.
static BIG_O: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bO\s*\(\s*([^)]+)\s*\)").expect("valid regex"));

/// A single word character raised to a digit power, e.g. `n^2`.
static EXPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)\s*\^\s*(\d+)").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Math symbols spelled out in both rendering modes.
const MATH_SYMBOLS: &[(&str, &str)] = &[
    ("≥", " greater or equal to "),
    ("≤", " less or equal to "),
    ("→", " arrow "),
    ("∈", " in "),
    ("∑", " sum "),
    ("∏", " product "),
    ("√", " square root of "),
];

/// Punctuation spelled out in `Literal` mode only.
const LITERAL_SYMBOLS: &[(&str, &str)] = &[
    ("(", " open parenthesis "),
    (")", " close parenthesis "),
    ("[", " open bracket "),
    ("]", " close bracket "),
    (":", " colon "),
    (",", " comma "),
    ("?", " question mark "),
    ("=", " equals "),
    ("+", " plus "),
    ("-", " minus "),
    ("*", " times "),
    ("/", " slash "),
    ("^", " caret "),
];

/// Convert one raw authored string into a speakable English string.
///
/// Deterministic and total: any input yields a string, possibly empty,
/// possibly unchanged apart from whitespace collapsing when no pattern
/// matches. Stable once clean: re-normalizing markup-free output is a
/// no-op.
pub fn normalize(raw: &str, mode: RenderingMode) -> String {
    let mut text = INLINE_CODE.replace_all(raw, "$1").into_owned();

    for (pattern, replacement) in NOTATION_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    text = BIG_O.replace_all(&text, "Big O of $1").into_owned();
    text = EXPONENT
        .replace_all(&text, "$1 to the power of $2")
        .into_owned();

    for (symbol, spoken) in MATH_SYMBOLS {
        if text.contains(symbol) {
            text = text.replace(symbol, spoken);
        }
    }

    text = collapse_whitespace(&text);

    if mode == RenderingMode::Literal {
        for (symbol, spoken) in LITERAL_SYMBOLS {
            if text.contains(symbol) {
                text = text.replace(symbol, spoken);
            }
        }
        text = collapse_whitespace(&text);
    }

    text
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, normalize, RenderingMode};

    #[test]
    fn markup_free_input_is_identity_modulo_whitespace() {
        let raw = "  What is the capital   of France ";
        assert_eq!(
            normalize(raw, RenderingMode::Natural),
            collapse_whitespace(raw)
        );
        assert_eq!(
            normalize("Already clean.", RenderingMode::Natural),
            "Already clean."
        );
    }

    #[test]
    fn big_o_is_spelled_out() {
        let spoken = normalize("Sorting takes O(n log n) time", RenderingMode::Natural);
        assert!(spoken.contains("Big O of n log n"), "{spoken:?}");
    }

    #[test]
    fn exponents_are_spelled_out() {
        let spoken = normalize("n^2 growth", RenderingMode::Natural);
        assert!(spoken.contains("n to the power of 2"), "{spoken:?}");

        let spaced = normalize("x ^ 10", RenderingMode::Natural);
        assert!(spaced.contains("x to the power of 10"), "{spaced:?}");
    }

    #[test]
    fn comparison_symbols_are_spelled_out() {
        let spoken = normalize("a ≥ b", RenderingMode::Natural);
        assert!(spoken.contains("greater or equal to"), "{spoken:?}");

        let spoken = normalize("x ≤ y → z", RenderingMode::Natural);
        assert!(spoken.contains("less or equal to"), "{spoken:?}");
        assert!(spoken.contains("arrow"), "{spoken:?}");
    }

    #[test]
    fn literal_mode_spells_punctuation() {
        let spoken = normalize("x + y", RenderingMode::Literal);
        assert!(spoken.contains("plus"), "{spoken:?}");
        assert!(!spoken.contains('+'), "{spoken:?}");

        let spoken = normalize("f(a, b) = c", RenderingMode::Literal);
        assert!(spoken.contains("open parenthesis"), "{spoken:?}");
        assert!(spoken.contains("comma"), "{spoken:?}");
        assert!(spoken.contains("equals"), "{spoken:?}");
    }

    #[test]
    fn natural_mode_keeps_punctuation() {
        let spoken = normalize("f(a, b) = c", RenderingMode::Natural);
        assert_eq!(spoken, "f(a, b) = c");
    }

    #[test]
    fn unknown_commands_are_deleted() {
        assert_eq!(normalize("\\foo bar", RenderingMode::Natural), "bar");
        assert_eq!(
            normalize("\\unknowncmd{x} kept", RenderingMode::Natural),
            "{x} kept"
        );
    }

    #[test]
    fn inline_code_delimiters_are_stripped() {
        let spoken = normalize("call `len(list)` here", RenderingMode::Natural);
        assert_eq!(spoken, "call len(list) here");

        // An unmatched backtick is left alone.
        let spoken = normalize("stray ` tick", RenderingMode::Natural);
        assert_eq!(spoken, "stray ` tick");
    }

    #[test]
    fn math_delimiters_and_commands_are_rewritten() {
        let spoken = normalize("\\(2 \\times 3\\)", RenderingMode::Natural);
        assert_eq!(spoken, "2 times 3");

        let spoken = normalize("\\log n grows slowly", RenderingMode::Natural);
        assert!(spoken.starts_with("log n"), "{spoken:?}");
    }

    #[test]
    fn matrices_become_spoken_rows() {
        let spoken = normalize(
            "\\begin{pmatrix}1 & 2 \\\\ 3 & 4\\end{pmatrix}",
            RenderingMode::Natural,
        );
        assert!(spoken.starts_with("the matrix:"), "{spoken:?}");
        assert!(spoken.contains(';'), "{spoken:?}");
        assert!(spoken.contains(','), "{spoken:?}");
        assert!(!spoken.contains('\\'), "{spoken:?}");
    }

    #[test]
    fn sqrt_symbol_is_spelled_out() {
        let spoken = normalize("√x", RenderingMode::Natural);
        assert_eq!(spoken, "square root of x");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize("", RenderingMode::Natural), "");
        assert_eq!(normalize("   ", RenderingMode::Literal), "");
    }

    #[test]
    fn normalization_is_stable_once_clean() {
        for raw in [
            "Sorting takes O(n log n) time",
            "n^2 and a ≥ b",
            "\\(x \\in S\\)",
        ] {
            for mode in [RenderingMode::Natural, RenderingMode::Literal] {
                let once = normalize(raw, mode);
                assert_eq!(normalize(&once, mode), once, "not stable for {raw:?}");
            }
        }
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!(
            "natural".parse::<RenderingMode>().unwrap(),
            RenderingMode::Natural
        );
        assert_eq!(
            "LITERAL".parse::<RenderingMode>().unwrap(),
            RenderingMode::Literal
        );
        assert!("spoken".parse::<RenderingMode>().is_err());
    }
}
