//! Text normalization
//!
//! Produces the canonical `norm_text` stored next to every document. The
//! function is total (never fails, `None` gives `""`) and idempotent:
//! `normalize_text(&normalize_text(s)) == normalize_text(s)` for every `s`.
//!
//! Steps, in order:
//!
//! 1. drop zero-width characters and the byte-order mark
//! 2. collapse every whitespace run (NBSP and narrow NBSP included) into one
//!    space, trim both ends
//! 3. unify double quotation marks (`«»“”„‟`) to `"`, single ones (`‹›‚‘’‛`)
//!    to `'`, and fold `ё`/`Ё` to `е`/`Е`
//! 4. collapse runs of the same terminal mark (`!`, `?`, `.`) into one
//! 5. drop a space between two digits (`1 000` -> `1000`) and turn a decimal
//!    comma between two digits into a period (`0,5` -> `0.5`); any Unicode
//!    numeric character counts as a digit (`١ ٠٠٠,٥` -> `١٠٠٠.٥`)

const ZERO_WIDTH: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

const QUOTES: [char; 6] = ['«', '»', '“', '”', '„', '‟'];

const SINGLE_QUOTES: [char; 6] = ['‹', '›', '‚', '‘', '’', '‛'];

const TERMINAL_MARKS: [char; 3] = ['!', '?', '.'];

const COMBINING_DIAERESIS: char = '\u{0308}';

/// Normalize optional text; `None` yields an empty string
pub fn normalize(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

/// Normalize text to its canonical form
pub fn normalize_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text.chars().filter(|c| !ZERO_WIDTH.contains(c)));
    let folded = fold_letters_and_quotes(&collapsed);
    let punctuated = collapse_terminal_marks(&folded);
    normalize_numbers(&punctuated)
}

fn collapse_whitespace(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    let mut pending_space = false;

    for c in chars {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

fn fold_letters_and_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            'ё' => out.push('е'),
            'Ё' => out.push('Е'),
            // decomposed ё: base letter followed by a combining diaeresis
            COMBINING_DIAERESIS if out.ends_with(['е', 'Е']) => {}
            c if QUOTES.contains(&c) => out.push('"'),
            c if SINGLE_QUOTES.contains(&c) => out.push('\''),
            c => out.push(c),
        }
    }

    out
}

fn collapse_terminal_marks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;

    for c in text.chars() {
        if TERMINAL_MARKS.contains(&c) && prev == Some(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

fn normalize_numbers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && chars[i - 1].is_numeric()
            && chars.get(i + 1).is_some_and(|next| next.is_numeric());

        match c {
            ' ' if between_digits => {}
            ',' if between_digits => out.push('.'),
            c => out.push(c),
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_none_and_empty_yield_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
        assert_eq!(normalize_text("  \u{00A0}\t\n "), "");
    }

    #[test]
    fn test_removes_zero_width_and_bom() {
        assert_eq!(normalize_text("\u{FEFF}Сбер\u{200B}банк\u{200D}"), "Сбербанк");
    }

    #[test]
    fn test_collapses_and_trims_whitespace() {
        assert_eq!(
            normalize_text("  Ставка\u{00A0}\u{00A0}сохранена \n\t на уровне  "),
            "Ставка сохранена на уровне"
        );
        assert_eq!(normalize_text("a\u{202F}b"), "a b");
    }

    #[test]
    fn test_unifies_quotes() {
        assert_eq!(normalize_text("«hello»"), "\"hello\"");
        assert_eq!(normalize_text("„hello“"), "\"hello\"");
        assert_eq!(normalize_text("“hello”"), "\"hello\"");
    }

    #[test]
    fn test_unifies_single_quotes() {
        assert_eq!(normalize_text("‹a› ‚b‘ ’c’ ‛d’"), "'a' 'b' 'c' 'd'");
        assert_eq!(normalize_text("S&P’s"), "S&P's");
    }

    #[test]
    fn test_collapses_repeated_terminal_marks() {
        assert_eq!(normalize_text("Wow!!!"), "Wow!");
        assert_eq!(normalize_text("Really??"), "Really?");
        assert_eq!(normalize_text("And then..."), "And then.");
        assert_eq!(normalize_text("What?!"), "What?!");
    }

    #[test]
    fn test_folds_yo() {
        assert_eq!(normalize_text("ёлка ЁЛКА"), "елка ЕЛКА");
        assert_eq!(normalize_text("е\u{0308}лка"), "елка");
    }

    #[test]
    fn test_digit_grouping_and_decimal_comma() {
        assert_eq!(normalize_text("1 000,50"), "1000.50");
        assert_eq!(normalize_text("1\u{00A0}000,50"), "1000.50");
        assert_eq!(normalize_text("12\u{202F}345\u{202F}678"), "12345678");
        assert_eq!(normalize_text("ставка 16,5%"), "ставка 16.5%");
    }

    #[test]
    fn test_non_ascii_digits_are_grouped() {
        assert_eq!(normalize_text("١ ٠٠٠,٥"), "١٠٠٠.٥");
        assert_eq!(normalize_text("१\u{00A0}२००,५"), "१२००.५");
    }

    #[test]
    fn test_leaves_non_numeric_commas_and_spaces() {
        assert_eq!(normalize_text("да, 5 лет"), "да, 5 лет");
        assert_eq!(normalize_text("1, 2, 3"), "1, 2, 3");
    }

    #[test]
    fn test_combined_example_is_fixed_point() {
        let raw = "\u{FEFF}  ЦБ: «Ставка — 16,5%»!!!  Рост\u{00A0}на 1\u{00A0}000 руб...  ";
        let once = normalize_text(raw);
        assert_eq!(once, "ЦБ: \"Ставка — 16.5%\"! Рост на 1000 руб.");
        assert_eq!(normalize_text(&once), once);
    }

    proptest! {
        #[test]
        fn prop_idempotent_on_tricky_alphabet(
            s in "[a-zа-яА-ЯёЁ0-9٠-٩ ,.!?\"'«»“”„‟‹›‚‘’‛\u{00A0}\u{202F}\u{2007}\u{200B}\u{FEFF}\u{0308}\t\n]{0,64}"
        ) {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn prop_idempotent_on_any_string(s in any::<String>()) {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn prop_output_has_no_edge_or_double_spaces(s in any::<String>()) {
            let out = normalize_text(&s);
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
