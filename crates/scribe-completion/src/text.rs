//! Post-processing for generated text.

use std::sync::LazyLock;

use regex::Regex;

/// Marks that close a sentence.
const TERMINALS: [char; 3] = ['.', '!', '?'];

/// A terminal mark followed by a whitespace run.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

pub fn ends_with_terminal(text: &str) -> bool {
    text.ends_with(&TERMINALS[..])
}

/// Split after every terminal mark that is followed by whitespace. The
/// whitespace run is consumed; the last piece is always returned, even empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        // Terminal marks are ASCII, so the mark is exactly one byte.
        pieces.push(&text[start..m.start() + 1]);
        start = m.end();
    }

    pieces.push(&text[start..]);
    pieces
}

/// Drop a trailing sentence fragment cut off by the token limit.
///
/// Text already ending in `.`, `!` or `?` is returned trimmed. Otherwise only
/// the sentences that end in a terminal mark survive, joined by single
/// spaces. The result is empty when no sentence qualifies.
pub fn trim_truncated_sentence(text: &str) -> String {
    let text = text.trim();
    if ends_with_terminal(text) {
        return text.to_string();
    }

    split_sentences(text)
        .into_iter()
        .filter(|s| ends_with_terminal(s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case every word: its first character takes the titlecase form,
/// the rest are lower-cased. A word is a run of cased letters, so `"don't"`
/// becomes `"Don'T"`, `"top10list"` becomes `"Top10List"` and `"日本語abc"`
/// becomes `"日本語Abc"`. Short words are not special-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            push_titlecase(&mut out, c);
        }
        in_word = is_cased(c);
    }

    out
}

/// Letters that carry case: upper, lower, or one of the titlecase digraphs.
fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase() || is_titlecase_letter(c)
}

fn is_titlecase_letter(c: char) -> bool {
    matches!(
        c,
        '\u{01C5}' | '\u{01C8}' | '\u{01CB}' | '\u{01F2}'
            | '\u{1F88}'..='\u{1F8F}'
            | '\u{1F98}'..='\u{1F9F}'
            | '\u{1FA8}'..='\u{1FAF}'
            | '\u{1FBC}' | '\u{1FCC}' | '\u{1FFC}'
    )
}

/// Push the titlecase mapping of `c`. This is the uppercase mapping except
/// for digraphs, ligatures and Greek letters with iota subscript, where the
/// titlecase form capitalizes only the leading part.
fn push_titlecase(out: &mut String, c: char) {
    let mapped: &str = match c {
        '\u{01C4}'..='\u{01C6}' => "\u{01C5}",
        '\u{01C7}'..='\u{01C9}' => "\u{01C8}",
        '\u{01CA}'..='\u{01CC}' => "\u{01CB}",
        '\u{01F1}'..='\u{01F3}' => "\u{01F2}",
        'ß' => "Ss",
        'ﬀ' => "Ff",
        'ﬁ' => "Fi",
        'ﬂ' => "Fl",
        'ﬃ' => "Ffi",
        'ﬄ' => "Ffl",
        'ﬅ' | 'ﬆ' => "St",
        'և' => "Եւ",
        'ﬓ' => "Մն",
        'ﬔ' => "Մե",
        'ﬕ' => "Մի",
        'ﬖ' => "Վն",
        'ﬗ' => "Մխ",
        _ => {
            let code = c as u32;
            let greek = match code {
                // Iota-subscript letters title-case to their own Lt forms.
                0x1F80..=0x1F87 | 0x1F90..=0x1F97 | 0x1FA0..=0x1FA7 => char::from_u32(code + 8),
                0x1F88..=0x1F8F | 0x1F98..=0x1F9F | 0x1FA8..=0x1FAF => Some(c),
                0x1FB3 | 0x1FBC => Some('\u{1FBC}'),
                0x1FC3 | 0x1FCC => Some('\u{1FCC}'),
                0x1FF3 | 0x1FFC => Some('\u{1FFC}'),
                _ => None,
            };
            match greek {
                Some(t) => out.push(t),
                None => out.extend(c.to_uppercase()),
            }
            return;
        }
    };
    out.push_str(mapped);
}
