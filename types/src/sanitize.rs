//! Terminal text sanitization.
//!
//! Model answers are untrusted text that is printed straight into the
//! terminal. Escape sequences in them could move the cursor, rewrite the
//! screen, set the window title or touch the clipboard (OSC 52), so they are
//! removed before the text reaches the transcript.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

/// Strip escape sequences and control characters, keeping `\n` and `\t`.
///
/// `\r\n` is folded into `\n`; a lone `\r` is dropped.
///
/// ```
/// use tlapal_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("Hola"), "Hola");
/// assert_eq!(sanitize_terminal_text("Ho\x1b[2Jla"), "Hola");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.next() {
                Some('[') => skip_csi(&mut chars),
                Some(']') => skip_string(&mut chars, true),
                Some('P' | '^' | '_' | 'X') => skip_string(&mut chars, false),
                // Charset designation and line attributes take one more byte.
                Some('(' | ')' | '*' | '+' | '#' | ' ') => {
                    chars.next();
                }
                _ => {}
            },
            C1_CSI => skip_csi(&mut chars),
            '\n' | '\t' => out.push(c),
            c if is_control(c) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{80}'..='\u{9f}').contains(&c)
}

fn is_unsafe(c: char) -> bool {
    is_control(c) && c != '\n' && c != '\t'
}

/// CSI: parameter and intermediate bytes (0x20-0x3F) up to a final byte (0x40-0x7E).
fn skip_csi<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) {
    while let Some(&c) = chars.peek() {
        match c {
            '\x20'..='\x3f' => {
                chars.next();
            }
            '\x40'..='\x7e' => {
                chars.next();
                return;
            }
            _ => return,
        }
    }
}

/// OSC/DCS/PM/APC payloads end at ST (`ESC \`); OSC also ends at BEL.
fn skip_string<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>, bel_ends: bool) {
    while let Some(c) = chars.next() {
        if bel_ends && c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        let input = "Usa 3 bultos de cemento.\nY arena.";
        assert!(matches!(sanitize_terminal_text(input), Cow::Borrowed(_)));
    }

    #[test]
    fn keeps_spanish_text() {
        let input = "Tlapalería: ¿cuántas cubetas? ñ á é í ó ú";
        assert_eq!(sanitize_terminal_text(input), input);
    }

    #[test]
    fn strips_color_codes() {
        assert_eq!(
            sanitize_terminal_text("\x1b[1;32mListo\x1b[0m"),
            "Listo"
        );
    }

    #[test]
    fn strips_osc52_clipboard_write() {
        assert_eq!(
            sanitize_terminal_text("a\x1b]52;c;SGVsbG8=\x07b"),
            "ab"
        );
        assert_eq!(
            sanitize_terminal_text("a\x1b]52;c;SGVsbG8=\x1b\\b"),
            "ab"
        );
    }

    #[test]
    fn strips_dcs_payload() {
        assert_eq!(sanitize_terminal_text("x\x1bPq#0;2\x1b\\y"), "xy");
    }

    #[test]
    fn strips_c1_csi() {
        assert_eq!(sanitize_terminal_text("a\u{9b}2Jb"), "ab");
    }

    #[test]
    fn folds_crlf_and_drops_controls() {
        assert_eq!(
            sanitize_terminal_text("uno\r\ndos\x00\x7f\ttres"),
            "uno\ndos\ttres"
        );
    }

    #[test]
    fn truncated_sequences_are_dropped() {
        assert_eq!(sanitize_terminal_text("fin\x1b"), "fin");
        assert_eq!(sanitize_terminal_text("fin\x1b[38;5"), "fin");
        assert_eq!(sanitize_terminal_text("fin\x1b]0;titulo"), "fin");
    }
}
