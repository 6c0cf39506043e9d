//! Grapheme-aware width measurement, ignoring ANSI control sequences.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

/// Display width of a single grapheme cluster.
///
/// RGI emoji sequences occupy two cells even when their constituent scalars
/// report narrower widths.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| {
            if ch == '\t' {
                TAB_WIDTH
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum()
}

/// Number of terminal cells a line occupies, with CSI/OSC escape sequences
/// contributing zero width.
pub fn visible_width(line: &str) -> usize {
    if line.is_empty() {
        return 0;
    }

    let mut clean = String::with_capacity(line.len());
    let bytes = line.as_bytes();
    let mut idx = 0;
    while idx < line.len() {
        if bytes[idx] == 0x1b {
            idx += escape_len(&line[idx..]);
            continue;
        }
        let ch = line[idx..].chars().next().unwrap_or('\u{fffd}');
        clean.push(ch);
        idx += ch.len_utf8();
    }

    clean.graphemes(true).map(grapheme_width).sum()
}

/// Screen rows required to display `lines` when long lines wrap at `columns`.
///
/// Each line contributes `ceil(width / columns)` rows; an empty line
/// contributes none.
pub fn display_rows<S: AsRef<str>>(lines: &[S], columns: usize) -> usize {
    let columns = columns.max(1);
    lines
        .iter()
        .map(|line| visible_width(line.as_ref()).div_ceil(columns))
        .sum()
}

// Length in bytes of the escape sequence starting at `input[0]` (which must be
// ESC). CSI runs to a final byte in 0x40..=0x7e, OSC to BEL or ST.
fn escape_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    match bytes.get(1) {
        Some(b'[') => {
            let mut idx = 2;
            while idx < bytes.len() {
                if (0x40..=0x7e).contains(&bytes[idx]) {
                    return idx + 1;
                }
                idx += 1;
            }
            bytes.len()
        }
        Some(b']') => {
            let mut idx = 2;
            while idx < bytes.len() {
                if bytes[idx] == 0x07 {
                    return idx + 1;
                }
                if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
                    return idx + 2;
                }
                idx += 1;
            }
            bytes.len()
        }
        Some(_) => 2,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{display_rows, visible_width};

    #[test]
    fn ansi_sequences_have_no_width() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
    }

    #[test]
    fn osc_hyperlink_has_no_width() {
        let input = "\x1b]8;;https://example.com\x07link\x1b]8;;\x07";
        assert_eq!(visible_width(input), 4);
    }

    #[test]
    fn emoji_is_two_cells() {
        assert_eq!(visible_width("😀"), 2);
    }

    #[test]
    fn wide_cjk_counts_double() {
        assert_eq!(visible_width("日本"), 4);
    }

    #[test]
    fn rows_round_up_per_line() {
        let lines = ["a".repeat(10), "b".repeat(25), String::new()];
        assert_eq!(display_rows(&lines, 10), 1 + 3);
    }

    #[test]
    fn zero_columns_does_not_divide_by_zero() {
        assert_eq!(display_rows(&["abc"], 0), 3);
    }
}
