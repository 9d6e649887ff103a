// Copyright 2026 The portable-text-editor Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! UTF-16 offset helpers.
//!
//! All offsets exposed by the editor are UTF-16 code units, matching the
//! platform text APIs hosts hand us. Rust strings are UTF-8, so every
//! slicing operation goes through these helpers.

use unicode_segmentation::UnicodeSegmentation;

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Convert a UTF-16 offset into a byte index into `text`.
///
/// Offsets past the end clamp to `text.len()`. Offsets that land inside a
/// surrogate pair round down to the start of that character.
pub fn byte_index(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return index;
        }
        units = next;
    }
    text.len()
}

/// Split `text` at a UTF-16 offset.
pub fn split_at(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(byte_index(text, offset))
}

/// The substring covering `[start, end)` in UTF-16 units.
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    let start = byte_index(text, start);
    let end = byte_index(text, end).max(start);
    &text[start..end]
}

/// UTF-16 length of the grapheme cluster ending at `offset`, or 0 at the
/// start of the text.
pub fn previous_grapheme_len(text: &str, offset: usize) -> usize {
    let (before, _) = split_at(text, offset);
    before.graphemes(true).next_back().map_or(0, utf16_len)
}

/// UTF-16 length of the grapheme cluster starting at `offset`, or 0 at the
/// end of the text.
pub fn next_grapheme_len(text: &str, offset: usize) -> usize {
    let (_, after) = split_at(text, offset);
    after.graphemes(true).next().map_or(0, utf16_len)
}

/// Distance in UTF-16 units back to the previous word start.
///
/// Trailing whitespace before the offset is consumed together with the word,
/// matching what platform word deletion does.
pub fn previous_word_len(text: &str, offset: usize) -> usize {
    let (before, _) = split_at(text, offset);
    let mut len = 0;
    let mut seen_word = false;
    for segment in before.split_word_bounds().rev() {
        let is_space = segment.chars().all(char::is_whitespace);
        if seen_word && is_space {
            break;
        }
        len += utf16_len(segment);
        if !is_space {
            seen_word = true;
            if segment.chars().any(char::is_alphanumeric) {
                break;
            }
        }
    }
    len
}

/// Distance in UTF-16 units forward to the next word end.
pub fn next_word_len(text: &str, offset: usize) -> usize {
    let (_, after) = split_at(text, offset);
    let mut len = 0;
    let mut seen_word = false;
    for segment in after.split_word_bounds() {
        let is_space = segment.chars().all(char::is_whitespace);
        if seen_word && is_space {
            break;
        }
        len += utf16_len(segment);
        if !is_space {
            seen_word = true;
            if segment.chars().any(char::is_alphanumeric) {
                break;
            }
        }
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_len_counts_surrogate_pairs() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("\u{1F4A9}"), 2);
        assert_eq!(utf16_len("\u{03A9}"), 1);
    }

    #[test]
    fn split_at_utf16_offset() {
        assert_eq!(split_at("foobar", 3), ("foo", "bar"));
        assert_eq!(split_at("a\u{1F4A9}b", 3), ("a\u{1F4A9}", "b"));
        assert_eq!(split_at("abc", 10), ("abc", ""));
    }

    #[test]
    fn slice_clamps_out_of_range() {
        assert_eq!(slice("hello", 1, 3), "el");
        assert_eq!(slice("hello", 3, 99), "lo");
        assert_eq!(slice("hello", 4, 2), "");
    }

    #[test]
    fn grapheme_lengths() {
        let text = "ab\u{1F469}\u{1F3FF}";
        assert_eq!(previous_grapheme_len(text, utf16_len(text)), 4);
        assert_eq!(previous_grapheme_len(text, 0), 0);
        assert_eq!(next_grapheme_len(text, 1), 1);
        assert_eq!(next_grapheme_len(text, 2), 4);
    }

    #[test]
    fn word_lengths() {
        assert_eq!(previous_word_len("hello world", 11), 5);
        assert_eq!(previous_word_len("hello world ", 12), 6);
        assert_eq!(next_word_len("hello world", 5), 6);
        assert_eq!(next_word_len("hello world", 0), 5);
    }
}
