//! Fixed-size splitting of input text.

/// Largest number of characters sent to the chunked provider in one request.
pub const MAX_CHUNK_CHARS: usize = 8000;

/// Iterator over contiguous slices of at most `max` characters.
///
/// Boundaries ignore words and sentences. Concatenating every item gives back
/// the original text. Cloning the iterator restarts from the same position.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max: usize,
}

/// Split `text` into chunks of at most `max` characters.
///
/// A `max` of zero is treated as one.
///
/// ```
/// let parts: Vec<_> = tts::chunk_text("abcde", 2).collect();
/// assert_eq!(parts, ["ab", "cd", "e"]);
/// ```
pub fn chunk_text(text: &str, max: usize) -> Chunks<'_> {
    Chunks {
        rest: text,
        max: max.max(1),
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(self.max)
            .map_or(self.rest.len(), |(idx, _)| idx);
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.rest.is_empty() {
            return (0, Some(0));
        }
        // Each char is 1..=4 bytes.
        let len = self.rest.len();
        (len.div_ceil(4).div_ceil(self.max), Some(len.div_ceil(self.max)))
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let text = "Hello world.";
        let chunks: Vec<_> = chunk_text(text, MAX_CHUNK_CHARS).collect();
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn exact_limit_is_one_chunk() {
        let text = "x".repeat(MAX_CHUNK_CHARS);
        assert_eq!(chunk_text(&text, MAX_CHUNK_CHARS).count(), 1);
    }

    #[test]
    fn long_text_splits_at_fixed_offsets() {
        let text = "a".repeat(MAX_CHUNK_CHARS * 2 + 3);
        let chunks: Vec<_> = chunk_text(&text, MAX_CHUNK_CHARS).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), MAX_CHUNK_CHARS);
        assert_eq!(chunks[1].chars().count(), MAX_CHUNK_CHARS);
        assert_eq!(chunks[2].chars().count(), 3);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "héllo wörld ✓✓";
        let chunks: Vec<_> = chunk_text(text, 4).collect();
        assert_eq!(chunks, vec!["héll", "o wö", "rld ", "✓✓"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunk_count_is_ceiling_of_length() {
        for len in [1usize, 7, 8, 9, 23, 24, 25] {
            let text = "z".repeat(len);
            let chunks: Vec<_> = chunk_text(&text, 8).collect();
            assert_eq!(chunks.len(), len.div_ceil(8), "len {len}");
            assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == 8));
        }
    }

    #[test]
    fn clone_restarts_sequence() {
        let chunks = chunk_text("abcdef", 4);
        let first: Vec<_> = chunks.clone().collect();
        let second: Vec<_> = chunks.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert_eq!(chunk_text("", 8).next(), None);
    }

    #[test]
    fn zero_limit_behaves_like_one() {
        let chunks: Vec<_> = chunk_text("abc", 0).collect();
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }
}
