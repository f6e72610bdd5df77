//! Single-pass byte classifier.
//!
//! Derives line, word and byte counts from a stream in one forward pass with
//! a fixed-size buffer, whatever the size of the input:
//!
//! - **chars**: one per byte read. Multi-byte UTF-8 sequences count once per
//!   encoded byte.
//! - **lines**: one per line-feed byte (`0x0A`). A trailing line without a
//!   line feed is not counted.
//! - **words**: one per transition from whitespace (or the start of input)
//!   into a non-whitespace byte.
//!
//! State carries across [`Classifier::feed`] calls, so the counts do not
//! depend on how the input is chunked.

use std::io::{self, Read};

use crate::options::Metrics;
use crate::stats::Counts;

const BUF_SIZE: usize = 8 * 1024;

/// Position of the word-boundary detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    /// Previous byte was whitespace, or nothing has been read yet
    InSpace,
    /// Previous byte belonged to a word
    InWord,
}

impl WordState {
    /// Transition on one byte. Returns the next state and whether a new word
    /// starts at this byte.
    ///
    /// | state   | whitespace    | other            |
    /// |---------|---------------|------------------|
    /// | InSpace | InSpace       | InWord, +1 word  |
    /// | InWord  | InSpace       | InWord           |
    pub fn step(self, byte: u8) -> (WordState, bool) {
        match (self, is_space(byte)) {
            (_, true) => (WordState::InSpace, false),
            (WordState::InSpace, false) => (WordState::InWord, true),
            (WordState::InWord, false) => (WordState::InWord, false),
        }
    }
}

/// Whitespace as seen by a byte-wise Latin-1 reading of the input: the ASCII
/// blanks plus NEL (`0x85`) and NBSP (`0xA0`).
pub fn is_space(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | 0x85 | 0xA0
    )
}

/// Incremental counter over a byte stream.
#[derive(Debug, Clone)]
pub struct Classifier {
    metrics: Metrics,
    counts: Counts,
    state: WordState,
}

impl Classifier {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            counts: Counts::default(),
            state: WordState::InSpace,
        }
    }

    /// Consume the next chunk of the stream.
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.metrics.chars {
            self.counts.chars += chunk.len() as u64;
        }
        if self.metrics.lines {
            self.counts.lines += chunk.iter().filter(|&&b| b == b'\n').count() as u64;
        }
        if self.metrics.words {
            for &byte in chunk {
                let (next, starts_word) = self.state.step(byte);
                if starts_word {
                    self.counts.words += 1;
                }
                self.state = next;
            }
        }
    }

    /// Counts so far; disabled metrics are 0.
    pub fn finish(self) -> Counts {
        self.counts
    }
}

/// Count `reader` to exhaustion.
///
/// Interrupted reads are retried. Any other read error fails the whole count;
/// nothing read before the failure is reported.
pub fn count_stream<R: Read + ?Sized>(reader: &mut R, metrics: Metrics) -> io::Result<Counts> {
    let mut classifier = Classifier::new(metrics);
    let mut buf = [0u8; BUF_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => classifier.feed(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(classifier.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn count_all(input: &[u8]) -> Counts {
        count_stream(&mut Cursor::new(input), Metrics::all()).unwrap()
    }

    /// Hands out at most `chunk` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Yields `data`, then fails.
    struct Broken<'a> {
        data: &'a [u8],
    }

    impl Read for Broken<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("error for testing"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Interrupts every other read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let n = 1.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(count_all(b""), Counts::new(0, 0, 0));
    }

    #[test]
    fn test_multi_line_text() {
        assert_eq!(
            count_all(b"this\nis\na\nmulti line\ntext"),
            Counts::new(4, 6, 25)
        );
    }

    #[test]
    fn test_single_line_without_newline() {
        assert_eq!(count_all(b"single_line"), Counts::new(0, 1, 11));
    }

    #[test]
    fn test_file_with_two_line_words() {
        assert_eq!(
            count_all(b"single line\nand\ndouble line\nin\nfile"),
            Counts::new(4, 7, 35)
        );
    }

    #[test]
    fn test_whitespace_runs_count_once() {
        assert_eq!(count_all(b"a  b").words, 2);
        assert_eq!(count_all(b"a b").words, 2);
        assert_eq!(count_all(b"  \t\n a \r\n\x0b\x0c b  ").words, 2);
        assert_eq!(count_all(b" \n\t ").words, 0);
    }

    #[test]
    fn test_symbols_are_words() {
        let input = b"\nI love mangoes,\tapples- but it applies to most fruits.\n??--ww";
        let counts = count_all(input);
        assert_eq!(counts.lines, 2);
        assert_eq!(counts.words, 11);
        assert_eq!(counts.chars, input.len() as u64);
    }

    #[test]
    fn test_chars_are_bytes() {
        // "héllo wörld" is 11 characters but 13 bytes
        let input = "héllo wörld".as_bytes();
        let counts = count_all(input);
        assert_eq!(counts.chars, 13);
        assert_eq!(counts.words, 2);
    }

    #[test]
    fn test_latin1_blanks_split_words() {
        assert_eq!(count_all(b"a\x85b\xa0c").words, 3);
    }

    #[test]
    fn test_disabled_metrics_stay_zero() {
        let input = b"single line\nand\ndouble line\nin\nfile";
        let metrics = Metrics::none().with_lines(true).with_words(true);
        let counts = count_stream(&mut Cursor::new(&input[..]), metrics).unwrap();
        assert_eq!(counts, Counts::new(4, 7, 0));

        let counts = count_stream(&mut Cursor::new(&input[..]), Metrics::none()).unwrap();
        assert_eq!(counts, Counts::default());
    }

    #[test]
    fn test_chunking_does_not_change_counts() {
        let input = b"one two\n  three\tfour\n\nfive six seven\neight";
        let expected = count_all(input);
        for chunk in [1, 2, 3, 5, 7, 64] {
            let mut reader = Trickle { data: input, chunk };
            let counts = count_stream(&mut reader, Metrics::all()).unwrap();
            assert_eq!(counts, expected, "chunk size {chunk}");
        }
    }

    #[test]
    fn test_word_state_carries_across_feeds() {
        let mut classifier = Classifier::new(Metrics::all());
        classifier.feed(b"hel");
        classifier.feed(b"lo wor");
        classifier.feed(b"ld");
        assert_eq!(classifier.finish(), Counts::new(0, 2, 11));
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(WordState::InSpace.step(b'x'), (WordState::InWord, true));
        assert_eq!(WordState::InWord.step(b'x'), (WordState::InWord, false));
        assert_eq!(WordState::InWord.step(b' '), (WordState::InSpace, false));
        assert_eq!(WordState::InSpace.step(b'\n'), (WordState::InSpace, false));
    }

    #[test]
    fn test_read_error_discards_partial_counts() {
        let mut reader = Broken { data: b"some bytes\n" };
        let err = count_stream(&mut reader, Metrics::all()).unwrap_err();
        assert_eq!(err.to_string(), "error for testing");
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let mut reader = Flaky {
            data: b"xyz abc",
            interrupt: false,
        };
        let counts = count_stream(&mut reader, Metrics::all()).unwrap();
        assert_eq!(counts, Counts::new(0, 2, 7));
    }
}
