//! Grouping output lines into diagnostic blocks.

use std::str::Lines;

use crate::classify::{LineKind, classify};

/// One diagnostic occurrence: a header line plus the context lines that
/// followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticBlock<'a> {
    /// 1-based line number of the header within the output.
    line_number: usize,
    /// Header first, never empty.
    lines: Vec<&'a str>,
}

impl<'a> DiagnosticBlock<'a> {
    fn open(line_number: usize, header: &'a str) -> Self {
        Self {
            line_number,
            lines: vec![header],
        }
    }

    /// 1-based line number of the header within the output.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn header(&self) -> &'a str {
        self.lines[0]
    }

    /// Lines after the header (source snippet, caret annotation, ...).
    fn context_lines(&self) -> &[&'a str] {
        &self.lines[1..]
    }

    /// The third line of the block, which carries the caret/underline
    /// annotation when the compiler printed one.
    #[must_use]
    pub fn annotation_line(&self) -> Option<&'a str> {
        self.context_lines().get(1).copied()
    }
}

/// Push-based segmenter: feed lines in output order, receive each block
/// once the next header seals it.
///
/// ```
/// use buildlens_extract::BlockSegmenter;
///
/// let mut segmenter = BlockSegmenter::new();
/// assert!(segmenter.push("Compiling...").is_none());
/// assert!(segmenter.push("a.swift:1:1: error: x").is_none());
/// let first = segmenter.push("b.swift:2:1: warning: y").unwrap();
/// assert_eq!(first.header(), "a.swift:1:1: error: x");
/// assert_eq!(segmenter.finish().unwrap().line_number(), 3);
/// assert_eq!(segmenter.ignored_lines(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BlockSegmenter<'a> {
    current: Option<DiagnosticBlock<'a>>,
    lines_seen: usize,
    ignored: usize,
}

impl<'a> BlockSegmenter<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line. Returns the previous block when `line` opens a
    /// new one.
    pub fn push(&mut self, line: &'a str) -> Option<DiagnosticBlock<'a>> {
        self.lines_seen += 1;
        match classify(line) {
            LineKind::BlockStart => self
                .current
                .replace(DiagnosticBlock::open(self.lines_seen, line)),
            LineKind::Continuation => {
                match &mut self.current {
                    Some(block) => block.lines.push(line),
                    None => self.ignored += 1,
                }
                None
            }
        }
    }

    /// Seal and return the open block, if any.
    pub fn finish(&mut self) -> Option<DiagnosticBlock<'a>> {
        self.current.take()
    }

    /// Lines discarded because no block was open yet.
    #[must_use]
    pub fn ignored_lines(&self) -> usize {
        self.ignored
    }
}

/// Iterator over the blocks of a complete output text.
#[derive(Debug)]
pub struct Segments<'a> {
    lines: Lines<'a>,
    segmenter: BlockSegmenter<'a>,
    exhausted: bool,
}

impl Segments<'_> {
    /// Lines dropped before the first header (so far).
    #[must_use]
    pub fn ignored_lines(&self) -> usize {
        self.segmenter.ignored_lines()
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = DiagnosticBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        for line in self.lines.by_ref() {
            if let Some(block) = self.segmenter.push(line) {
                return Some(block);
            }
        }
        self.exhausted = true;
        self.segmenter.finish()
    }
}

/// Split `text` into diagnostic blocks, in output order.
///
/// Accepts `\n` and `\r\n` line endings.
#[must_use]
pub fn segment(text: &str) -> Segments<'_> {
    Segments {
        lines: text.lines(),
        segmenter: BlockSegmenter::new(),
        exhausted: false,
    }
}
