//! Token-producing YAML scanner.
//!
//! # What
//!
//! [`Scanner`] pulls UTF-8 text from the [`Reader`] and turns it into
//! [`Token`]s on demand. Each call to [`Scanner::next_token`] runs the fetch
//! loop until at least one token is queued, then hands out the oldest one.
//!
//! The fetch loop skips blanks, line breaks and (where allowed) tabs, then
//! dispatches on the next byte to one of the sub-scanners:
//!
//! - `plain`: unquoted scalars.
//! - `quoted`: single- and double-quoted scalars with escapes.
//! - `block`: literal and folded block scalars.
//! - `directive`: `%YAML` and `%TAG`.
//! - `node`: tags, anchors and aliases.
//!
//! # Invariants
//!
//! - The first token is `StreamStart` and the last is `StreamEnd`; nothing is
//!   produced after `StreamEnd`.
//! - Warnings raised while scanning a token are attached to that token, and
//!   the pending warning queue is empty after every emitted token.
//! - Every `Invalid` token carries at least one warning.
//! - A lexical problem never stops the stream: the offending text becomes an
//!   `Invalid` (or best-effort) token and scanning resumes at the next line
//!   break, end of input, or blank followed by `#`.
//!
//! # Block structure
//!
//! The indentation stack and the implicit ("simple") key candidates are
//! always tracked, since plain and block scalars need the enclosing block
//! indentation. With [`ScannerOptions::block_structure`] the scanner also
//! emits the synthesized block collection tokens and inserts `MappingKey` in
//! front of confirmed implicit keys; tokens that such an insertion could
//! precede are held in the queue until the candidate is resolved.

mod block;
mod directive;
mod node;
mod plain;
mod quoted;


use alloc::{borrow::Cow, string::String, vec::Vec};

use tracing::trace;

use crate::{
    decode::utf8_width,
    encoding::Encoding,
    error::ScanError,
    options::{ScannerOptions, YamlVersion},
    position::{Mark, PositionTracker},
    queue::{Queue, Stack},
    reader::Reader,
    source::{ByteSource, SliceSource},
    token::{ScalarStyle, Token, TokenKind, Warning},
};

/// Implicit keys may not span more than this many bytes.
const MAX_SIMPLE_KEY_LENGTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowKind {
    Sequence,
    Mapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Sequence,
    Mapping,
}

/// What the current line holds so far. Only ever moves forward within a
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum LineContent {
    BlanksOnly,
    BlanksAndIndicators,
    Content,
}

/// The last significant token, as far as `:` disambiguation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Other,
    FlowStart,
    FlowEntry,
    /// A quoted scalar or the end of a flow collection.
    JsonNode,
}

#[derive(Debug, Clone, Copy)]
struct IndentLevel {
    /// Indentation to restore when this level closes.
    enclosing: i64,
    kind: BlockKind,
}

#[derive(Debug, Clone, Copy, Default)]
struct SimpleKey {
    possible: bool,
    token_number: usize,
    mark: Mark,
}

#[derive(Debug)]
pub(crate) struct ScannerState {
    /// Indentation of the current line, counted while it has no content.
    pub(crate) indent: u32,
    pub(crate) flow: Stack<FlowKind>,
    pub(crate) line_content: LineContent,
    pub(crate) stream_start_produced: bool,
    pub(crate) stream_end_produced: bool,
    pub(crate) version: YamlVersion,
}

impl ScannerState {
    fn new_line(&mut self) {
        self.indent = 0;
        self.line_content = LineContent::BlanksOnly;
    }

    fn in_flow(&self) -> bool {
        !self.flow.is_empty()
    }
}

/// Streaming YAML scanner.
///
/// # Examples
///
/// ```rust
/// use yamlscan::Scanner;
///
/// let kinds: Vec<_> = Scanner::from_str("{a: b}")
///     .map(|token| token.map(|token| token.kind.name()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(
///     kinds,
///     [
///         "StreamStart",
///         "FlowMappingStart",
///         "Scalar",
///         "MappingValue",
///         "Scalar",
///         "FlowMappingEnd",
///         "StreamEnd",
///     ]
/// );
/// # Ok::<(), yamlscan::ScanError>(())
/// ```
#[derive(Debug)]
pub struct Scanner<S> {
    reader: Reader<S>,
    options: ScannerOptions,
    pos: PositionTracker,
    state: ScannerState,
    tokens: Queue<Token>,
    /// Tokens handed to the caller so far.
    tokens_taken: usize,
    warnings: Queue<Warning>,
    indents: Stack<IndentLevel>,
    /// Column of the innermost open block collection, -1 at top level.
    block_indent: i64,
    /// One candidate per flow level, plus one for block context.
    simple_keys: Stack<SimpleKey>,
    simple_key_allowed: bool,
    previous: Previous,
    /// Start of a tab-indented run already consumed in front of content,
    /// with the warning the resulting `Invalid` token carries.
    tab_indent: Option<(Mark, &'static str)>,
    finished: bool,
}

impl<'a> Scanner<SliceSource<'a>> {
    /// Scans an in-memory byte slice with default options.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(SliceSource::new(bytes), ScannerOptions::default())
    }

    /// Scans a string with default options.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl<S: ByteSource> Scanner<S> {
    /// Creates a scanner reading from `source`.
    pub fn new(source: S, options: ScannerOptions) -> Self {
        let growth = options.growth;
        Self {
            reader: Reader::new(source, &options),
            options,
            pos: PositionTracker::default(),
            state: ScannerState {
                indent: 0,
                flow: Stack::new(growth),
                line_content: LineContent::BlanksOnly,
                stream_start_produced: false,
                stream_end_produced: false,
                version: options.version,
            },
            tokens: Queue::new(growth),
            tokens_taken: 0,
            warnings: Queue::new(growth),
            indents: Stack::new(growth),
            block_indent: -1,
            simple_keys: Stack::new(growth),
            simple_key_allowed: false,
            previous: Previous::Other,
            tab_indent: None,
            finished: false,
        }
    }

    /// The options the scanner was created with.
    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// The detected encoding, once the first token has been requested.
    pub fn encoding(&self) -> Option<Encoding> {
        self.reader.encoding()
    }

    /// The YAML version currently in effect.
    pub fn version(&self) -> YamlVersion {
        self.state.version
    }

    /// Whether [`next_token`](Self::next_token) has anything left to return.
    ///
    /// `false` once `StreamEnd` or an error has been returned.
    pub fn has_next_token(&self) -> bool {
        !self.finished
    }

    /// Returns the next token.
    ///
    /// # Errors
    ///
    /// [`ScanError::Encoding`] when the input cannot be decoded; the scanner
    /// keeps returning it afterwards. [`ScanError::StreamEnded`] when called
    /// after `StreamEnd` was returned.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        if let Some(err) = self.reader.error() {
            self.finished = true;
            return Err(err.clone());
        }
        if self.finished {
            return Err(ScanError::StreamEnded);
        }
        self.fetch_more_tokens();
        if let Some(err) = self.reader.error() {
            self.finished = true;
            return Err(err.clone());
        }
        let Some(token) = self.tokens.pop() else {
            self.finished = true;
            return Err(ScanError::StreamEnded);
        };
        self.tokens_taken += 1;
        if token.kind == TokenKind::StreamEnd {
            self.finished = true;
        }
        trace!(
            kind = token.kind.name(),
            start = %token.start,
            end = %token.end,
            warnings = token.warnings.len(),
            "token"
        );
        Ok(token)
    }

    fn fetch_more_tokens(&mut self) {
        loop {
            if self.reader.error().is_some() {
                return;
            }
            if !self.tokens.is_empty() {
                if !self.options.block_structure || self.state.stream_end_produced {
                    return;
                }
                self.stale_simple_keys();
                let next = self.tokens_taken;
                let held = self
                    .simple_keys
                    .iter()
                    .any(|key| key.possible && key.token_number == next);
                if !held {
                    return;
                }
            } else if self.state.stream_end_produced {
                return;
            }
            self.fetch_next_token();
        }
    }

    fn fetch_next_token(&mut self) {
        if !self.state.stream_start_produced {
            self.fetch_stream_start();
            return;
        }
        self.skip_to_next_token();
        if self.reader.error().is_some() {
            return;
        }
        self.stale_simple_keys();
        let tab_indent = self.tab_indent.take();
        let column = tab_indent.map_or(self.pos.column(), |(start, _)| start.column);
        self.unroll_indent(i64::from(column));
        if let Some((start, message)) = tab_indent {
            self.invalid_from(start, message);
            return;
        }

        let Some(byte) = self.peek() else {
            if self.reader.error().is_none() {
                self.fetch_stream_end();
            }
            return;
        };
        let column = self.pos.column();
        match byte {
            b'%' => self.fetch_directive(),
            b'-' if self.is_blankz_at(1) => self.fetch_block_entry(),
            b'-' if column == 0 && self.at_document_indicator() => {
                self.fetch_document_indicator(TokenKind::DocumentStart);
            }
            b'.' if column == 0 && self.at_document_indicator() => {
                self.fetch_document_indicator(TokenKind::DocumentEnd);
            }
            b'[' => self.fetch_flow_collection_start(FlowKind::Sequence),
            b'{' => self.fetch_flow_collection_start(FlowKind::Mapping),
            b']' => self.fetch_flow_collection_end(FlowKind::Sequence),
            b'}' => self.fetch_flow_collection_end(FlowKind::Mapping),
            b',' => self.fetch_flow_entry(),
            b'?' if self.is_blankz_at(1) => self.fetch_key(),
            b':' if self.colon_is_value() => self.fetch_value(),
            b'#' => self.fetch_comment(),
            b'\'' => self.fetch_flow_scalar(ScalarStyle::SingleQuoted),
            b'"' => self.fetch_flow_scalar(ScalarStyle::DoubleQuoted),
            b'|' => self.fetch_block_scalar(ScalarStyle::Literal),
            b'>' => self.fetch_block_scalar(ScalarStyle::Folded),
            b'!' => self.fetch_tag(),
            b'&' => self.fetch_anchor(false),
            b'*' => self.fetch_anchor(true),
            b'@' | b'`' => self.fetch_invalid_char(
                "'@' and '`' are reserved and cannot start a plain scalar",
            ),
            _ => self.fetch_plain_scalar(),
        }
    }

    fn colon_is_value(&mut self) -> bool {
        match self.state.flow.top() {
            Some(FlowKind::Mapping) => true,
            Some(FlowKind::Sequence) => {
                self.is_blankz_at(1)
                    || self.peek_at(1).is_some_and(is_flow_indicator)
                    || matches!(
                        self.previous,
                        Previous::FlowStart | Previous::FlowEntry | Previous::JsonNode
                    )
            }
            None => self.is_blankz_at(1),
        }
    }

    // Stream and document boundaries.

    fn fetch_stream_start(&mut self) {
        let encoding = self.reader.ensure_encoding();
        self.block_indent = -1;
        self.simple_key_allowed = true;
        self.simple_keys.push(SimpleKey::default());
        self.state.stream_start_produced = true;
        let mark = self.mark();
        self.push_token(TokenKind::StreamStart(encoding), mark, mark);
    }

    fn fetch_stream_end(&mut self) {
        self.unroll_indent(-1);
        for index in 0..self.simple_keys.len() {
            if let Some(key) = self.simple_keys.get_mut(index) {
                key.possible = false;
            }
        }
        self.simple_key_allowed = false;
        self.state.stream_end_produced = true;
        let mark = self.mark();
        self.push_token(TokenKind::StreamEnd, mark, mark);
    }

    fn fetch_document_indicator(&mut self, kind: TokenKind) {
        self.unroll_indent(-1);
        self.remove_simple_key();
        self.simple_key_allowed = false;
        let start = self.mark();
        self.skip_ascii(3);
        let end = self.mark();
        self.push_token(kind, start, end);
    }

    // Flow collections.

    fn fetch_flow_collection_start(&mut self, kind: FlowKind) {
        self.save_simple_key();
        self.state.flow.push(kind);
        self.simple_keys.push(SimpleKey::default());
        self.simple_key_allowed = true;
        let start = self.mark();
        self.skip_ascii(1);
        let token = match kind {
            FlowKind::Sequence => TokenKind::FlowSequenceStart,
            FlowKind::Mapping => TokenKind::FlowMappingStart,
        };
        let end = self.mark();
        self.push_token(token, start, end);
    }

    fn fetch_flow_collection_end(&mut self, kind: FlowKind) {
        self.remove_simple_key();
        let start = self.mark();
        self.skip_ascii(1);
        let end = self.mark();
        if self.state.flow.top() == Some(&kind) {
            self.state.flow.pop();
            self.simple_keys.pop();
        } else {
            self.warn(
                "closing bracket does not match an open flow collection",
                start,
                end,
            );
        }
        self.simple_key_allowed = false;
        let token = match kind {
            FlowKind::Sequence => TokenKind::FlowSequenceEnd,
            FlowKind::Mapping => TokenKind::FlowMappingEnd,
        };
        self.push_token(token, start, end);
    }

    fn fetch_flow_entry(&mut self) {
        self.remove_simple_key();
        self.simple_key_allowed = true;
        let start = self.mark();
        self.skip_ascii(1);
        let end = self.mark();
        self.push_token(TokenKind::FlowEntrySeparator, start, end);
    }

    // Block indicators.

    fn fetch_block_entry(&mut self) {
        let start = self.mark();
        if !self.state.in_flow() {
            if !self.simple_key_allowed && self.options.block_structure {
                self.warn(
                    "block sequence entries are not allowed in this context",
                    start,
                    start.offset(1, 1),
                );
            }
            self.roll_indent(start.column, BlockKind::Sequence, None, start);
        }
        self.remove_simple_key();
        self.simple_key_allowed = true;
        self.skip_indicator();
        let end = self.mark();
        self.push_token(TokenKind::BlockEntry, start, end);
    }

    fn fetch_key(&mut self) {
        let start = self.mark();
        if !self.state.in_flow() {
            if !self.simple_key_allowed && self.options.block_structure {
                self.warn(
                    "mapping keys are not allowed in this context",
                    start,
                    start.offset(1, 1),
                );
            }
            self.roll_indent(start.column, BlockKind::Mapping, None, start);
        }
        self.remove_simple_key();
        self.simple_key_allowed = !self.state.in_flow();
        self.skip_indicator();
        let end = self.mark();
        self.push_token(TokenKind::MappingKey, start, end);
    }

    fn fetch_value(&mut self) {
        let start = self.mark();
        let candidate = self.simple_keys.top().copied().filter(|key| key.possible);
        if let Some(key) = candidate {
            if let Some(top) = self.simple_keys.top_mut() {
                top.possible = false;
            }
            if self.options.block_structure {
                self.insert_token(key.token_number, TokenKind::MappingKey, key.mark, key.mark);
            }
            self.roll_indent(
                key.mark.column,
                BlockKind::Mapping,
                Some(key.token_number),
                key.mark,
            );
            self.simple_key_allowed = false;
        } else {
            if !self.state.in_flow() {
                if !self.simple_key_allowed && self.options.block_structure {
                    self.warn(
                        "mapping values are not allowed in this context",
                        start,
                        start.offset(1, 1),
                    );
                }
                self.roll_indent(start.column, BlockKind::Mapping, None, start);
            }
            self.simple_key_allowed = !self.state.in_flow();
        }
        self.skip_indicator();
        let end = self.mark();
        self.push_token(TokenKind::MappingValue, start, end);
    }

    /// Consumes a one-byte block indicator; it counts towards the line's
    /// indentation while the line has no content.
    fn skip_indicator(&mut self) {
        if self.state.line_content != LineContent::Content {
            self.state.indent += 1;
        }
        self.skip_ascii(1);
    }

    // Comments and invalid input.

    fn fetch_comment(&mut self) {
        let trailing = self.state.line_content != LineContent::BlanksOnly;
        let token = self.scan_comment(trailing);
        self.queue_token(token);
    }

    /// Scans `#...` up to the end of the line without queueing it.
    fn scan_comment(&mut self, trailing: bool) -> Token {
        let start = self.mark();
        self.skip_ascii(1);
        let mut value = String::new();
        while !self.is_breakz_at(0) {
            self.read_char(&mut value);
        }
        let end = self.mark();
        Token::new(
            TokenKind::Comment {
                value,
                indent: self.state.indent,
                trailing,
            },
            start,
            end,
        )
    }

    /// Turns the character at the cursor and whatever follows up to the
    /// resynchronization point into an `Invalid` token.
    fn fetch_invalid_char(&mut self, message: &'static str) {
        let start = self.mark();
        if !self.is_breakz_at(0) {
            self.skip_char();
        }
        self.skip_to_resync_point();
        let end = self.mark();
        self.warn(message, start, end);
        self.push_token(TokenKind::Invalid, start, end);
    }

    /// Skips to the next line break, end of input, or blank followed by `#`.
    fn skip_to_resync_point(&mut self) {
        while !self.is_breakz_at(0) {
            if self.is_blank_at(0) && self.peek_at(1) == Some(b'#') {
                break;
            }
            self.skip_char();
        }
    }

    /// Ends the current token as `Invalid` after skipping to the
    /// resynchronization point.
    fn invalid_from(&mut self, start: Mark, message: impl Into<Cow<'static, str>>) {
        self.skip_to_resync_point();
        let end = self.mark();
        self.warn(message, start, end);
        self.push_token(TokenKind::Invalid, start, end);
    }

    // Whitespace.

    fn skip_to_next_token(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') => self.skip_indentation_blank(),
                Some(b'\t') => {
                    if self.state.in_flow() || self.state.line_content != LineContent::BlanksOnly {
                        self.skip_ascii(1);
                    } else if !self.skip_tab_indentation() {
                        return;
                    }
                }
                Some(0xEF)
                    if self.pos.column() == 0
                        && self.peek_at(1) == Some(0xBB)
                        && self.peek_at(2) == Some(0xBF) =>
                {
                    self.skip_ascii(3);
                }
                _ if self.is_break_at(0) => {
                    self.skip_break();
                    if !self.state.in_flow() {
                        self.simple_key_allowed = true;
                    }
                }
                _ => return,
            }
        }
    }

    /// Consumes a tab-led run of blanks on a line with nothing else on it
    /// yet. Returns `false` when content follows the run, which is then
    /// reported as an `Invalid` token from the first tab.
    fn skip_tab_indentation(&mut self) -> bool {
        let start = self.mark();
        while self.is_blank_at(0) {
            self.skip_indentation_blank();
        }
        if self.is_breakz_at(0) || self.peek() == Some(b'#') {
            return true;
        }
        self.tab_indent = Some((start, "tabs are not allowed in block indentation"));
        false
    }

    fn skip_indentation_blank(&mut self) {
        if self.peek() == Some(b' ') && self.state.line_content != LineContent::Content {
            self.state.indent += 1;
        }
        self.skip_ascii(1);
    }

    fn skip_blanks(&mut self) {
        while self.is_blank_at(0) {
            self.skip_ascii(1);
        }
    }

    // Block indentation.

    fn roll_indent(&mut self, column: u32, kind: BlockKind, number: Option<usize>, mark: Mark) {
        if self.state.in_flow() {
            return;
        }
        let column = i64::from(column);
        if self.block_indent >= column {
            return;
        }
        self.indents.push(IndentLevel {
            enclosing: self.block_indent,
            kind,
        });
        self.block_indent = column;
        if self.options.block_structure {
            let token = match kind {
                BlockKind::Sequence => TokenKind::BlockSequenceStart,
                BlockKind::Mapping => TokenKind::BlockMappingStart,
            };
            match number {
                Some(number) => self.insert_token(number, token, mark, mark),
                None => self.queue_token(Token::new(token, mark, mark)),
            }
        }
    }

    fn unroll_indent(&mut self, column: i64) {
        if self.state.in_flow() {
            return;
        }
        while self.block_indent > column {
            let Some(level) = self.indents.pop() else {
                break;
            };
            self.block_indent = level.enclosing;
            if self.options.block_structure {
                let mark = self.mark();
                let token = match level.kind {
                    BlockKind::Sequence => TokenKind::BlockSequenceEnd,
                    BlockKind::Mapping => TokenKind::BlockMappingEnd,
                };
                self.queue_token(Token::new(token, mark, mark));
            }
        }
    }

    // Implicit keys.

    fn save_simple_key(&mut self) {
        if !self.simple_key_allowed {
            return;
        }
        let key = SimpleKey {
            possible: true,
            token_number: self.tokens_taken + self.tokens.len(),
            mark: self.mark(),
        };
        if let Some(top) = self.simple_keys.top_mut() {
            *top = key;
        }
    }

    fn remove_simple_key(&mut self) {
        if let Some(top) = self.simple_keys.top_mut() {
            top.possible = false;
        }
    }

    /// Implicit keys end on the line they start and are at most
    /// `MAX_SIMPLE_KEY_LENGTH` bytes long.
    fn stale_simple_keys(&mut self) {
        let here = self.mark();
        for index in 0..self.simple_keys.len() {
            if let Some(key) = self.simple_keys.get_mut(index) {
                if key.possible
                    && (key.mark.line < here.line
                        || key.mark.index.saturating_add(MAX_SIMPLE_KEY_LENGTH) < here.index)
                {
                    key.possible = false;
                }
            }
        }
    }

    // Token queue.

    /// Queues a scanned token, attaching pending warnings.
    fn push_token(&mut self, kind: TokenKind, start: Mark, end: Mark) {
        let mut warnings = Vec::with_capacity(self.warnings.len());
        while let Some(warning) = self.warnings.pop() {
            warnings.push(warning);
        }
        self.note_token(&kind, end);
        self.tokens.push(Token {
            kind,
            start,
            end,
            warnings,
        });
    }

    /// Queues a token that does not affect line or `:` bookkeeping.
    fn queue_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn insert_token(&mut self, number: usize, kind: TokenKind, start: Mark, end: Mark) {
        let index = number.saturating_sub(self.tokens_taken).min(self.tokens.len());
        self.tokens.insert(index, Token::new(kind, start, end));
    }

    /// A token that ended on an earlier line, such as a multi-line plain
    /// scalar, leaves the current line's content state alone.
    fn note_token(&mut self, kind: &TokenKind, end: Mark) {
        match kind {
            TokenKind::BlockEntry | TokenKind::MappingKey | TokenKind::MappingValue => {
                if self.state.line_content == LineContent::BlanksOnly {
                    self.state.line_content = LineContent::BlanksAndIndicators;
                }
            }
            TokenKind::Comment { .. } | TokenKind::StreamStart(_) | TokenKind::StreamEnd => {}
            TokenKind::Scalar {
                style: ScalarStyle::Literal | ScalarStyle::Folded,
                ..
            } => {}
            _ if end.line == self.pos.mark().line => {
                self.state.line_content = LineContent::Content;
            }
            _ => {}
        }
        self.previous = match kind {
            TokenKind::Comment { .. } => return,
            TokenKind::FlowSequenceStart | TokenKind::FlowMappingStart => Previous::FlowStart,
            TokenKind::FlowEntrySeparator => Previous::FlowEntry,
            TokenKind::FlowSequenceEnd
            | TokenKind::FlowMappingEnd
            | TokenKind::Scalar {
                style: ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted,
                ..
            } => Previous::JsonNode,
            _ => Previous::Other,
        };
    }

    fn warn(&mut self, message: impl Into<Cow<'static, str>>, start: Mark, end: Mark) {
        let warning = Warning::new(message, start, end);
        #[cfg(any(test, feature = "fuzzing"))]
        if self.options.panic_on_warning {
            panic!("scanner warning: {warning}");
        }
        self.warnings.push(warning);
    }

    // Lookahead and consumption.

    fn mark(&self) -> Mark {
        self.pos.mark()
    }

    fn peek(&mut self) -> Option<u8> {
        self.reader.peek_at(0)
    }

    fn peek_at(&mut self, offset: usize) -> Option<u8> {
        self.reader.peek_at(offset)
    }

    /// Length of the line break at `offset`, if there is one.
    fn break_len_at(&mut self, offset: usize) -> Option<usize> {
        match self.peek_at(offset)? {
            b'\n' => Some(1),
            b'\r' if self.peek_at(offset + 1) == Some(b'\n') => Some(2),
            b'\r' => Some(1),
            0xC2 if self.state.version == YamlVersion::V1_1
                && self.peek_at(offset + 1) == Some(0x85) =>
            {
                Some(2)
            }
            0xE2 if self.state.version == YamlVersion::V1_1
                && self.peek_at(offset + 1) == Some(0x80)
                && matches!(self.peek_at(offset + 2), Some(0xA8 | 0xA9)) =>
            {
                Some(3)
            }
            _ => None,
        }
    }

    fn is_break_at(&mut self, offset: usize) -> bool {
        self.break_len_at(offset).is_some()
    }

    fn is_breakz_at(&mut self, offset: usize) -> bool {
        self.peek_at(offset).is_none() || self.is_break_at(offset)
    }

    fn is_blank_at(&mut self, offset: usize) -> bool {
        self.peek_at(offset).is_some_and(is_blank)
    }

    fn is_blankz_at(&mut self, offset: usize) -> bool {
        self.is_blank_at(offset) || self.is_breakz_at(offset)
    }

    /// `---` or `...` followed by a blank, break or end of input.
    fn at_document_indicator(&mut self) -> bool {
        let Some(first @ (b'-' | b'.')) = self.peek() else {
            return false;
        };
        self.peek_at(1) == Some(first) && self.peek_at(2) == Some(first) && self.is_blankz_at(3)
    }

    /// Consumes `n` single-byte characters.
    fn skip_ascii(&mut self, n: usize) {
        self.reader.consume(n);
        self.pos.advance(to_u32(n));
    }

    fn char_width(&mut self) -> usize {
        self.peek().and_then(utf8_width).unwrap_or(1)
    }

    fn skip_char(&mut self) {
        let width = self.char_width();
        if self.reader.cache(width) {
            self.reader.consume(width);
            self.pos.advance(to_u32(width));
        }
    }

    /// Moves one character from the input to `out`.
    fn read_char(&mut self, out: &mut String) {
        let width = self.char_width();
        let mut bytes = [0u8; 4];
        for (offset, byte) in bytes.iter_mut().enumerate().take(width) {
            match self.peek_at(offset) {
                Some(value) => *byte = value,
                None => return,
            }
        }
        let (ch, _) = bstr::decode_utf8(&bytes[..width]);
        out.push(ch.unwrap_or(char::REPLACEMENT_CHARACTER));
        self.reader.consume(width);
        self.pos.advance(to_u32(width));
    }

    fn skip_break(&mut self) {
        if let Some(len) = self.break_len_at(0) {
            self.reader.consume(len);
            self.pos.advance_line(to_u32(len));
            self.state.new_line();
        }
    }

    /// Moves one line break to `out`. CR, LF, CRLF and NEL become `\n`; LS
    /// and PS are kept.
    fn read_break(&mut self, out: &mut String) {
        let Some(len) = self.break_len_at(0) else {
            return;
        };
        match (self.peek(), self.peek_at(2)) {
            (Some(0xE2), Some(0xA8)) => out.push('\u{2028}'),
            (Some(0xE2), Some(0xA9)) => out.push('\u{2029}'),
            _ => out.push('\n'),
        }
        self.reader.consume(len);
        self.pos.advance_line(to_u32(len));
        self.state.new_line();
    }
}

impl<S: ByteSource> Iterator for Scanner<S> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next_token() {
            Some(self.next_token())
        } else {
            None
        }
    }
}

pub(crate) fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}

pub(crate) fn is_flow_indicator(byte: u8) -> bool {
    matches!(byte, b',' | b'[' | b']' | b'{' | b'}')
}

#[allow(clippy::cast_possible_truncation)]
fn to_u32(n: usize) -> u32 {
    n.min(u32::MAX as usize) as u32
}
