//! Tokens produced by the scanner.

use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt;

use crate::{encoding::Encoding, position::Mark};

/// Presentation style of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarStyle {
    /// Unquoted.
    Plain,
    /// `'...'`
    SingleQuoted,
    /// `"..."`
    DoubleQuoted,
    /// `|`
    Literal,
    /// `>`
    Folded,
}

/// What a token is, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// First token of every stream.
    StreamStart(Encoding),
    /// Last token of every stream.
    StreamEnd,
    /// `%YAML major.minor`
    VersionDirective {
        /// Major version.
        major: u32,
        /// Minor version.
        minor: u32,
    },
    /// `%TAG handle prefix`
    TagDirective {
        /// `!`, `!!` or `!name!`.
        handle: String,
        /// The prefix the handle expands to, percent-escapes decoded.
        prefix: String,
    },
    /// `---`
    DocumentStart,
    /// `...`
    DocumentEnd,
    /// A block sequence opens. Only emitted in block structure mode.
    BlockSequenceStart,
    /// A block sequence closes. Only emitted in block structure mode.
    BlockSequenceEnd,
    /// A block mapping opens. Only emitted in block structure mode.
    BlockMappingStart,
    /// A block mapping closes. Only emitted in block structure mode.
    BlockMappingEnd,
    /// `[`
    FlowSequenceStart,
    /// `]`
    FlowSequenceEnd,
    /// `{`
    FlowMappingStart,
    /// `}`
    FlowMappingEnd,
    /// `-` introducing a block sequence entry.
    BlockEntry,
    /// `,`
    FlowEntrySeparator,
    /// `?`, or an implicit key in block structure mode.
    MappingKey,
    /// `:`
    MappingValue,
    /// `&name`
    Anchor(String),
    /// `*name`
    Alias(String),
    /// A node tag.
    ///
    /// `!` alone has handle `"!"` and an empty suffix; a verbatim `!<uri>`
    /// has an empty handle and the URI as suffix.
    Tag {
        /// `!`, `!!`, `!name!` or empty for verbatim tags.
        handle: String,
        /// The rest of the tag, percent-escapes decoded.
        suffix: String,
    },
    /// A scalar with its folded, unescaped value.
    Scalar {
        /// Content after folding, escaping and chomping.
        value: String,
        /// How the scalar was written.
        style: ScalarStyle,
    },
    /// `# ...` up to the end of the line.
    Comment {
        /// Text after the `#`.
        value: String,
        /// Indentation of the line the comment is on.
        indent: u32,
        /// Whether something other than blanks precedes it on its line.
        trailing: bool,
    },
    /// Input that could not be lexed. Always carries at least one warning.
    Invalid,
}

impl TokenKind {
    /// Short name of the variant, for logs and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StreamStart(_) => "StreamStart",
            Self::StreamEnd => "StreamEnd",
            Self::VersionDirective { .. } => "VersionDirective",
            Self::TagDirective { .. } => "TagDirective",
            Self::DocumentStart => "DocumentStart",
            Self::DocumentEnd => "DocumentEnd",
            Self::BlockSequenceStart => "BlockSequenceStart",
            Self::BlockSequenceEnd => "BlockSequenceEnd",
            Self::BlockMappingStart => "BlockMappingStart",
            Self::BlockMappingEnd => "BlockMappingEnd",
            Self::FlowSequenceStart => "FlowSequenceStart",
            Self::FlowSequenceEnd => "FlowSequenceEnd",
            Self::FlowMappingStart => "FlowMappingStart",
            Self::FlowMappingEnd => "FlowMappingEnd",
            Self::BlockEntry => "BlockEntry",
            Self::FlowEntrySeparator => "FlowEntrySeparator",
            Self::MappingKey => "MappingKey",
            Self::MappingValue => "MappingValue",
            Self::Anchor(_) => "Anchor",
            Self::Alias(_) => "Alias",
            Self::Tag { .. } => "Tag",
            Self::Scalar { .. } => "Scalar",
            Self::Comment { .. } => "Comment",
            Self::Invalid => "Invalid",
        }
    }
}

/// A recoverable lexical problem, attached to the token it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    /// Human-readable description.
    pub message: Cow<'static, str>,
    /// Where the problem starts.
    pub start: Mark,
    /// Where the problem ends.
    pub end: Mark,
}

impl Warning {
    /// Creates a warning.
    pub fn new(message: impl Into<Cow<'static, str>>, start: Mark, end: Mark) -> Self {
        Self {
            message: message.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.start)
    }
}

/// A lexical token with its span and any warnings raised while scanning it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// First byte of the token.
    pub start: Mark,
    /// One past the last byte of the token.
    pub end: Mark,
    /// Problems found while scanning this token.
    pub warnings: Vec<Warning>,
}

impl Token {
    /// Creates a token without warnings.
    #[must_use]
    pub fn new(kind: TokenKind, start: Mark, end: Mark) -> Self {
        Self {
            kind,
            start,
            end,
            warnings: Vec::new(),
        }
    }

    /// Everything except comments.
    #[must_use]
    pub fn is_significant(&self) -> bool {
        !matches!(self.kind, TokenKind::Comment { .. })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn comments_are_not_significant() {
        let mark = Mark::default();
        let comment = Token::new(
            TokenKind::Comment {
                value: " note".into(),
                indent: 0,
                trailing: false,
            },
            mark,
            mark,
        );
        assert!(!comment.is_significant());
        assert_eq!(comment.kind.name(), "Comment");
        assert!(Token::new(TokenKind::MappingValue, mark, mark).is_significant());
    }

    #[test]
    fn warning_display() {
        let warning = Warning::new("reserved character", Mark::new(4, 1, 2), Mark::new(5, 1, 3));
        assert_eq!(warning.to_string(), "reserved character at 2:3");
    }
}
