//! A streaming YAML lexer.
//!
//! `yamlscan` turns a byte stream in any of the five Unicode encodings YAML
//! allows into a sequence of [`Token`]s: scalars, collection indicators,
//! directives, node properties and comments, each with its source span and
//! any recoverable [`Warning`]s found while scanning it.
//!
//! Input is pulled from a [`ByteSource`] as the scanner needs it, so
//! documents of any size can be lexed with bounded lookahead.
//!
//! ```rust
//! use yamlscan::{ScalarStyle, Scanner, TokenKind};
//!
//! let mut scanner = Scanner::from_str("greeting: \"hi\\tthere\"\n");
//! let values: Vec<_> = scanner
//!     .by_ref()
//!     .filter_map(|token| match token.ok()?.kind {
//!         TokenKind::Scalar { value, style } => Some((value, style)),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(
//!     values,
//!     [
//!         ("greeting".to_string(), ScalarStyle::Plain),
//!         ("hi\tthere".to_string(), ScalarStyle::DoubleQuoted),
//!     ]
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod decode;
mod encoding;
mod error;
mod escape_buffer;
mod options;
mod position;
mod queue;
mod reader;
mod scanner;
mod source;
mod token;

pub use encoding::Encoding;
pub use error::{EncodingErrorKind, ScanError};
pub use options::{GrowthPolicy, ScannerOptions, YamlVersion};
pub use position::Mark;
pub use scanner::Scanner;
#[cfg(feature = "std")]
pub use source::ReaderSource;
pub use source::{ByteSource, ChunkSource, SliceSource};
pub use token::{ScalarStyle, Token, TokenKind, Warning};
