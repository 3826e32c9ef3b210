//! Path classification subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     pattern text
//!     → clean.rs (normalize leading slash, dot segments)
//!     → pattern.rs (split into literal / variable tokens)
//!     → routing::node (trie insertion)
//!
//! Dispatch:
//!     request path
//!     → clean.rs (normalize)
//!     → routing::node (lookup, pattern.rs captures variable values)
//! ```
//!
//! # Design Decisions
//! - Token kind is resolved once, at classification time
//! - Variable grammar is `{` `*`? `[A-Za-z_]*` `}`, scanned by hand (no regex)
//! - Prefix utilities work on bytes; the trie splits labels at byte offsets

pub mod clean;
pub mod pattern;
pub mod prefix;

pub use clean::{ensure_root_slash, normalize};
pub use pattern::{
    capture, classify, parse_variable, split_pattern, PatternError, PatternToken, TokenKind,
};
pub use prefix::{common_prefix_len, compare_ignoring_shared_prefix};

/// The root path.
pub const ROOT_PATH: &str = "/";

/// Path segment separator.
pub const SEPARATOR: u8 = b'/';
