//! Generic RouterOS script documents used by higher-level generators.
//!
//! A script is modelled as a [`CommandDocument`]: an ordered mapping from a
//! command-tree path (`/ip route`, `/ip firewall mangle`) to the command lines
//! issued under it. Fragments built independently are combined with
//! [`merge`] / [`merge_many`], compacted with [`shorten`], written with
//! [`write`] and read back with [`parse`].

pub mod diff;
pub mod document;
pub mod format;
pub mod parser;
pub mod shorten;
pub mod writer;

pub use diff::{diff, diff_with_options, DiffOptions, SectionDiff};
pub use document::{merge, merge_many, CommandDocument};
pub use format::{format_json, format_summary, format_text};
pub use parser::{parse, parse_file, ParseError};
pub use shorten::{shorten, shorten_with, LIST_OPTIONS};
pub use writer::{write, write_file, WriteError};
