#![doc = include_str!("../README.md")]

mod config;
mod consolidate;
mod dump;
mod elapsed;
mod error;
mod group;
mod histogram;
mod insertion_map;
mod names;
mod parsers;
pub mod report;
mod size;
mod tracing;

pub use crate::config::{Config, OutputMode};
pub use crate::consolidate::{Consolidator, Outcome, read_trace, write_report};
pub use crate::dump::{KeyedMap, TraceDump};
pub use crate::elapsed::parse_elapsed;
pub use crate::error::Error;
pub use crate::group::{Consolidation, Group, base_name};
pub use crate::histogram::{Bucket, Histogram};
pub use crate::insertion_map::InsertionMap;
pub use crate::names::{
    Ausyscall, MIGRATETYPE, NameTable, SCAN_STATUS, SyscallNames, SyscallResolver,
};
pub use crate::parsers::{key_pair, key_parts, numeric_key_pair};
pub use crate::report::{Profile, ProfileKind, Report};
pub use crate::size::{format_size, parse_size};

pub(crate) use hashbrown::HashMap;
