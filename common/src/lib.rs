//! Photo Dup Common Library
//!
//! IOを持たない照合ロジックと型（CLIから利用）

pub mod index;
pub mod matcher;
pub mod types;

pub use index::CatalogIndex;
pub use matcher::{match_candidate, MatchOutcome, MatchSignal, Matcher, SizeTierKey};
pub use types::{CandidateFile, CatalogRecord, MatchGroups, MatchKind, MatchResult, MatchedFile, DATE_TIME_ORIGINAL};
