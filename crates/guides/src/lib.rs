mod dedup;
mod matcher;
mod source;

pub use dedup::{dedupe_guides, GuideEntry};
pub use matcher::{normalize_for_match, strip_stop_suffixes, FlattenedGuideRecord, FuzzyGuideMatcher, MIN_SIMILARITY};
pub use source::{GuideRecord, GuideSource};
