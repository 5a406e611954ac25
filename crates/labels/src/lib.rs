mod canonical;
mod conflict;

pub use canonical::{normalize_label, CanonicalLabel, LabelCanonicalizer};
pub use conflict::{default_conflict_groups, resolve_conflicts, ConflictGroup, VisionOwned};
