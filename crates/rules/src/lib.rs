mod compiler;
mod definition;
mod error;
mod matcher;
mod normalize;
mod resolve;
mod score;
mod store;

pub use compiler::{CompiledPattern, CompiledRule, RuleTable};
pub use definition::{Category, DryKind, RawRule, RuleDefinition, DENY_PREFIX};
pub use error::{Result, RulesError};
pub use matcher::{MatchHit, MatchState};
pub use normalize::normalize_tokens;
pub use resolve::resolve;
pub use score::{DefaultScore, ScorePolicy};
pub use store::{RuleStore, SourceStatus, StoreSnapshot, RULES_PATH_ENV};
