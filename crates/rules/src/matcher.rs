use serde::Serialize;

use crate::compiler::RuleTable;
use crate::definition::Category;
use crate::normalize::normalize_tokens;
use crate::resolve::resolve;
use crate::score::{DefaultScore, ScorePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    Allow,
    Deny,
}

/// One fired rule: the analysis output unit.
#[derive(Debug, Clone, Serialize)]
pub struct MatchHit {
    pub id: String,
    pub state: MatchState,
    pub message: String,
    /// Matched keyword spans plus the satisfying context fragment,
    /// deduplicated in first-seen order.
    pub fragments: Vec<String>,
    #[serde(serialize_with = "serialize_category")]
    pub category: Category,
    pub score: i32,
}

fn serialize_category<S: serde::Serializer>(
    category: &Category,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(category.name())
}

impl MatchHit {
    pub fn is_deny(&self) -> bool {
        self.state == MatchState::Deny
    }
}

impl RuleTable {
    /// Analyze recognized-text tokens against the table: context-gate each
    /// rule, require a keyword hit, score, then resolve to at most one hit
    /// per category, deny hits first.
    pub fn analyze(&self, tokens: &[String]) -> Vec<MatchHit> {
        self.analyze_with(tokens, &DefaultScore)
    }

    /// `analyze` with a caller-supplied scoring policy.
    pub fn analyze_with(&self, tokens: &[String], policy: &dyn ScorePolicy) -> Vec<MatchHit> {
        let text = normalize_tokens(tokens);
        if text.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for rule in self.rules() {
            // Context gate: a rule with context patterns is eligible only if
            // one of them matches. Context-free rules always pass. This keeps
            // a bare shared number from cross-triggering unrelated
            // categories.
            let context_fragment = if rule.context.is_empty() {
                None
            } else {
                match rule.context.iter().find_map(|p| p.fragment(&text)) {
                    Some(frag) => Some(frag.to_string()),
                    None => continue,
                }
            };

            let mut fragments: Vec<String> = Vec::new();
            for pattern in &rule.keywords {
                if let Some(frag) = pattern.fragment(&text) {
                    push_unique(&mut fragments, frag.to_string());
                }
            }
            if fragments.is_empty() {
                continue;
            }
            if let Some(frag) = context_fragment {
                push_unique(&mut fragments, frag);
            }

            let score = policy.score(rule, &text);
            log::debug!("rule {} fired with score {}", rule.id(), score);
            hits.push(MatchHit {
                id: rule.def.id.clone(),
                state: if rule.def.deny {
                    MatchState::Deny
                } else {
                    MatchState::Allow
                },
                message: rule.def.message.clone(),
                fragments,
                category: rule.def.category.clone(),
                score,
            });
        }

        resolve(hits)
    }

    /// Display labels of rules whose keywords match the text, deduplicated
    /// in rule order. Used for "recognized symbol" chips; no context gating
    /// and no conflict resolution.
    pub fn extract_rule_keywords(&self, tokens: &[String]) -> Vec<String> {
        let text = normalize_tokens(tokens);
        if text.is_empty() {
            return Vec::new();
        }
        let mut labels = Vec::new();
        for rule in self.rules() {
            if rule.keywords.iter().any(|p| p.is_match(&text)) {
                push_unique(&mut labels, rule.def.display.clone());
            }
        }
        labels
    }
}

fn push_unique(items: &mut Vec<String>, candidate: String) {
    if !items.iter().any(|have| *have == candidate) {
        items.push(candidate);
    }
}
