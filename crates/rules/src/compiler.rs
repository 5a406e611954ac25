use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definition::{Category, DryKind, RawRule, RuleDefinition};
use crate::error::Result;

/// Shape of an authored temperature keyword: "30°C", "30 C", "95C".
static TEMP_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})\s*°?\s*[cC]$").expect("static pattern"));

/// One authored keyword or context word, compiled for matching against the
/// normalized comparison string. Group 1 always carries the fragment to
/// report, so digit-boundary guards never leak neighbor characters into
/// matched fragments.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Compile a keyword token.
    ///
    /// Temperature-shaped tokens tolerate a missing degree sign and flexible
    /// spacing; pure-digit tokens are anchored on digit boundaries so "40"
    /// never fires inside "140"; everything else is a case-insensitive
    /// literal substring.
    pub fn keyword(token: &str) -> Result<CompiledPattern> {
        let token = token.trim();
        let regex = if let Some(caps) = TEMP_SHAPE.captures(token) {
            Regex::new(&format!(r"(?i)({}\s*°?\s*C)", &caps[1]))?
        } else if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            Regex::new(&format!(r"(?:^|\D)({})(?:\D|$)", token))?
        } else {
            Regex::new(&format!("(?i)({})", regex::escape(token)))?
        };
        Ok(CompiledPattern {
            source: token.to_string(),
            regex,
        })
    }

    /// Compile a context word as a case-insensitive literal.
    pub fn context(word: &str) -> Result<CompiledPattern> {
        let word = word.trim();
        Ok(CompiledPattern {
            source: word.to_string(),
            regex: Regex::new(&format!("(?i)({})", regex::escape(word)))?,
        })
    }

    /// The matched fragment of `text`, if any.
    pub fn fragment<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A rule definition together with its compiled keyword and context
/// matchers. An empty context set means the rule is context-free and always
/// eligible.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub def: RuleDefinition,
    pub keywords: Vec<CompiledPattern>,
    pub context: Vec<CompiledPattern>,
}

impl CompiledRule {
    fn compile(def: RuleDefinition) -> Result<CompiledRule> {
        let keywords = def
            .keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| CompiledPattern::keyword(k))
            .collect::<Result<Vec<_>>>()?;

        let context_words: Vec<String> = match &def.context {
            Some(explicit) => explicit
                .iter()
                .filter(|w| !w.trim().is_empty())
                .map(|w| w.to_string())
                .collect(),
            None => default_context_words(&def),
        };
        let context = context_words
            .iter()
            .map(|w| CompiledPattern::context(w))
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledRule {
            def,
            keywords,
            context,
        })
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn category(&self) -> &Category {
        &self.def.category
    }
}

/// Category defaults refined per drying sub-kind: machine-dry rules add
/// mechanical words, natural-dry rules add open-air words, spin rules
/// replace the set outright.
fn default_context_words(def: &RuleDefinition) -> Vec<String> {
    let kind = DryKind::of(&def.id);
    if def.category == Category::Dry && kind == DryKind::Spin {
        return kind.extra_context().iter().map(|w| w.to_string()).collect();
    }
    let mut words: Vec<String> = def
        .category
        .default_context()
        .iter()
        .map(|w| w.to_string())
        .collect();
    if def.category == Category::Dry {
        for w in kind.extra_context() {
            if !words.iter().any(|have| have == w) {
                words.push(w.to_string());
            }
        }
    }
    words
}

/// The compiled rule table. Immutable once constructed; `RuleStore`
/// republishes a whole new table on reload.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    pub fn empty() -> RuleTable {
        RuleTable { rules: Vec::new() }
    }

    /// Compile a parsed rule-source document. Records that are not objects
    /// or lack an identifier are skipped; duplicate identifiers keep the
    /// first occurrence.
    pub fn compile_records(records: &[serde_json::Value]) -> Result<RuleTable> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut rules = Vec::new();
        for value in records {
            let Ok(raw) = serde_json::from_value::<RawRule>(value.clone()) else {
                continue;
            };
            let Some(def) = RuleDefinition::from_raw(raw) else {
                continue;
            };
            if !seen.insert(def.id.clone()) {
                continue;
            }
            rules.push(CompiledRule::compile(def)?);
        }
        log::debug!("compiled {} care rules", rules.len());
        Ok(RuleTable { rules })
    }

    /// Parse and compile a JSON rule-source document (an array of records).
    pub fn from_json_str(json: &str) -> Result<RuleTable> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
        Self::compile_records(&records)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
