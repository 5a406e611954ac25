use serde::Deserialize;

/// Identifier prefix that marks a prohibition rule.
pub const DENY_PREFIX: &str = "do_not_";

/// Care-instruction category a rule belongs to. One winner survives per
/// category after conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Washing,
    Bleach,
    Iron,
    DryClean,
    WetClean,
    Dry,
    Other(String),
}

impl Category {
    /// Parse an explicit category value from a rule record.
    pub fn parse(value: &str) -> Category {
        match value.trim().to_ascii_lowercase().as_str() {
            "washing" | "wash" => Category::Washing,
            "bleach" => Category::Bleach,
            "iron" => Category::Iron,
            "dry_clean" => Category::DryClean,
            "wet_clean" => Category::WetClean,
            "dry" => Category::Dry,
            other => Category::Other(other.to_string()),
        }
    }

    /// Infer the category from an identifier when the record carries none.
    pub fn infer(id: &str) -> Category {
        let base = id.strip_prefix(DENY_PREFIX).unwrap_or(id);
        if base.starts_with("dry_clean") {
            Category::DryClean
        } else if base.starts_with("wet_clean") {
            Category::WetClean
        } else if base.starts_with("wash")
            || base.starts_with("hand_wash")
            || base.starts_with("machine_wash")
        {
            Category::Washing
        } else if base.contains("bleach") {
            Category::Bleach
        } else if base.contains("iron") {
            Category::Iron
        } else if base.starts_with("natural_dry")
            || base.starts_with("machine_dry")
            || base.starts_with("tumble")
            || base.starts_with("spin")
            || base.contains("dry")
        {
            Category::Dry
        } else {
            Category::Other("other".to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Category::Washing => "washing",
            Category::Bleach => "bleach",
            Category::Iron => "iron",
            Category::DryClean => "dry_clean",
            Category::WetClean => "wet_clean",
            Category::Dry => "dry",
            Category::Other(name) => name,
        }
    }

    /// Default context-word set applied when a rule declares no explicit
    /// context. Category `other` is context-free.
    pub fn default_context(&self) -> &'static [&'static str] {
        match self {
            Category::Washing => &["세탁", "빨래", "물세탁", "손세탁", "세탁기", "wash"],
            Category::Bleach => &["표백", "염소", "산소", "bleach"],
            Category::Iron => &["다리미", "다림질", "스팀", "iron"],
            Category::DryClean => &["드라이", "클리닝", "dry clean"],
            Category::WetClean => &["웨트", "습식", "wet clean"],
            Category::Dry => &["건조", "탈수", "dry"],
            Category::Other(_) => &[],
        }
    }
}

/// Sub-kind of a drying rule, used to refine the default context words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryKind {
    Machine,
    Natural,
    Spin,
    None,
}

impl DryKind {
    pub fn of(id: &str) -> DryKind {
        let base = id.strip_prefix(DENY_PREFIX).unwrap_or(id);
        if base.starts_with("spin") {
            DryKind::Spin
        } else if base.starts_with("machine_dry") || base.starts_with("tumble") {
            DryKind::Machine
        } else if base.starts_with("natural_dry") {
            DryKind::Natural
        } else {
            DryKind::None
        }
    }

    /// Extra context words this sub-kind contributes. Spin rules replace the
    /// category defaults entirely rather than extending them.
    pub fn extra_context(&self) -> &'static [&'static str] {
        match self {
            DryKind::Machine => &["건조기", "텀블", "tumble"],
            DryKind::Natural => &["자연건조", "햇볕", "그늘", "옷걸이", "뉘어서"],
            DryKind::Spin => &["탈수", "짜기", "짜지", "원심", "spin"],
            DryKind::None => &[],
        }
    }
}

/// One rule record as it appears in the rule-source document. Every field
/// except the identifier is optional; records without an identifier are
/// skipped by the compiler.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub context: Option<Vec<String>>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub display: Option<String>,
}

/// A rule record with the derived fields resolved.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub id: String,
    pub display: String,
    pub message: String,
    pub keywords: Vec<String>,
    pub category: Category,
    pub deny: bool,
    /// Explicit required-context words. `None` means the category default
    /// applies at compile time.
    pub context: Option<Vec<String>>,
}

impl RuleDefinition {
    /// Resolve a raw record. Returns `None` for records without an
    /// identifier, which the compiler skips silently.
    pub fn from_raw(raw: RawRule) -> Option<RuleDefinition> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return None;
        }
        let category = match raw.category.as_deref() {
            Some(explicit) if !explicit.trim().is_empty() => Category::parse(explicit),
            _ => Category::infer(&id),
        };
        let deny = id.starts_with(DENY_PREFIX);
        let display = raw
            .display
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Some(RuleDefinition {
            display,
            message: raw.message,
            keywords: raw.keywords,
            category,
            deny,
            context: raw.context,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn infers_categories_from_identifier_prefixes() {
        assert_eq!(Category::infer("hand_wash_30"), Category::Washing);
        assert_eq!(Category::infer("wash_40_normal"), Category::Washing);
        assert_eq!(Category::infer("do_not_bleach"), Category::Bleach);
        assert_eq!(Category::infer("bleach_oxygen"), Category::Bleach);
        assert_eq!(Category::infer("iron_steam"), Category::Iron);
        assert_eq!(Category::infer("do_not_iron"), Category::Iron);
        assert_eq!(Category::infer("dry_clean"), Category::DryClean);
        assert_eq!(Category::infer("do_not_dry_clean"), Category::DryClean);
        assert_eq!(Category::infer("wet_clean"), Category::WetClean);
        assert_eq!(Category::infer("natural_dry_shade"), Category::Dry);
        assert_eq!(Category::infer("machine_dry_low"), Category::Dry);
        assert_eq!(Category::infer("do_not_spin"), Category::Dry);
        assert_eq!(
            Category::infer("store_flat"),
            Category::Other("other".to_string())
        );
    }

    #[test]
    fn dry_clean_wins_over_dry() {
        // "dry_clean" must not fall into the drying category
        assert_eq!(Category::infer("dry_clean_gentle"), Category::DryClean);
    }

    #[test]
    fn dry_kinds() {
        assert_eq!(DryKind::of("machine_dry_low"), DryKind::Machine);
        assert_eq!(DryKind::of("do_not_tumble_dry"), DryKind::Machine);
        assert_eq!(DryKind::of("natural_dry_shade"), DryKind::Natural);
        assert_eq!(DryKind::of("do_not_spin"), DryKind::Spin);
        assert_eq!(DryKind::of("hand_wash_30"), DryKind::None);
    }

    #[test]
    fn deny_flag_and_display_fallback() {
        let def = RuleDefinition::from_raw(RawRule {
            id: "do_not_bleach".into(),
            keywords: vec!["표백 금지".into()],
            category: None,
            context: None,
            message: "표백제를 사용하지 마세요.".into(),
            display: None,
        })
        .unwrap();
        assert!(def.deny);
        assert_eq!(def.display, "do_not_bleach");
        assert_eq!(def.category, Category::Bleach);
    }

    #[test]
    fn record_without_identifier_is_rejected() {
        let raw = RawRule {
            id: "  ".into(),
            keywords: vec![],
            category: None,
            context: None,
            message: String::new(),
            display: None,
        };
        assert!(RuleDefinition::from_raw(raw).is_none());
    }

    #[test]
    fn explicit_category_overrides_inference() {
        let def = RuleDefinition::from_raw(RawRule {
            id: "hand_wash_30".into(),
            keywords: vec![],
            category: Some("iron".into()),
            context: None,
            message: String::new(),
            display: None,
        })
        .unwrap();
        assert_eq!(def.category, Category::Iron);
    }
}
