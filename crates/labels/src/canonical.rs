use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// One canonical care-symbol code with the surface phrases that map to it.
/// Alias phrases span the languages seen on garment labels (Korean and
/// English here).
#[derive(Debug, Clone)]
pub struct CanonicalLabel {
    pub code: String,
    pub aliases: Vec<String>,
}

impl CanonicalLabel {
    pub fn new(code: &str, aliases: &[&str]) -> CanonicalLabel {
        CanonicalLabel {
            code: code.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Comparison form of a surface token: lower-case, trimmed, inner whitespace
/// collapsed, degree sign dropped, combining diacritics stripped (NFKD).
pub fn normalize_label(token: &str) -> String {
    let stripped: String = token
        .nfkd()
        .filter(|c| !is_combining_mark(*c) && *c != '°')
        .collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps arbitrary surface tokens onto the canonical code vocabulary.
///
/// The vocabulary is an ordered list, not a map: lookup order is part of the
/// contract (first match wins), and negated phrases are listed before their
/// positive counterparts so "no chlorine bleach" never resolves to plain
/// chlorine bleach via substring containment.
#[derive(Debug, Clone)]
pub struct LabelCanonicalizer {
    vocabulary: Vec<CanonicalLabel>,
}

impl LabelCanonicalizer {
    pub fn new(vocabulary: Vec<CanonicalLabel>) -> LabelCanonicalizer {
        LabelCanonicalizer { vocabulary }
    }

    /// The built-in garment-label vocabulary.
    pub fn with_default_vocabulary() -> LabelCanonicalizer {
        Self::new(default_vocabulary())
    }

    pub fn vocabulary(&self) -> &[CanonicalLabel] {
        &self.vocabulary
    }

    /// Map one surface token to a canonical code. Exact code match first,
    /// then exact alias equality, then bidirectional containment against
    /// each alias in vocabulary order. The equality pass keeps a registered
    /// alias resolving to its own code even when a longer alias of another
    /// code contains it. A miss is `None`, a normal outcome for callers to
    /// branch on.
    pub fn canonicalize(&self, token: &str) -> Option<&str> {
        let normalized = normalize_label(token);
        if normalized.is_empty() {
            return None;
        }
        if let Some(label) = self.vocabulary.iter().find(|l| l.code == normalized) {
            return Some(&label.code);
        }
        for label in &self.vocabulary {
            if label
                .aliases
                .iter()
                .any(|alias| normalize_label(alias) == normalized)
            {
                return Some(&label.code);
            }
        }
        for label in &self.vocabulary {
            for alias in &label.aliases {
                let alias_norm = normalize_label(alias);
                if alias_norm.is_empty() {
                    continue;
                }
                if normalized.contains(&alias_norm) || alias_norm.contains(&normalized) {
                    return Some(&label.code);
                }
            }
        }
        None
    }

    /// Canonicalize a token list, dropping misses and deduplicating codes in
    /// first-seen order.
    pub fn canonicalize_all(&self, tokens: &[String]) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for token in tokens {
            if let Some(code) = self.canonicalize(token) {
                if !codes.iter().any(|have| have == code) {
                    codes.push(code.to_string());
                }
            } else {
                log::debug!("no canonical code for label {:?}", token);
            }
        }
        codes
    }
}

impl Default for LabelCanonicalizer {
    fn default() -> Self {
        Self::with_default_vocabulary()
    }
}

fn default_vocabulary() -> Vec<CanonicalLabel> {
    vec![
        // Negated phrases first: containment lookup must not let a positive
        // alias swallow its prohibition form.
        CanonicalLabel::new(
            "do_not_chlorine_bleach",
            &["염소계 표백 금지", "no chlorine bleach", "염소 표백 불가"],
        ),
        CanonicalLabel::new(
            "do_not_oxygen_bleach",
            &["산소계 표백 금지", "no oxygen bleach"],
        ),
        CanonicalLabel::new(
            "do_not_bleach",
            &["표백 금지", "표백 불가", "do not bleach", "no bleach"],
        ),
        CanonicalLabel::new(
            "do_not_wash",
            &["물세탁 금지", "세탁 금지", "do not wash"],
        ),
        CanonicalLabel::new(
            "do_not_dry_clean",
            &["드라이클리닝 금지", "드라이 금지", "do not dry clean"],
        ),
        CanonicalLabel::new(
            "do_not_wet_clean",
            &["웨트클리닝 금지", "do not wet clean"],
        ),
        CanonicalLabel::new(
            "do_not_tumble_dry",
            &["건조기 금지", "건조기 사용 금지", "텀블 건조 금지", "do not tumble dry"],
        ),
        CanonicalLabel::new(
            "do_not_iron",
            &["다림질 금지", "다리미 금지", "do not iron"],
        ),
        CanonicalLabel::new(
            "do_not_spin",
            &["탈수 금지", "짜지 마세요", "do not wring", "do not spin"],
        ),
        CanonicalLabel::new("hand_wash", &["손세탁", "손빨래", "hand wash"]),
        CanonicalLabel::new(
            "machine_wash",
            &["세탁기", "물세탁", "기계세탁", "machine wash"],
        ),
        CanonicalLabel::new("chlorine_bleach", &["염소계 표백", "chlorine bleach"]),
        CanonicalLabel::new("oxygen_bleach", &["산소계 표백", "oxygen bleach"]),
        CanonicalLabel::new("steam_iron", &["스팀 다림질", "steam iron"]),
        CanonicalLabel::new("iron", &["다림질", "다리미", "ironing"]),
        CanonicalLabel::new(
            "dry_clean",
            &["드라이클리닝", "dry clean", "dry cleaning"],
        ),
        CanonicalLabel::new("wet_clean", &["웨트클리닝", "습식 세탁", "wet clean"]),
        CanonicalLabel::new(
            "tumble_dry",
            &["건조기", "텀블 건조", "기계건조", "tumble dry"],
        ),
        CanonicalLabel::new("line_dry", &["옷걸이 건조", "줄 건조", "line dry"]),
        CanonicalLabel::new("flat_dry", &["뉘어서 건조", "dry flat"]),
        CanonicalLabel::new(
            "shade_dry",
            &["그늘 건조", "그늘에서 건조", "dry in shade"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canon() -> LabelCanonicalizer {
        LabelCanonicalizer::with_default_vocabulary()
    }

    #[test]
    fn normalize_is_case_space_and_degree_insensitive() {
        assert_eq!(normalize_label("  No  Chlorine   Bleach "), "no chlorine bleach");
        assert_eq!(normalize_label("30°C"), "30c");
        assert_eq!(normalize_label("Café"), "cafe");
    }

    #[test]
    fn english_prohibition_maps_to_negated_code() {
        assert_eq!(
            canon().canonicalize("No Chlorine Bleach"),
            Some("do_not_chlorine_bleach")
        );
    }

    #[test]
    fn positive_phrase_still_reaches_positive_code() {
        assert_eq!(canon().canonicalize("chlorine bleach"), Some("chlorine_bleach"));
        assert_eq!(canon().canonicalize("염소계 표백"), Some("chlorine_bleach"));
    }

    #[test]
    fn exact_code_match_wins_first() {
        assert_eq!(canon().canonicalize("hand_wash"), Some("hand_wash"));
    }

    #[test]
    fn every_registered_alias_round_trips() {
        let c = canon();
        for label in c.vocabulary() {
            for alias in &label.aliases {
                assert_eq!(
                    c.canonicalize(alias),
                    Some(label.code.as_str()),
                    "alias {:?} should resolve to {}",
                    alias,
                    label.code
                );
            }
        }
    }

    #[test]
    fn miss_is_none_not_error() {
        assert_eq!(canon().canonicalize("패딩 충전재"), None);
        assert_eq!(canon().canonicalize(""), None);
    }

    #[test]
    fn canonicalize_all_deduplicates_first_seen() {
        let codes = canon().canonicalize_all(&[
            "손세탁".to_string(),
            "hand wash".to_string(),
            "알 수 없는 라벨".to_string(),
            "다림질 금지".to_string(),
        ]);
        assert_eq!(codes, vec!["hand_wash", "do_not_iron"]);
    }

    #[test]
    fn containment_works_both_directions() {
        let c = canon();
        // token contains alias
        assert_eq!(c.canonicalize("그늘에서 건조하세요"), Some("shade_dry"));
        // alias contains token
        assert_eq!(c.canonicalize("텀블"), Some("do_not_tumble_dry"));
    }
}
