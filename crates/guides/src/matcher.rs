use strsim::normalized_levenshtein;

use crate::source::{GuideRecord, GuideSource};

/// Similarity floor for the ratio fallback. Containment hits bypass it.
pub const MIN_SIMILARITY: f64 = 0.55;

/// Generic suffix words that add nothing to a stain name.
const STOP_SUFFIXES: &[&str] = &["얼룩", "제거법", "제거하기", "지우기", "제거", "stains", "stain"];

/// Cross-language synonym rows. A query hitting any member expands to the
/// whole row.
const SYNONYM_ROWS: &[&[&str]] = &[
    &["커피", "coffee", "커피와 차"],
    &["혈흔", "피", "blood"],
    &["적포도주", "와인", "wine"],
    &["잉크", "펜", "ink", "pen"],
    &["기름", "윤활유", "oil", "grease"],
    &["껌", "gum"],
    &["화장품", "cosmetic", "makeup"],
    &["땀", "sweat"],
    &["곰팡이", "mold", "mould"],
    &["초콜릿", "chocolate"],
    &["잔디", "풀물", "grass"],
    &["녹", "rust"],
    &["주스", "juice"],
    &["소스", "케첩", "sauce", "ketchup"],
    &["치약", "toothpaste"],
    &["페인트", "염색약", "paint", "dye"],
];

/// Drop generic suffix words from a stain name before comparison.
pub fn strip_stop_suffixes(name: &str) -> String {
    let mut out = name.to_string();
    for suffix in STOP_SUFFIXES {
        out = out.replace(suffix, " ");
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison form: lower-case, letters and digits only.
pub fn normalize_for_match(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// A guide record reduced to its fixed output fields. Missing source fields
/// stay empty rather than erroring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FlattenedGuideRecord {
    pub title: String,
    pub steps: Vec<String>,
    pub tips: Vec<String>,
    pub avoid: Vec<String>,
    pub notes: Vec<String>,
}

impl From<&GuideRecord> for FlattenedGuideRecord {
    fn from(record: &GuideRecord) -> FlattenedGuideRecord {
        FlattenedGuideRecord {
            title: record.title.clone().unwrap_or_default(),
            steps: record.steps.clone(),
            tips: record.tips.clone(),
            avoid: record.avoid.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Matches a free-text stain or material query against flattened guide
/// records. Containment against the expanded target set decides first; a
/// similarity ratio over the same candidates is the fallback.
pub struct FuzzyGuideMatcher {
    synonyms: Vec<Vec<String>>,
}

impl FuzzyGuideMatcher {
    pub fn new() -> FuzzyGuideMatcher {
        FuzzyGuideMatcher {
            synonyms: SYNONYM_ROWS
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    /// The normalized target set for a query: the whole synonym row on a
    /// hit, the lone normalized query otherwise.
    pub fn expand(&self, query: &str) -> Vec<String> {
        let needle = normalize_for_match(&strip_stop_suffixes(query));
        if needle.is_empty() {
            return Vec::new();
        }
        let row = self.synonyms.iter().find(|row| {
            row.iter()
                .any(|member| normalize_for_match(member) == needle)
        });
        match row {
            Some(row) => {
                let mut targets: Vec<String> = row
                    .iter()
                    .map(|member| normalize_for_match(member))
                    .filter(|t| !t.is_empty())
                    .collect();
                if !targets.iter().any(|t| t == &needle) {
                    targets.push(needle);
                }
                targets
            }
            None => vec![needle],
        }
    }

    /// Match a document against a query. Containment wins outright; the
    /// ratio fallback accepts only scores at or above `MIN_SIMILARITY`.
    /// No match is `None`, a normal outcome.
    pub fn find(&self, query: &str, source: &GuideSource) -> Option<FlattenedGuideRecord> {
        self.find_in(query, &source.flatten())
    }

    pub fn find_in(&self, query: &str, records: &[GuideRecord]) -> Option<FlattenedGuideRecord> {
        let targets = self.expand(query);
        if targets.is_empty() {
            return None;
        }

        for record in records {
            for candidate in record.candidate_strings() {
                let cand = normalize_for_match(&strip_stop_suffixes(candidate));
                if cand.is_empty() {
                    continue;
                }
                if targets
                    .iter()
                    .any(|t| cand.contains(t.as_str()) || t.contains(&cand))
                {
                    log::debug!("guide containment hit {:?} for query {:?}", candidate, query);
                    return Some(record.into());
                }
            }
        }

        let mut best: Option<(f64, &GuideRecord)> = None;
        for record in records {
            for candidate in record.candidate_strings() {
                let cand = normalize_for_match(&strip_stop_suffixes(candidate));
                if cand.is_empty() {
                    continue;
                }
                for target in &targets {
                    let score = normalized_levenshtein(target, &cand);
                    if best.map_or(true, |(top, _)| score > top) {
                        best = Some((score, record));
                    }
                }
            }
        }
        match best {
            Some((score, record)) if score >= MIN_SIMILARITY => {
                log::debug!("guide similarity hit {:.2} for query {:?}", score, query);
                Some(record.into())
            }
            _ => None,
        }
    }
}

impl Default for FuzzyGuideMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(title: &str, aliases: &[&str]) -> GuideRecord {
        GuideRecord {
            title: Some(title.to_string()),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            ..GuideRecord::default()
        }
    }

    #[test]
    fn english_query_matches_korean_title_via_alias_expansion() {
        let matcher = FuzzyGuideMatcher::new();
        let records = vec![
            record("펜과 잉크 얼룩", &[]),
            record("커피와 차 얼룩", &["coffee"]),
        ];
        let hit = matcher.find_in("coffee stain", &records).unwrap();
        assert_eq!(hit.title, "커피와 차 얼룩");
    }

    #[test]
    fn synonym_row_expands_across_languages() {
        let matcher = FuzzyGuideMatcher::new();
        let targets = matcher.expand("blood");
        assert!(targets.iter().any(|t| t == "혈흔"));
        assert!(targets.iter().any(|t| t == "blood"));
    }

    #[test]
    fn stop_suffixes_are_stripped_before_comparison() {
        assert_eq!(strip_stop_suffixes("커피 얼룩 제거법"), "커피");
        assert_eq!(strip_stop_suffixes("coffee stain"), "coffee");
    }

    #[test]
    fn containment_wins_over_similarity() {
        let matcher = FuzzyGuideMatcher::new();
        let records = vec![record("초콜릿 얼룩", &[]), record("초콜릿과 코코아", &[])];
        // "초콜릿" is contained by the first record's stripped title
        let hit = matcher.find_in("초콜릿", &records).unwrap();
        assert_eq!(hit.title, "초콜릿 얼룩");
    }

    #[test]
    fn similarity_fallback_accepts_close_spellings() {
        let matcher = FuzzyGuideMatcher::new();
        let records = vec![record("ketchop", &[])];
        // no containment either way, ratio is 6/7
        let hit = matcher.find_in("ketchup", &records);
        assert!(hit.is_some());
    }

    #[test]
    fn similarity_below_floor_is_a_miss() {
        let matcher = FuzzyGuideMatcher::new();
        let records = vec![record("자외선 차단제 얼룩", &[])];
        assert!(matcher.find_in("banana", &records).is_none());
    }

    #[test]
    fn empty_query_never_matches() {
        let matcher = FuzzyGuideMatcher::new();
        let records = vec![record("혈흔", &[])];
        assert!(matcher.find_in("", &records).is_none());
        assert!(matcher.find_in("얼룩", &records).is_none());
    }

    #[test]
    fn flattened_record_defaults_missing_fields_to_empty() {
        let matcher = FuzzyGuideMatcher::new();
        let hit = matcher.find_in("혈흔", &[record("혈흔", &[])]).unwrap();
        assert!(hit.steps.is_empty());
        assert!(hit.tips.is_empty());
        assert!(hit.avoid.is_empty());
        assert!(hit.notes.is_empty());
    }
}
