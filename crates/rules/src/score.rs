use crate::compiler::CompiledRule;
use crate::definition::Category;

/// Specificity scoring seam. The default constants are hand-tuned
/// heuristics, so the policy is replaceable rather than baked into the
/// matcher.
pub trait ScorePolicy {
    /// Score a fired rule against the normalized comparison text. Higher
    /// wins within a category.
    fn score(&self, rule: &CompiledRule, text: &str) -> i32;
}

/// Additive qualifier-alignment scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScore;

impl ScorePolicy for DefaultScore {
    fn score(&self, rule: &CompiledRule, text: &str) -> i32 {
        let id = rule.id();
        let lower = text.to_lowercase();
        let mut score = 0;

        // Shared temperature digit between text and identifier.
        if let Some(number) = first_number(id) {
            if text_has_number(&lower, number) {
                score += 2;
            }
        }

        let hand_qualifier = contains_any(&lower, &["손세탁", "손빨래", "hand wash"]);
        if hand_qualifier && id.contains("hand_wash") {
            score += 3;
        }
        let machine_qualifier = contains_any(&lower, &["세탁기", "machine"]);
        if machine_qualifier && rule.def.category == Category::Washing && !id.contains("hand") {
            score += 2;
        }

        let very_gentle = contains_any(&lower, &["매우 약하게", "very gentle"]);
        let gentle = !very_gentle && contains_any(&lower, &["약하게", "gentle"]);
        if very_gentle && id.contains("very_gentle") {
            score += 3;
        }
        if gentle && id.contains("gentle") && !id.contains("very_gentle") {
            score += 2;
        }
        if id.contains("normal") && !very_gentle && !gentle {
            score += 1;
        }

        if contains_any(&lower, &["중성세제", "중성 세제", "neutral detergent"])
            && id.contains("neutral")
        {
            score += 2;
        }

        let no_steam = contains_any(&lower, &["스팀 금지", "스팀금지", "no steam"]);
        let steam = !no_steam && contains_any(&lower, &["스팀", "steam"]);
        if steam && id.contains("steam") && !id.contains("no_steam") {
            score += 2;
        }
        if no_steam && id.contains("no_steam") {
            score += 2;
        }

        if rule.def.deny {
            score += 1;
        }

        score
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// First digit run in an identifier, e.g. "hand_wash_30" → "30".
fn first_number(id: &str) -> Option<&str> {
    let start = id.find(|c: char| c.is_ascii_digit())?;
    let rest = &id[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Whether `text` carries `number` as a standalone digit run ("30" matches
/// "30 C" but not "130").
fn text_has_number(text: &str, number: &str) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .any(|run| run == number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleTable;
    use pretty_assertions::assert_eq;

    fn rule(json_record: &str) -> RuleTable {
        RuleTable::from_json_str(&format!("[{}]", json_record)).unwrap()
    }

    fn score_of(table: &RuleTable, text: &str) -> i32 {
        DefaultScore.score(&table.rules()[0], text)
    }

    #[test]
    fn temperature_digit_shared_with_identifier() {
        let t = rule(r#"{"id": "hand_wash_30", "keywords": ["손세탁"]}"#);
        // 손세탁 qualifier (+3) and shared 30 (+2)
        assert_eq!(score_of(&t, "손세탁 30 C"), 5);
        // 130 must not count as 30
        assert_eq!(score_of(&t, "손세탁 130 C"), 3);
    }

    #[test]
    fn machine_qualifier_boosts_generic_wash_rules_only() {
        let generic = rule(r#"{"id": "wash_40_normal", "keywords": ["세탁기"]}"#);
        let hand = rule(r#"{"id": "hand_wash_40", "keywords": ["손세탁"]}"#);
        // generic: machine (+2), shared 40 (+2), normal with no gentle (+1)
        assert_eq!(score_of(&generic, "세탁기 40 C"), 5);
        // hand rule gets the shared digit only
        assert_eq!(score_of(&hand, "세탁기 40 C"), 2);
    }

    #[test]
    fn gentle_and_very_gentle_are_distinct() {
        let gentle = rule(r#"{"id": "wash_gentle", "keywords": ["약하게"]}"#);
        let very = rule(r#"{"id": "wash_very_gentle", "keywords": ["매우 약하게"]}"#);
        assert_eq!(score_of(&gentle, "약하게 세탁"), 2);
        // "매우 약하게" is a very-gentle qualifier, not a gentle one
        assert_eq!(score_of(&gentle, "매우 약하게 세탁"), 0);
        assert_eq!(score_of(&very, "매우 약하게 세탁"), 3);
        assert_eq!(score_of(&very, "약하게 세탁"), 0);
    }

    #[test]
    fn normal_bonus_suppressed_by_gentle_qualifier() {
        let t = rule(r#"{"id": "wash_40_normal", "keywords": ["40°C"]}"#);
        assert_eq!(score_of(&t, "세탁 40 C"), 3); // shared digit + normal
        assert_eq!(score_of(&t, "약하게 세탁 40 C"), 2); // normal bonus gone
    }

    #[test]
    fn steam_and_no_steam_do_not_cross_fire() {
        let steam = rule(r#"{"id": "iron_steam", "keywords": ["스팀"]}"#);
        let no_steam = rule(r#"{"id": "iron_no_steam", "keywords": ["스팀 금지"]}"#);
        assert_eq!(score_of(&steam, "스팀 다림질"), 2);
        assert_eq!(score_of(&steam, "스팀 금지"), 0);
        assert_eq!(score_of(&no_steam, "스팀 금지"), 2);
        assert_eq!(score_of(&no_steam, "스팀 다림질"), 0);
    }

    #[test]
    fn neutral_detergent_alignment() {
        let t = rule(r#"{"id": "wash_neutral_detergent", "keywords": ["중성세제"]}"#);
        assert_eq!(score_of(&t, "중성세제 사용"), 2);
        assert_eq!(score_of(&t, "세제 사용"), 0);
    }

    #[test]
    fn deny_rules_get_flat_bonus() {
        let t = rule(r#"{"id": "do_not_bleach", "keywords": ["표백 금지"]}"#);
        assert_eq!(score_of(&t, "표백 금지"), 1);
    }

    #[test]
    fn adding_a_qualifier_never_lowers_the_score() {
        let t = rule(r#"{"id": "hand_wash_30", "keywords": ["손세탁"]}"#);
        let without = score_of(&t, "세탁 30 C");
        let with = score_of(&t, "손세탁 30 C");
        assert!(with >= without);
    }
}
