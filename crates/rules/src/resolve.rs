use crate::matcher::MatchHit;

/// Keep one winning hit per category and order the survivors
/// deterministically: deny hits first, then score descending, then category
/// name ascending.
///
/// Hits arrive in compiled-rule order, so "first wins on equal score" falls
/// out of the strictly-greater replacement below.
pub fn resolve(hits: Vec<MatchHit>) -> Vec<MatchHit> {
    let mut best: Vec<MatchHit> = Vec::new();
    for hit in hits {
        match best.iter_mut().find(|have| have.category == hit.category) {
            Some(current) => {
                if hit.score > current.score {
                    *current = hit;
                }
            }
            None => best.push(hit),
        }
    }

    best.sort_by(|a, b| {
        b.is_deny()
            .cmp(&a.is_deny())
            .then(b.score.cmp(&a.score))
            .then_with(|| a.category.name().cmp(b.category.name()))
    });
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Category;
    use crate::matcher::MatchState;
    use pretty_assertions::assert_eq;

    fn hit(id: &str, category: Category, state: MatchState, score: i32) -> MatchHit {
        MatchHit {
            id: id.to_string(),
            state,
            message: String::new(),
            fragments: vec![],
            category,
            score,
        }
    }

    #[test]
    fn one_winner_per_category() {
        let resolved = resolve(vec![
            hit("hand_wash_30", Category::Washing, MatchState::Allow, 5),
            hit("wash_40_normal", Category::Washing, MatchState::Allow, 3),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "hand_wash_30");
    }

    #[test]
    fn ties_keep_first_compiled_rule() {
        let resolved = resolve(vec![
            hit("wash_a", Category::Washing, MatchState::Allow, 2),
            hit("wash_b", Category::Washing, MatchState::Allow, 2),
        ]);
        assert_eq!(resolved[0].id, "wash_a");
    }

    #[test]
    fn deny_hits_come_first() {
        let resolved = resolve(vec![
            hit("hand_wash_30", Category::Washing, MatchState::Allow, 5),
            hit("do_not_bleach", Category::Bleach, MatchState::Deny, 1),
        ]);
        assert_eq!(resolved[0].id, "do_not_bleach");
        assert_eq!(resolved[1].id, "hand_wash_30");
    }

    #[test]
    fn equal_scores_order_by_category_name() {
        let resolved = resolve(vec![
            hit("iron_steam", Category::Iron, MatchState::Allow, 2),
            hit("bleach_oxygen", Category::Bleach, MatchState::Allow, 2),
        ]);
        assert_eq!(resolved[0].category, Category::Bleach);
        assert_eq!(resolved[1].category, Category::Iron);
    }
}
