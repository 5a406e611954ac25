use serde::{Deserialize, Serialize};

/// Codes that contradict each other on one garment. At most one member of a
/// group may survive conflict resolution. Group tables are configuration
/// data, loadable from JSON alongside the rule source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictGroup {
    codes: Vec<String>,
}

impl ConflictGroup {
    pub fn new(codes: &[&str]) -> ConflictGroup {
        ConflictGroup {
            codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }
}

/// The built-in contradiction table: a prohibition and its positive
/// counterpart never both apply.
pub fn default_conflict_groups() -> Vec<ConflictGroup> {
    vec![
        ConflictGroup::new(&["machine_wash", "do_not_wash"]),
        ConflictGroup::new(&["hand_wash", "do_not_wash"]),
        ConflictGroup::new(&["chlorine_bleach", "do_not_chlorine_bleach", "do_not_bleach"]),
        ConflictGroup::new(&["oxygen_bleach", "do_not_oxygen_bleach", "do_not_bleach"]),
        ConflictGroup::new(&["iron", "do_not_iron"]),
        ConflictGroup::new(&["steam_iron", "do_not_iron"]),
        ConflictGroup::new(&["dry_clean", "do_not_dry_clean"]),
        ConflictGroup::new(&["wet_clean", "do_not_wet_clean"]),
        ConflictGroup::new(&["tumble_dry", "do_not_tumble_dry"]),
    ]
}

/// Drop the weaker members of every conflict group.
///
/// Each scored code keeps its input position; within a group the entry with
/// the highest confidence survives, earlier entries winning ties. Codes
/// outside every group pass through untouched.
pub fn resolve_conflicts(
    scored: &[(String, f32)],
    groups: &[ConflictGroup],
) -> Vec<(String, f32)> {
    let mut keep = vec![true; scored.len()];
    for group in groups {
        let mut best: Option<usize> = None;
        for (idx, (code, confidence)) in scored.iter().enumerate() {
            if !keep[idx] || !group.contains(code) {
                continue;
            }
            match best {
                None => best = Some(idx),
                Some(best_idx) => {
                    if *confidence > scored[best_idx].1 {
                        keep[best_idx] = false;
                        best = Some(idx);
                    } else {
                        keep[idx] = false;
                    }
                }
            }
        }
        if let Some(best_idx) = best {
            for (idx, (code, _)) in scored.iter().enumerate() {
                if idx != best_idx && keep[idx] && group.contains(code) {
                    log::debug!(
                        "dropping {} in favour of {}",
                        code,
                        scored[best_idx].0
                    );
                    keep[idx] = false;
                }
            }
        }
    }
    scored
        .iter()
        .zip(keep)
        .filter(|(_, kept)| *kept)
        .map(|(entry, _)| entry.clone())
        .collect()
}

/// Codes whose authority lives with the symbol recognizer rather than the
/// text pipeline. Text-derived duplicates of these are discarded so the two
/// sources never disagree in the merged output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisionOwned {
    codes: Vec<String>,
}

impl VisionOwned {
    pub fn new(codes: &[&str]) -> VisionOwned {
        VisionOwned {
            codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_owned(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Remove vision-owned codes from a text-derived list, keeping order.
    pub fn filter(&self, codes: &[String]) -> Vec<String> {
        codes
            .iter()
            .filter(|code| !self.is_owned(code))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scored(entries: &[(&str, f32)]) -> Vec<(String, f32)> {
        entries
            .iter()
            .map(|(code, conf)| (code.to_string(), *conf))
            .collect()
    }

    #[test]
    fn higher_confidence_member_survives() {
        let out = resolve_conflicts(
            &scored(&[("iron", 0.4), ("do_not_iron", 0.9)]),
            &default_conflict_groups(),
        );
        assert_eq!(out, scored(&[("do_not_iron", 0.9)]));
    }

    #[test]
    fn earlier_entry_wins_confidence_ties() {
        let out = resolve_conflicts(
            &scored(&[("dry_clean", 0.7), ("do_not_dry_clean", 0.7)]),
            &default_conflict_groups(),
        );
        assert_eq!(out, scored(&[("dry_clean", 0.7)]));
    }

    #[test]
    fn codes_outside_every_group_pass_through() {
        let input = scored(&[("shade_dry", 0.5), ("hand_wash", 0.8)]);
        let out = resolve_conflicts(&input, &default_conflict_groups());
        assert_eq!(out, input);
    }

    #[test]
    fn blanket_prohibition_beats_both_bleach_variants() {
        let out = resolve_conflicts(
            &scored(&[
                ("chlorine_bleach", 0.3),
                ("oxygen_bleach", 0.4),
                ("do_not_bleach", 0.95),
            ]),
            &default_conflict_groups(),
        );
        assert_eq!(out, scored(&[("do_not_bleach", 0.95)]));
    }

    #[test]
    fn surviving_entries_keep_input_order() {
        let out = resolve_conflicts(
            &scored(&[
                ("hand_wash", 0.9),
                ("iron", 0.2),
                ("shade_dry", 0.6),
                ("do_not_iron", 0.8),
            ]),
            &default_conflict_groups(),
        );
        assert_eq!(
            out,
            scored(&[("hand_wash", 0.9), ("shade_dry", 0.6), ("do_not_iron", 0.8)])
        );
    }

    #[test]
    fn vision_owned_codes_are_filtered_from_text_results() {
        let owned = VisionOwned::new(&["do_not_bleach", "iron"]);
        let codes: Vec<String> = ["hand_wash", "do_not_bleach", "shade_dry"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(owned.filter(&codes), vec!["hand_wash", "shade_dry"]);
    }

    #[test]
    fn empty_inputs_are_fine() {
        assert!(resolve_conflicts(&[], &default_conflict_groups()).is_empty());
        let out = resolve_conflicts(&scored(&[("iron", 0.5)]), &[]);
        assert_eq!(out, scored(&[("iron", 0.5)]));
    }
}
