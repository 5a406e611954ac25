use serde::{Deserialize, Serialize};

/// One displayed guidance line, as produced for a recognized care symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideEntry {
    pub label: String,
    pub name: String,
    pub description: String,
}

/// Nouns an intensity qualifier may precede. Only descriptions shaped
/// "qualifier + noun …" take part in near-duplicate collapsing.
const INTENSITY_NOUNS: &[&str] = &["물세탁", "드라이클리닝", "클리닝", "세탁", "건조"];

/// Intensity qualifiers, most specific first, with their strength rank.
/// Higher rank means gentler and wins a collapse.
const QUALIFIERS: &[(&str, u8)] = &[("매우 약하게", 3), ("약하게", 2), ("일반", 1)];

/// Splits a description into (qualifier rank, remainder) when it starts
/// with an intensity qualifier followed by a cleaning noun.
fn intensity_key(description: &str) -> Option<(u8, String)> {
    let trimmed = description.trim();
    for (qualifier, rank) in QUALIFIERS {
        if let Some(rest) = trimmed.strip_prefix(qualifier) {
            let rest = rest.trim_start();
            if INTENSITY_NOUNS.iter().any(|noun| rest.starts_with(noun)) {
                return Some((*rank, rest.to_string()));
            }
        }
    }
    None
}

/// Collapse duplicate guidance entries while preserving first-seen order.
///
/// Exact duplicates share (name, description) and keep the first occurrence.
/// Near duplicates share a name and descriptions equal up to an intensity
/// qualifier; the gentler variant survives, replacing the earlier one in
/// place so ordering stays stable.
pub fn dedupe_guides(entries: &[GuideEntry]) -> Vec<GuideEntry> {
    let mut out: Vec<GuideEntry> = Vec::new();
    // (name, remainder) -> (index in out, rank)
    let mut intensity_seen: Vec<((String, String), (usize, u8))> = Vec::new();

    for entry in entries {
        if out
            .iter()
            .any(|have| have.name == entry.name && have.description == entry.description)
        {
            continue;
        }

        if let Some((rank, remainder)) = intensity_key(&entry.description) {
            let key = (entry.name.clone(), remainder);
            if let Some((_, (index, seen_rank))) =
                intensity_seen.iter_mut().find(|(have, _)| *have == key)
            {
                if rank > *seen_rank {
                    log::debug!(
                        "replacing {:?} with gentler variant {:?}",
                        out[*index].description,
                        entry.description
                    );
                    out[*index] = entry.clone();
                    *seen_rank = rank;
                }
                continue;
            }
            intensity_seen.push((key, (out.len(), rank)));
        }

        out.push(entry.clone());
    }
    out
}
