//! Fuzzy subcategory matching for the resolver's second tier.
//!
//! Candidate subcategories and the requested one are tokenized (lowercase,
//! abbreviation expansion, tokens longer than two characters) and scored by
//! weighted overlap: generic stop-words are worth 1 point, everything else 5.
//! A heating-vs-cooling polarity conflict vetoes the candidate outright, no
//! matter how much generic vocabulary it shares.

use estimo_config::FlowConfig;

/// Score forced onto a candidate that conflicts on keyword polarity. Any
/// negative value loses to the acceptance threshold; this one also loses to
/// every honest score in debug output.
pub const CONFLICT_VETO_SCORE: i32 = -1000;

/// Tokenizes text for overlap scoring: lowercase, expand configured
/// abbreviations, split on non-alphanumerics, keep distinct tokens longer
/// than two characters (first occurrence order).
pub fn normalize_tokens(text: &str, flow: &FlowConfig) -> Vec<String> {
    let lower = text.to_lowercase();

    // Abbreviations expand whole words before the length filter runs, so a
    // two-letter "ac" still becomes "air conditioner".
    let mut expanded = String::with_capacity(lower.len());
    for word in lower.split_whitespace() {
        let stripped = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '/');
        match flow.abbreviations.get(stripped) {
            Some(expansion) => expanded.push_str(expansion),
            None => expanded.push_str(word),
        }
        expanded.push(' ');
    }

    let mut tokens: Vec<String> = Vec::new();
    for token in expanded.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.len() > 2 && !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_owned());
        }
    }
    tokens
}

/// Weighted overlap between request and candidate token sets.
pub fn score_overlap(request: &[String], candidate: &[String], flow: &FlowConfig) -> i32 {
    request
        .iter()
        .filter(|token| candidate.contains(token))
        .map(|token| {
            if flow.stop_words.iter().any(|s| s == token) {
                1
            } else {
                5
            }
        })
        .sum()
}

/// Whether tokens carry the given polarity (token equals or extends a
/// keyword, so "heating" matches "heat" and "heaters" matches "heater").
fn has_polarity(tokens: &[String], keywords: &[String]) -> bool {
    tokens
        .iter()
        .any(|t| keywords.iter().any(|k| t == k || t.starts_with(k.as_str())))
}

/// The fixed heating-vs-cooling conflict veto: a purely-heating request must
/// never land on a purely-cooling subcategory, and vice versa.
pub fn polarity_conflict(request: &[String], candidate: &[String], flow: &FlowConfig) -> bool {
    let req_heat = has_polarity(request, &flow.heating_keywords);
    let req_cool = has_polarity(request, &flow.cooling_keywords);
    let cand_heat = has_polarity(candidate, &flow.heating_keywords);
    let cand_cool = has_polarity(candidate, &flow.cooling_keywords);

    (req_heat && !req_cool && cand_cool && !cand_heat)
        || (req_cool && !req_heat && cand_heat && !cand_cool)
}

/// Scores one candidate subcategory against the request.
pub fn score_candidate(request_tokens: &[String], candidate: &str, flow: &FlowConfig) -> i32 {
    let candidate_tokens = normalize_tokens(candidate, flow);
    if polarity_conflict(request_tokens, &candidate_tokens, flow) {
        return CONFLICT_VETO_SCORE;
    }
    score_overlap(request_tokens, &candidate_tokens, flow)
}

/// Picks the best-scoring candidate at or above the acceptance threshold.
/// Ties break lexicographically for determinism.
pub fn best_match(request: &str, candidates: &[String], flow: &FlowConfig) -> Option<String> {
    let request_tokens = normalize_tokens(request, flow);
    candidates
        .iter()
        .map(|candidate| (score_candidate(&request_tokens, candidate, flow), candidate))
        .filter(|(score, _)| *score >= flow.min_fuzzy_score)
        .max_by(|(score_a, cand_a), (score_b, cand_b)| {
            score_a.cmp(score_b).then(cand_b.cmp(cand_a))
        })
        .map(|(_, candidate)| candidate.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flow() -> FlowConfig {
        FlowConfig::default()
    }

    #[test]
    fn tokens_are_lowercased_filtered_and_deduped() {
        let tokens = normalize_tokens("Gas Furnace -- gas furnace, or so", &flow());
        assert_eq!(tokens, vec!["gas", "furnace"]);
    }

    #[test]
    fn abbreviations_expand_before_length_filter() {
        let tokens = normalize_tokens("AC not cooling", &flow());
        assert_eq!(tokens, vec!["air", "conditioner", "not", "cooling"]);
    }

    #[test]
    fn domain_words_outweigh_stop_words() {
        let f = flow();
        let request = normalize_tokens("furnace repair service", &f);
        let strong = normalize_tokens("furnace maintenance", &f);
        let weak = normalize_tokens("repair service", &f);
        // "furnace" (5) vs "repair" + "service" (1 + 1).
        assert_eq!(score_overlap(&request, &strong, &f), 5);
        assert_eq!(score_overlap(&request, &weak, &f), 2);
    }

    #[test]
    fn heating_request_never_matches_cooling_candidate() {
        let f = flow();
        // High generic overlap: central/system/repair/service all shared.
        let best = best_match(
            "central heating system repair service",
            &["central cooling system repair service".to_owned()],
            &f,
        );
        assert_eq!(best, None);

        let score = score_candidate(
            &normalize_tokens("central heating system repair service", &f),
            "central cooling system repair service",
            &f,
        );
        assert_eq!(score, CONFLICT_VETO_SCORE);
    }

    #[test]
    fn mixed_polarity_candidates_are_not_vetoed() {
        let f = flow();
        let request = normalize_tokens("no heat from furnace", &f);
        let candidate = normalize_tokens("heating and cooling tune-up", &f);
        assert!(!polarity_conflict(&request, &candidate, &f));
    }

    #[test]
    fn threshold_rejects_weak_overlap() {
        let f = flow();
        // Only stop-word overlap: "repair" + "service" = 2 < 3.
        let best = best_match(
            "gutter repair service",
            &["window repair service".to_owned()],
            &f,
        );
        assert_eq!(best, None);
    }

    #[test]
    fn best_candidate_wins_and_ties_break_lexicographically() {
        let f = flow();
        let candidates = vec![
            "furnace repair".to_owned(),
            "furnace replacement".to_owned(),
            "duct cleaning".to_owned(),
        ];
        // "furnace tune" overlaps "furnace" (5) with both furnace candidates;
        // the lexicographically smaller one wins the tie.
        let best = best_match("furnace tune", &candidates, &f);
        assert_eq!(best.as_deref(), Some("furnace repair"));
    }

    #[test]
    fn abbreviated_request_reaches_expanded_candidate() {
        let f = flow();
        let best = best_match(
            "ac is leaking",
            &["air conditioner repair".to_owned(), "furnace repair".to_owned()],
            &f,
        );
        assert_eq!(best.as_deref(), Some("air conditioner repair"));
    }
}
