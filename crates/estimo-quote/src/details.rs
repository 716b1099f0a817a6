//! Detail extraction: a fixed battery of lowercase substring rules over
//! every answer (and the original request text).
//!
//! Matched values land under canonical keys; answer values matching no rule
//! are retained verbatim under `q_<question-id>` so no information is ever
//! dropped on the way to pricing and narration.

use std::collections::BTreeMap;

use estimo_core::answer::AnswerSheet;

/// One detail rule: the canonical key plus `(needle, canonical value)` pairs
/// tried in order.
struct DetailRule {
    key: &'static str,
    needles: &'static [(&'static str, &'static str)],
}

/// The extraction battery. Needle order within a rule matters: the first
/// match wins, and an earlier answer's value is never overwritten.
const RULES: &[DetailRule] = &[
    DetailRule {
        key: "location",
        needles: &[
            ("crawl space", "crawl_space"),
            ("basement", "basement"),
            ("attic", "attic"),
            ("garage", "garage"),
            ("kitchen", "kitchen"),
            ("bathroom", "bathroom"),
            ("bedroom", "bedroom"),
            ("roof", "roof"),
            ("yard", "yard"),
            ("driveway", "driveway"),
            ("office", "office"),
        ],
    },
    DetailRule {
        key: "symptom",
        needles: &[
            ("no heat", "no_heat"),
            ("not cooling", "no_cooling"),
            ("no cooling", "no_cooling"),
            ("leak", "leak"),
            ("dripping", "leak"),
            ("clog", "clog"),
            ("backed up", "clog"),
            ("no power", "no_power"),
            ("outage", "no_power"),
            ("noise", "noise"),
            ("rattling", "noise"),
            ("banging", "noise"),
            ("not working", "not_working"),
            ("won't start", "not_working"),
        ],
    },
    DetailRule {
        key: "material_preference",
        needles: &[
            ("pressure treated", "pressure_treated"),
            ("pressure-treated", "pressure_treated"),
            ("copper", "copper"),
            ("pex", "pex"),
            ("pvc", "pvc"),
            ("cedar", "cedar"),
            ("composite", "composite"),
            ("redwood", "redwood"),
            ("vinyl", "vinyl"),
            ("asphalt", "asphalt"),
            ("metal", "metal"),
        ],
    },
    DetailRule {
        key: "size_class",
        needles: &[
            ("small", "small"),
            ("compact", "small"),
            ("medium", "medium"),
            ("average", "medium"),
            ("large", "large"),
            ("big", "large"),
            ("spacious", "large"),
        ],
    },
    DetailRule {
        key: "urgency",
        needles: &[
            ("emergency", "emergency"),
            ("urgent", "emergency"),
            ("asap", "emergency"),
            ("immediately", "emergency"),
        ],
    },
    DetailRule {
        key: "access",
        needles: &[
            ("tight access", "difficult"),
            ("limited access", "difficult"),
            ("narrow", "difficult"),
            ("easy access", "easy"),
        ],
    },
    DetailRule {
        key: "service_level",
        needles: &[("premium", "premium"), ("deluxe", "premium"), ("basic", "basic")],
    },
    DetailRule {
        key: "disposal",
        needles: &[
            ("haul away", "needed"),
            ("disposal", "needed"),
            ("remove the old", "needed"),
            ("remove old", "needed"),
        ],
    },
    DetailRule {
        key: "frequency",
        needles: &[
            ("biweekly", "biweekly"),
            ("bi-weekly", "biweekly"),
            ("weekly", "weekly"),
            ("monthly", "monthly"),
            ("one-time", "once"),
            ("one time", "once"),
            ("just once", "once"),
        ],
    },
];

/// Runs the battery over every answer, then the free text. Returns the
/// populated detail map.
pub fn extract_details(answers: &AnswerSheet, free_text: &str) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();

    for (question_id, record) in answers.iter() {
        let matched = apply_rules(&record.answer.value, &mut details);
        if !matched {
            // Retained verbatim: nothing this answer said is dropped.
            details.insert(format!("q_{question_id}"), record.answer.value.clone());
        }
    }

    apply_rules(free_text, &mut details);

    details
}

/// Applies every rule to one value. Returns whether any rule matched.
fn apply_rules(value: &str, details: &mut BTreeMap<String, String>) -> bool {
    let lower = value.to_lowercase();
    let mut matched = false;

    for rule in RULES {
        for (needle, canonical) in rule.needles {
            if lower.contains(needle) {
                matched = true;
                details
                    .entry(rule.key.to_owned())
                    .or_insert_with(|| (*canonical).to_owned());
                break;
            }
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimo_core::answer::Answer;
    use pretty_assertions::assert_eq;

    fn sheet(pairs: &[(&str, &str)]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (id, value) in pairs {
            sheet.record(*id, format!("{id}?"), Answer::new(*value));
        }
        sheet
    }

    #[test]
    fn one_answer_can_populate_several_details() {
        let answers = sheet(&[("q-1", "There's a leak under the kitchen sink, please come ASAP")]);
        let details = extract_details(&answers, "");

        assert_eq!(details.get("symptom").map(String::as_str), Some("leak"));
        assert_eq!(details.get("location").map(String::as_str), Some("kitchen"));
        assert_eq!(details.get("urgency").map(String::as_str), Some("emergency"));
    }

    #[test]
    fn unmatched_answers_are_retained_verbatim() {
        let answers = sheet(&[("q-age", "It was put in around 2011 I think")]);
        let details = extract_details(&answers, "");

        assert_eq!(
            details.get("q_q-age").map(String::as_str),
            Some("It was put in around 2011 I think")
        );
    }

    #[test]
    fn earlier_answers_win_over_later_and_free_text() {
        let answers = sheet(&[("q-1", "basement unit"), ("q-2", "also one in the attic")]);
        let details = extract_details(&answers, "garage too");

        // q-1 sorts before q-2; free text runs last.
        assert_eq!(details.get("location").map(String::as_str), Some("basement"));
    }

    #[test]
    fn free_text_fills_gaps_the_answers_left() {
        let answers = sheet(&[("q-1", "yes")]);
        let details = extract_details(&answers, "cedar deck, want premium finish");

        assert_eq!(
            details.get("material_preference").map(String::as_str),
            Some("cedar")
        );
        assert_eq!(details.get("service_level").map(String::as_str), Some("premium"));
    }

    #[test]
    fn needle_order_decides_within_a_rule() {
        // "pressure treated" must win before "metal" could match elsewhere.
        let answers = sheet(&[("q-1", "pressure treated lumber with metal fasteners")]);
        let details = extract_details(&answers, "");
        assert_eq!(
            details.get("material_preference").map(String::as_str),
            Some("pressure_treated")
        );
    }
}
