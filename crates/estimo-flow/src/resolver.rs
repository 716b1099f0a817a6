//! Three-tier question resolution and completion checking.

use tracing::debug;

use estimo_core::answer::AnswerSheet;
use estimo_core::question::QuestionDefinition;
use estimo_config::FlowConfig;
use estimo_storage::{CatalogStore, StorageError};

use crate::fuzzy;
use crate::precondition;

/// Errors from the resolver. Store-read failures are fatal; everything else
/// in the flow degrades instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("store error: {0}")]
    Store(#[from] StorageError),
}

/// The resolver's answer: the next question to ask, plus the subcategory the
/// fuzzy tier actually matched when it differs from the request.
///
/// Callers MUST persist `resolved_subcategory` on their session when present;
/// all future bookkeeping keys off the resolved value, not the requested one.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub question: QuestionDefinition,
    pub resolved_subcategory: Option<String>,
}

/// Selects the next applicable unanswered question for a session.
pub struct Resolver<'a> {
    store: &'a dyn CatalogStore,
    flow: &'a FlowConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn CatalogStore, flow: &'a FlowConfig) -> Self {
        Self { store, flow }
    }

    /// Returns the next question, or `None` when the resolved tier has no
    /// applicable unanswered definitions left. `None` is the terminal state
    /// of an interview, not an error.
    pub fn next_question(
        &self,
        category: &str,
        subcategory: Option<&str>,
        answers: &AnswerSheet,
    ) -> Result<Option<Resolution>, FlowError> {
        let (definitions, resolved_subcategory) = self.resolve_tier(category, subcategory)?;
        Ok(select_next(&definitions, answers).map(|question| Resolution {
            question: question.clone(),
            resolved_subcategory: resolved_subcategory.clone(),
        }))
    }

    /// True iff every precondition-applicable required definition in the
    /// resolved tier is answered, and at least `min_required_answers` of them
    /// are. One lone required question is never enough to price a scope.
    pub fn is_completion_satisfied(
        &self,
        category: &str,
        subcategory: Option<&str>,
        answers: &AnswerSheet,
    ) -> Result<bool, FlowError> {
        let (definitions, _) = self.resolve_tier(category, subcategory)?;

        let required: Vec<&QuestionDefinition> = definitions
            .iter()
            .filter(|d| d.required_for_completion)
            .filter(|d| precondition::applies(d.precondition.as_deref(), answers))
            .collect();

        let answered = required.iter().filter(|d| answers.is_answered(&d.id)).count();
        Ok(answered == required.len() && answered >= self.flow.min_required_answers)
    }

    // -- Tier resolution -----------------------------------------------------

    /// Exact -> fuzzy -> generic. Returns the winning tier's definitions and
    /// the resolved subcategory when the fuzzy tier changed it.
    fn resolve_tier(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<(Vec<QuestionDefinition>, Option<String>), FlowError> {
        match subcategory {
            Some(requested) => {
                // Tier 1: exact subcategory (plus category-wide definitions).
                let definitions = self.store.list_questions(category, Some(requested))?;
                let has_specific = definitions
                    .iter()
                    .any(|d| d.subcategory.as_deref() == Some(requested));
                if has_specific {
                    return Ok((definitions, None));
                }

                // Tier 2: fuzzy, only when the requested subcategory has zero
                // definitions of its own.
                let all = self.store.list_all_questions(category)?;
                let mut candidates: Vec<String> =
                    all.iter().filter_map(|d| d.subcategory.clone()).collect();
                candidates.sort();
                candidates.dedup();

                if let Some(resolved) = fuzzy::best_match(requested, &candidates, self.flow) {
                    debug!(requested, resolved, "fuzzy tier resolved subcategory");
                    let definitions = self.store.list_questions(category, Some(&resolved))?;
                    if !definitions.is_empty() {
                        return Ok((definitions, Some(resolved)));
                    }
                }
            }
            None => {
                let definitions = self.store.list_questions(category, None)?;
                if !definitions.is_empty() {
                    return Ok((definitions, None));
                }
            }
        }

        // Tier 3a: category-scoped catch-all subcategory.
        let definitions = self
            .store
            .list_questions(category, Some(&self.flow.generic_subcategory))?;
        if !definitions.is_empty() {
            return Ok((definitions, None));
        }

        // Tier 3b: universal pool keyed by coarse intent.
        let intent = self.intent_label(subcategory);
        debug!(category, intent, "falling back to universal question pool");
        let definitions = self
            .store
            .list_questions(&self.flow.universal_category, Some(intent))?;
        Ok((definitions, None))
    }

    /// Coarse service-vs-installation intent from the requested subcategory.
    fn intent_label(&self, subcategory: Option<&str>) -> &'static str {
        if let Some(sub) = subcategory {
            let lower = sub.to_lowercase();
            if self
                .flow
                .installation_keywords
                .iter()
                .any(|k| lower.contains(k.as_str()))
            {
                return "installation";
            }
        }
        "service"
    }
}

/// Common selection within the winning tier: drop answered (by identity),
/// filter by precondition, required first, then display order.
fn select_next<'q>(
    definitions: &'q [QuestionDefinition],
    answers: &AnswerSheet,
) -> Option<&'q QuestionDefinition> {
    let mut candidates: Vec<&QuestionDefinition> = definitions
        .iter()
        .filter(|d| !answers.is_answered(&d.id))
        .filter(|d| precondition::applies(d.precondition.as_deref(), answers))
        .collect();

    candidates.sort_by(|a, b| {
        b.required_for_completion
            .cmp(&a.required_for_completion)
            .then(a.display_order.cmp(&b.display_order))
            .then(a.id.cmp(&b.id))
    });

    candidates.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimo_core::answer::Answer;
    use estimo_core::history::HistoricalJob;
    use estimo_core::question::ResponseKind;
    use estimo_core::rate::RateTableEntry;
    use estimo_storage::error::Result as StoreResult;
    use pretty_assertions::assert_eq;

    /// Fixture store over plain vectors.
    struct StaticStore {
        questions: Vec<QuestionDefinition>,
    }

    impl CatalogStore for StaticStore {
        fn list_questions(
            &self,
            category: &str,
            subcategory: Option<&str>,
        ) -> StoreResult<Vec<QuestionDefinition>> {
            let mut out: Vec<QuestionDefinition> = self
                .questions
                .iter()
                .filter(|q| q.category == category)
                .filter(|q| match subcategory {
                    Some(sub) => {
                        q.subcategory.is_none() || q.subcategory.as_deref() == Some(sub)
                    }
                    None => q.subcategory.is_none(),
                })
                .cloned()
                .collect();
            out.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));
            Ok(out)
        }

        fn list_all_questions(&self, category: &str) -> StoreResult<Vec<QuestionDefinition>> {
            Ok(self
                .questions
                .iter()
                .filter(|q| q.category == category)
                .cloned()
                .collect())
        }

        fn list_rates(
            &self,
            _category: &str,
            _subcategory: Option<&str>,
        ) -> StoreResult<Vec<RateTableEntry>> {
            Ok(vec![])
        }

        fn find_relevant_jobs(
            &self,
            _category: &str,
            _free_text: &str,
            _limit: usize,
        ) -> StoreResult<Vec<HistoricalJob>> {
            Ok(vec![])
        }
    }

    fn question(
        id: &str,
        category: &str,
        sub: Option<&str>,
        order: i32,
        required: bool,
        precondition: Option<&str>,
    ) -> QuestionDefinition {
        QuestionDefinition {
            id: id.into(),
            category: category.into(),
            subcategory: sub.map(Into::into),
            text: format!("Question {id}?"),
            response_kind: ResponseKind::FreeText,
            choices: vec![],
            required_for_completion: required,
            precondition: precondition.map(Into::into),
            display_order: order,
        }
    }

    fn hvac_store() -> StaticStore {
        StaticStore {
            questions: vec![
                question("q-sym", "hvac", Some("furnace repair"), 0, true, None),
                question("q-age", "hvac", Some("furnace repair"), 1, true, None),
                question(
                    "q-gas",
                    "hvac",
                    Some("furnace repair"),
                    2,
                    false,
                    Some("if answer_contains('gas')"),
                ),
                question("q-brand", "hvac", None, 3, false, None),
                question("q-ac", "hvac", Some("air conditioner repair"), 0, true, None),
                question("q-gen", "hvac", Some("general"), 0, false, None),
                question("q-uni-svc", "any", Some("service"), 0, false, None),
                question("q-uni-inst", "any", Some("installation"), 0, false, None),
            ],
        }
    }

    fn answered(pairs: &[(&str, &str)]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (id, value) in pairs {
            sheet.record(*id, format!("{id}?"), Answer::new(*value));
        }
        sheet
    }

    #[test]
    fn exact_tier_orders_required_first_by_display_order() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        let next = resolver
            .next_question("hvac", Some("furnace repair"), &AnswerSheet::new())
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-sym");
        assert!(next.resolved_subcategory.is_none());
    }

    #[test]
    fn answered_questions_are_skipped_by_identity() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        let answers = answered(&[("q-sym", "no heat at all")]);
        let next = resolver
            .next_question("hvac", Some("furnace repair"), &answers)
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-age");
    }

    #[test]
    fn precondition_gates_until_triggered() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        // Both required questions answered; gas question not triggered yet.
        let answers = answered(&[("q-sym", "no heat"), ("q-age", "12 years")]);
        let next = resolver
            .next_question("hvac", Some("furnace repair"), &answers)
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-brand");

        // A gas-mentioning answer unlocks q-gas, which outranks q-brand by
        // display order.
        let answers = answered(&[("q-sym", "gas smell, no heat"), ("q-age", "12 years")]);
        let next = resolver
            .next_question("hvac", Some("furnace repair"), &answers)
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-gas");
    }

    #[test]
    fn interview_terminates_within_tier_size() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        let mut answers = AnswerSheet::new();
        let tier_size = 4; // furnace repair tier: q-sym, q-age, q-gas, q-brand
        let mut asked = 0;
        while let Some(resolution) = resolver
            .next_question("hvac", Some("furnace repair"), &answers)
            .unwrap()
        {
            asked += 1;
            assert!(asked <= tier_size, "resolver failed to terminate");
            answers.record(resolution.question.id.clone(), resolution.question.text, Answer::new("gas everywhere"));
        }
        assert!(asked <= tier_size);
    }

    #[test]
    fn fuzzy_tier_resolves_and_signals_subcategory() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        // "furnace tune" has no definitions; fuzzy lands on "furnace repair".
        let next = resolver
            .next_question("hvac", Some("furnace tune"), &AnswerSheet::new())
            .unwrap()
            .unwrap();
        assert_eq!(next.resolved_subcategory.as_deref(), Some("furnace repair"));
        assert_eq!(next.question.id, "q-sym");
    }

    #[test]
    fn heating_request_never_fuzzy_matches_cooling_tier() {
        let store = StaticStore {
            questions: vec![
                question("q-ac", "hvac", Some("air conditioner repair service"), 0, true, None),
                question("q-gen", "hvac", Some("general"), 0, false, None),
            ],
        };
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        // Despite heavy generic overlap, polarity conflict vetoes the cooling
        // candidate and the generic tier answers instead.
        let next = resolver
            .next_question("hvac", Some("heater repair service"), &AnswerSheet::new())
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-gen");
        assert!(next.resolved_subcategory.is_none());
    }

    #[test]
    fn generic_tier_falls_back_to_universal_pool_by_intent() {
        let store = StaticStore {
            questions: vec![
                question("q-uni-svc", "any", Some("service"), 0, false, None),
                question("q-uni-inst", "any", Some("installation"), 0, false, None),
            ],
        };
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        let next = resolver
            .next_question("appliances", Some("dishwasher installation"), &AnswerSheet::new())
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-uni-inst");

        let next = resolver
            .next_question("appliances", Some("dishwasher leaking"), &AnswerSheet::new())
            .unwrap()
            .unwrap();
        assert_eq!(next.question.id, "q-uni-svc");
    }

    #[test]
    fn completion_needs_every_required_and_the_two_answer_floor() {
        let store = hvac_store();
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        // Nothing answered.
        assert!(!resolver
            .is_completion_satisfied("hvac", Some("furnace repair"), &AnswerSheet::new())
            .unwrap());

        // One of two required answered.
        let answers = answered(&[("q-sym", "no heat")]);
        assert!(!resolver
            .is_completion_satisfied("hvac", Some("furnace repair"), &answers)
            .unwrap());

        // Both required answered.
        let answers = answered(&[("q-sym", "no heat"), ("q-age", "12 years")]);
        assert!(resolver
            .is_completion_satisfied("hvac", Some("furnace repair"), &answers)
            .unwrap());
    }

    #[test]
    fn single_required_question_cannot_satisfy_completion() {
        let store = StaticStore {
            questions: vec![question("q-only", "cleaning", Some("move out"), 0, true, None)],
        };
        let flow = FlowConfig::default();
        let resolver = Resolver::new(&store, &flow);

        // The lone required question is answered and none are pending, but
        // the >=2 floor keeps completion unsatisfied.
        let answers = answered(&[("q-only", "3 bedrooms")]);
        assert!(!resolver
            .is_completion_satisfied("cleaning", Some("move out"), &answers)
            .unwrap());
    }
}
