//! Question precondition grammar and evaluation.
//!
//! Grammar: `if <atom> [OR|AND <atom>]*`, where an atom is either
//! `answer_contains('text')` or the legacy `field = 'value'` form. Both have
//! the same semantics: case-insensitive substring match over every recorded
//! answer value.
//!
//! Mixed AND/OR chains evaluate strictly LEFT TO RIGHT with no operator
//! precedence: `a OR b AND c` is `(a OR b) AND c`. Curated preconditions in
//! the field rely on this, so it is preserved rather than "fixed" to
//! conventional precedence.
//!
//! Anything unparsable fails closed: the question is treated as inapplicable.

use tracing::warn;

use estimo_core::answer::AnswerSheet;

/// Connective between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// One substring test over the recorded answers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Atom {
    needle: String,
}

impl Atom {
    fn matches(&self, answers: &AnswerSheet) -> bool {
        answers.any_value_contains(&self.needle)
    }
}

/// A parsed precondition: the first atom plus connective-joined follow-ons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    first: Atom,
    rest: Vec<(Connective, Atom)>,
}

impl Precondition {
    /// Parses a precondition string. `None` means unparsable -- callers must
    /// treat the question as inapplicable (fail closed).
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        // The grammar requires the leading `if`.
        let lower = trimmed.to_lowercase();
        let body = lower.strip_prefix("if")?;
        if !body.starts_with(char::is_whitespace) {
            return None;
        }

        let (segments, connectives) = split_on_connectives(body);
        if segments.len() != connectives.len() + 1 {
            return None;
        }

        let mut atoms = Vec::with_capacity(segments.len());
        for segment in &segments {
            atoms.push(parse_atom(segment)?);
        }

        let mut atoms = atoms.into_iter();
        let first = atoms.next()?;
        let rest = connectives.into_iter().zip(atoms).collect();
        Some(Self { first, rest })
    }

    /// Evaluates left-to-right with no precedence.
    pub fn evaluate(&self, answers: &AnswerSheet) -> bool {
        let mut acc = self.first.matches(answers);
        for (connective, atom) in &self.rest {
            let value = atom.matches(answers);
            acc = match connective {
                Connective::And => acc && value,
                Connective::Or => acc || value,
            };
        }
        acc
    }
}

/// Whether a definition with this (optional) precondition applies right now.
///
/// No precondition applies unconditionally. An unparsable precondition never
/// applies, and is logged once per evaluation.
pub fn applies(precondition: Option<&str>, answers: &AnswerSheet) -> bool {
    match precondition {
        None => true,
        Some(raw) => match Precondition::parse(raw) {
            Some(parsed) => parsed.evaluate(answers),
            None => {
                warn!(precondition = raw, "unparsable precondition treated as inapplicable");
                false
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Splits the (already lowercased) body on `and` / `or` words outside quotes.
fn split_on_connectives(body: &str) -> (Vec<String>, Vec<Connective>) {
    let bytes = body.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut connectives = Vec::new();
    let mut seg_start = 0;
    let mut in_quote = false;
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == b'\'' {
            in_quote = !in_quote;
            i += 1;
            continue;
        }
        if !in_quote {
            if let Some((connective, word_len)) = connective_at(body, i) {
                segments.push(body[seg_start..i].to_owned());
                connectives.push(connective);
                i += word_len;
                seg_start = i;
                continue;
            }
        }
        i += 1;
    }
    segments.push(body[seg_start..].to_owned());

    (segments, connectives)
}

/// Recognizes a whitespace-bounded `and` / `or` starting at byte `i`.
fn connective_at(body: &str, i: usize) -> Option<(Connective, usize)> {
    let bytes = body.as_bytes();
    let boundary_before = i == 0 || bytes[i - 1].is_ascii_whitespace();
    if !boundary_before {
        return None;
    }
    for (word, connective) in [("and", Connective::And), ("or", Connective::Or)] {
        if body[i..].starts_with(word) {
            let end = i + word.len();
            if end == body.len() || bytes[end].is_ascii_whitespace() {
                return Some((connective, word.len()));
            }
        }
    }
    None
}

/// Parses one atom. Both forms reduce to a quoted needle.
fn parse_atom(segment: &str) -> Option<Atom> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    if let Some(rest) = segment.strip_prefix("answer_contains") {
        let rest = rest.trim();
        let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
        return quoted(inner).map(|needle| Atom { needle });
    }

    // Legacy `field = 'value'`: the field name is documentation only; the
    // semantics are the same substring test over every answer.
    if let Some(eq) = segment.find('=') {
        let field = segment[..eq].trim();
        let value = segment[eq + 1..].trim();
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        return quoted(value).map(|needle| Atom { needle });
    }

    None
}

/// Extracts the contents of a single-quoted literal; empty needles are
/// unparsable (they would match everything).
fn quoted(text: &str) -> Option<String> {
    let text = text.trim();
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.is_empty() || inner.contains('\'') {
        return None;
    }
    Some(inner.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimo_core::answer::Answer;
    use pretty_assertions::assert_eq;

    fn sheet(values: &[&str]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (i, value) in values.iter().enumerate() {
            sheet.record(format!("q-{i}"), format!("Question {i}?"), Answer::new(*value));
        }
        sheet
    }

    // -- parsing -------------------------------------------------------------

    #[test]
    fn parses_answer_contains() {
        let p = Precondition::parse("if answer_contains('leak')").unwrap();
        assert!(p.evaluate(&sheet(&["there is a Leak under the sink"])));
        assert!(!p.evaluate(&sheet(&["no water anywhere"])));
    }

    #[test]
    fn parses_legacy_field_form() {
        let p = Precondition::parse("if location = 'basement'").unwrap();
        // The field name is ignored; any value matching counts.
        assert!(p.evaluate(&sheet(&["it's in the BASEMENT"])));
        assert!(!p.evaluate(&sheet(&["attic"])));
    }

    #[test]
    fn quoted_connective_words_do_not_split() {
        let p = Precondition::parse("if answer_contains('washer and dryer')").unwrap();
        assert!(p.evaluate(&sheet(&["stacked washer and dryer in closet"])));
        assert!(!p.evaluate(&sheet(&["washer only"])));
    }

    // -- left-to-right evaluation (no precedence) ---------------------------

    #[test]
    fn mixed_connectives_fold_left_to_right() {
        // a OR b AND c == (a OR b) AND c, not a OR (b AND c).
        let p = Precondition::parse(
            "if answer_contains('a1') or answer_contains('b2') and answer_contains('c3')",
        )
        .unwrap();

        // a true, c false: standard precedence would give true; left-to-right
        // gives (true OR false) AND false = false.
        assert!(!p.evaluate(&sheet(&["a1 only"])));
        // a true, c true.
        assert!(p.evaluate(&sheet(&["a1 and c3 present"])));
        // b true, c true.
        assert!(p.evaluate(&sheet(&["b2", "c3"])));
    }

    #[test]
    fn and_chain_requires_all() {
        let p = Precondition::parse(
            "if answer_contains('gas') and answer_contains('furnace')",
        )
        .unwrap();
        assert!(p.evaluate(&sheet(&["gas furnace, 15 years old"])));
        assert!(!p.evaluate(&sheet(&["electric furnace"])));
    }

    // -- fail closed ---------------------------------------------------------

    #[test]
    fn unparsable_preconditions_never_apply() {
        let answers = sheet(&["anything at all"]);
        for raw in [
            "",
            "answer_contains('no if prefix')",
            "if",
            "if answer_contains(unquoted)",
            "if answer_contains('')",
            "if = 'no field'",
            "if gibberish",
            "if answer_contains('x') xor answer_contains('y')",
            "if answer_contains('unterminated",
        ] {
            assert!(!applies(Some(raw), &answers), "should fail closed: {raw:?}");
        }
    }

    #[test]
    fn absent_precondition_always_applies() {
        assert!(applies(None, &sheet(&[])));
    }
}
