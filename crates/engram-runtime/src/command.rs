//! User command grammar.
//!
//! Two literal, case-insensitive prefixes route around the LLM entirely:
//! `"remember that <fact>"` and
//! `"remember the steps for <name>: <step1>, <step2>, ..."`.
//! Everything else is a plain query.

use engram_types::error::{EngramError, EngramResult};

/// Prefix for learning a single fact.
const REMEMBER_FACT_PREFIX: &str = "remember that";
/// Prefix for learning a procedure.
const REMEMBER_PROCEDURE_PREFIX: &str = "remember the steps for";

/// A parsed user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Learn a single fact; the payload is the fact content.
    Remember(String),
    /// Learn a named procedure with ordered steps.
    RememberProcedure {
        /// Procedure name.
        name: String,
        /// Comma-delimited steps from the input, trimmed.
        steps: Vec<String>,
    },
    /// A plain query for the LLM.
    Query(String),
}

impl Command {
    /// Parse a user message into a command.
    ///
    /// The only parse failure is a procedure command missing its `:`
    /// separator; the error message is the user-facing usage hint.
    pub fn parse(input: &str) -> EngramResult<Self> {
        if let Some(rest) = strip_prefix_ignore_case(input, REMEMBER_PROCEDURE_PREFIX) {
            let (name, steps) = rest.split_once(':').ok_or_else(|| {
                EngramError::CommandParse(
                    "I couldn't parse the procedure. Please follow the format: \
                     'Remember the steps for [Procedure Name]: step1, step2, step3'"
                        .to_string(),
                )
            })?;
            let steps = steps.split(',').map(|s| s.trim().to_string()).collect();
            return Ok(Command::RememberProcedure {
                name: name.trim().to_string(),
                steps,
            });
        }

        if let Some(rest) = strip_prefix_ignore_case(input, REMEMBER_FACT_PREFIX) {
            return Ok(Command::Remember(rest.trim().to_string()));
        }

        Ok(Command::Query(input.to_string()))
    }
}

/// Case-insensitive ASCII prefix strip. Returns the remainder when `input`
/// starts with `prefix`.
fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remember_fact() {
        let cmd = Command::parse("remember that the sky is blue").unwrap();
        assert_eq!(cmd, Command::Remember("the sky is blue".to_string()));
    }

    #[test]
    fn test_parse_remember_fact_case_insensitive() {
        let cmd = Command::parse("Remember THAT tea has caffeine").unwrap();
        assert_eq!(cmd, Command::Remember("tea has caffeine".to_string()));
    }

    #[test]
    fn test_parse_remember_procedure() {
        let cmd =
            Command::parse("remember the steps for Brew Tea: boil water, steep, pour").unwrap();
        assert_eq!(
            cmd,
            Command::RememberProcedure {
                name: "Brew Tea".to_string(),
                steps: vec![
                    "boil water".to_string(),
                    "steep".to_string(),
                    "pour".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_parse_procedure_missing_colon() {
        let err = Command::parse("remember the steps for Brew Tea boil, steep").unwrap_err();
        assert!(matches!(err, EngramError::CommandParse(_)));
        assert!(err.to_string().contains("Remember the steps for"));
    }

    #[test]
    fn test_procedure_prefix_checked_before_fact_prefix() {
        // "remember the steps for" also starts with "remember t…" — the
        // longer prefix must win
        let cmd = Command::parse("remember the steps for X: a").unwrap();
        assert!(matches!(cmd, Command::RememberProcedure { .. }));
    }

    #[test]
    fn test_parse_plain_query() {
        let cmd = Command::parse("what do you know about tea?").unwrap();
        assert_eq!(cmd, Command::Query("what do you know about tea?".to_string()));
    }

    #[test]
    fn test_prefix_mid_sentence_is_a_query() {
        let cmd = Command::parse("please remember that I like tea").unwrap();
        assert!(matches!(cmd, Command::Query(_)));
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let cmd = Command::parse("héllo ☕").unwrap();
        assert!(matches!(cmd, Command::Query(_)));
    }
}
