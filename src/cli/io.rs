//! Shell I/O: intent parsing and session rendering
//!
//! - Input: one intent per line
//! - Output: plain text blocks on any writer (stdout in the binary)

use std::io::{self, Write};

use crate::coordinator::{PredictionState, Session};
use crate::explanation::ExplanationState;
use crate::model::{RawPredictionInput, ValidationError, COEFFICIENTS};

use super::errors::CliResult;

/// A user intent read from one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Predict(RawPredictionInput),
    Expand,
    Retry,
    State,
    Metrics,
    Help,
    Quit,
}

pub const HELP: &str = "\
intents:
  predict <x1> <x2>   compute a prediction
  expand              show the formula explanation
  retry               retry a failed explanation (if enabled)
  state               print the current session
  metrics             print session counters
  help                this text
  quit                wait for pending work and exit";

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let intent = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("predict", [x1, x2]) => Intent::Predict(RawPredictionInput::new(*x1, *x2)),
        ("predict", _) => return Err("usage: predict <x1> <x2>".to_string()),
        ("expand" | "explain", []) => Intent::Expand,
        ("retry", []) => Intent::Retry,
        ("state", []) => Intent::State,
        ("metrics", []) => Intent::Metrics,
        ("help" | "?", []) => Intent::Help,
        ("quit" | "exit", []) => Intent::Quit,
        (other, _) => return Err(format!("unknown intent '{}', try 'help'", other)),
    };

    Ok(Some(intent))
}

/// Render the whole session as the shell shows it.
pub fn render_session(session: &Session) -> String {
    let prediction = match session.prediction() {
        PredictionState::Idle => "Predicted Output (y): -".to_string(),
        PredictionState::Predicting => "Calculating...".to_string(),
        PredictionState::Ready(result) => format!("Predicted Output (y): {}", result),
    };

    let explanation = match session.explanation() {
        ExplanationState::NotRequested => "(collapsed, type 'expand')".to_string(),
        ExplanationState::Loading => "Loading...".to_string(),
        ExplanationState::Loaded(text) => text.clone(),
        ExplanationState::Failed(notice) => format!("Error: {}", notice),
    };

    format!(
        "{}\nFormula: {}\nExplanation: {}",
        prediction,
        COEFFICIENTS.display_formula(),
        explanation
    )
}

/// Render per-field validation messages, one per line.
pub fn render_validation_error(err: &ValidationError) -> String {
    err.fields()
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write a block of text followed by a newline
pub fn write_block<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

/// Write a block of text to stdout
pub fn print_block(text: &str) -> CliResult<()> {
    write_block(&mut io::stdout().lock(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        assert_eq!(
            parse_intent("predict 4 5").unwrap(),
            Some(Intent::Predict(RawPredictionInput::new("4", "5")))
        );
    }

    #[test]
    fn test_parse_predict_passes_raw_text() {
        assert_eq!(
            parse_intent("  PREDICT -1 x ").unwrap(),
            Some(Intent::Predict(RawPredictionInput::new("-1", "x")))
        );
    }

    #[test]
    fn test_parse_predict_arity() {
        assert!(parse_intent("predict 4").is_err());
        assert!(parse_intent("predict 1 2 3").is_err());
    }

    #[test]
    fn test_parse_simple_intents() {
        assert_eq!(parse_intent("expand").unwrap(), Some(Intent::Expand));
        assert_eq!(parse_intent("retry").unwrap(), Some(Intent::Retry));
        assert_eq!(parse_intent("state").unwrap(), Some(Intent::State));
        assert_eq!(parse_intent("metrics").unwrap(), Some(Intent::Metrics));
        assert_eq!(parse_intent("?").unwrap(), Some(Intent::Help));
        assert_eq!(parse_intent("exit").unwrap(), Some(Intent::Quit));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse_intent("   ").unwrap(), None);
        assert!(parse_intent("dance").unwrap_err().contains("dance"));
    }

    #[test]
    fn test_render_fresh_session() {
        let rendered = render_session(&Session::new());
        assert!(rendered.contains("Predicted Output (y): -"));
        assert!(rendered.contains("y = 10 + 0.5x₁ + 1.2x₂"));
        assert!(rendered.contains("collapsed"));
    }

    #[test]
    fn test_write_block_appends_newline() {
        let mut out = Vec::new();
        write_block(&mut out, "Calculating...").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Calculating...\n");
    }

    #[test]
    fn test_render_validation_error() {
        let err = RawPredictionInput::new("-1", "z").validate().unwrap_err();
        assert_eq!(
            render_validation_error(&err),
            "param1: Value must be non-negative\nparam2: Expected a number"
        );
    }
}
