//! Model Evaluator
//!
//! `y = β0 + β1·x1 + β2·x2` over fixed coefficients. Pure and total.

use std::fmt;

use serde::Serialize;

use super::input::PredictionInput;

/// Coefficients of the linear model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub param1: f64,
    pub param2: f64,
}

/// The one model this system evaluates.
pub const COEFFICIENTS: Coefficients = Coefficients {
    intercept: 10.0,
    param1: 0.5,
    param2: 1.2,
};

impl Coefficients {
    /// Formula description handed to the explanation gateway.
    pub fn formula(&self) -> String {
        format!(
            "y = {} + {} * x1 + {} * x2",
            self.intercept, self.param1, self.param2
        )
    }

    /// Formula as displayed next to the explanation.
    pub fn display_formula(&self) -> String {
        format!(
            "y = {} + {}x\u{2081} + {}x\u{2082}",
            self.intercept, self.param1, self.param2
        )
    }
}

/// Output of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub value: f64,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

/// Evaluate the model. Validated input bounds keep the result finite.
pub fn evaluate(input: PredictionInput) -> PredictionResult {
    let c = COEFFICIENTS;
    PredictionResult {
        value: c.intercept + c.param1 * input.param1() + c.param2 * input.param2(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn eval(x1: f64, x2: f64) -> f64 {
        evaluate(PredictionInput::new(x1, x2).unwrap()).value
    }

    #[test]
    fn test_known_points() {
        assert!((eval(0.0, 0.0) - 10.0).abs() < TOLERANCE);
        assert!((eval(10.0, 10.0) - 27.0).abs() < TOLERANCE);
        assert!((eval(4.0, 5.0) - 18.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(eval(3.25, 7.5), eval(3.25, 7.5));
    }

    #[test]
    fn test_largest_input_stays_finite() {
        let value = eval(crate::model::MAX_INPUT, crate::model::MAX_INPUT);
        assert!(value.is_finite());
    }

    #[test]
    fn test_formula_strings() {
        assert_eq!(COEFFICIENTS.formula(), "y = 10 + 0.5 * x1 + 1.2 * x2");
        assert_eq!(COEFFICIENTS.display_formula(), "y = 10 + 0.5x₁ + 1.2x₂");
    }

    #[test]
    fn test_result_display_two_decimals() {
        let result = PredictionResult { value: 18.0 };
        assert_eq!(result.to_string(), "18.00");

        let result = PredictionResult { value: 12.346 };
        assert_eq!(result.to_string(), "12.35");
    }
}
