//! Evaluates an [`Expectation`] against a [`ResponseSpec`].

use probe_domain::{AssertionFailure, BODY_SNIPPET_LIMIT, Check, Expectation, ResponseSpec};
use serde_json::{Map, Value};

use crate::error::ApplicationResult;
use crate::ports::Reporter;

/// Checks a response stage by stage and stops at the first failure.
///
/// Stages run in a fixed order: status, required keys, field values. A
/// SUCCESS entry is reported for each stage that passes; stages with nothing
/// declared are skipped. The body is decoded only after the status matches
/// and only if a later stage reads it. Failures are returned, never reported
/// here, so the caller emits exactly one FAILURE entry per case.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verifier;

impl Verifier {
    /// Create a new verifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run every stage of `expectation` against `response`.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssertionFailure`] encountered, or a decode error
    /// when a body stage needs JSON and the body is not valid JSON.
    pub fn verify(
        &self,
        response: &ResponseSpec,
        expectation: &Expectation,
        reporter: &mut dyn Reporter,
    ) -> ApplicationResult<()> {
        self.check_status(response, expectation.status)?;
        reporter.success(&format!("Status code: {}", response.status));

        if !expectation.inspects_body() {
            return Ok(());
        }

        let decoded = response.body.decode_json()?;
        let body = self.body_object(response, &decoded, expectation)?;

        if !expectation.required_keys.is_empty() {
            self.check_required_keys(body, expectation)?;
            reporter.success(&format!(
                "Response structure is valid: {}",
                join_keys(expectation.required_keys.iter())
            ));
        }

        if !expectation.field_equalities.is_empty() {
            self.check_field_values(body, expectation)?;
            reporter.success(&format!(
                "Field values match expected: {}",
                join_keys(expectation.field_equalities.keys())
            ));
        }

        Ok(())
    }

    fn check_status(&self, response: &ResponseSpec, expected: u16) -> Result<(), AssertionFailure> {
        let actual = response.status.as_u16();
        if actual == expected {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                Check::Status,
                expected.to_string(),
                actual.to_string(),
                format!("Expected status {expected}, got {}", response.status),
            ))
        }
    }

    fn body_object<'v>(
        &self,
        response: &ResponseSpec,
        decoded: &'v Value,
        expectation: &Expectation,
    ) -> Result<&'v Map<String, Value>, AssertionFailure> {
        let check = if expectation.required_keys.is_empty() {
            Check::FieldValues
        } else {
            Check::RequiredKeys
        };
        decoded.as_object().ok_or_else(|| {
            AssertionFailure::new(
                check,
                "JSON object",
                response.snippet(BODY_SNIPPET_LIMIT),
                "Response body is not a JSON object",
            )
        })
    }

    fn check_required_keys(
        &self,
        body: &Map<String, Value>,
        expectation: &Expectation,
    ) -> Result<(), AssertionFailure> {
        let missing: Vec<&String> = expectation
            .required_keys
            .iter()
            .filter(|key| !body.contains_key(key.as_str()))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(AssertionFailure::new(
            Check::RequiredKeys,
            join_keys(expectation.required_keys.iter()),
            join_keys(body.keys()),
            format!("Missing keys: {}", join_keys(missing.into_iter())),
        ))
    }

    fn check_field_values(
        &self,
        body: &Map<String, Value>,
        expectation: &Expectation,
    ) -> Result<(), AssertionFailure> {
        for (key, expected) in &expectation.field_equalities {
            match body.get(key) {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(AssertionFailure::new(
                        Check::FieldValues,
                        expected.to_string(),
                        actual.to_string(),
                        format!("Field '{key}' value mismatch"),
                    ));
                }
                None => {
                    return Err(AssertionFailure::new(
                        Check::FieldValues,
                        expected.to_string(),
                        "<missing>",
                        format!("Field '{key}' not found"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn join_keys<'k>(keys: impl Iterator<Item = &'k String>) -> String {
    keys.map(String::as_str).collect::<Vec<_>>().join(", ")
}
