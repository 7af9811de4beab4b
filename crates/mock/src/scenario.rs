//! Scenario recording and verification.
//!
//! The [`Scenario`] is the append-only call history of a mock
//! context. Its own assertions are pure queries over that history,
//! so asking the same question twice gives the same answer.
//!
//! Consuming verification lives in the [`Verifier`]: it snapshots
//! the history at construction and marks invocations off as they are
//! verified, so one observed call can satisfy at most one assertion
//! and leftovers can be flagged with
//! [`Verifier::assert_no_more_invocations`].

use attest_core::{AttestError, AttestResult, Config, ValueFormatter};
use uuid::Uuid;

use crate::invocation::{InvocationOutcome, MatchingInvocation, ObservedInvocation};
use crate::report;

/// Append-only call history of one mock context.
pub struct Scenario {
    id: Uuid,
    observed: Vec<ObservedInvocation>,
}

impl Scenario {
    /// Creates an empty scenario.
    pub fn new() -> Self {
        Scenario {
            id: Uuid::new_v4(),
            observed: Vec::new(),
        }
    }

    /// Identifier of this scenario, distinct per context.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Appends an observed call and returns its index, so the
    /// outcome can be filled in after the behavior has run.
    pub fn record(&mut self, invocation: ObservedInvocation) -> usize {
        self.observed.push(invocation);
        self.observed.len() - 1
    }

    /// Sets the outcome of a recorded call.
    pub fn set_outcome(&mut self, index: usize, outcome: InvocationOutcome) {
        if let Some(observed) = self.observed.get_mut(index) {
            observed.set_outcome(outcome);
        }
    }

    /// All observed calls in invocation order.
    pub fn observed(&self) -> &[ObservedInvocation] {
        &self.observed
    }

    /// Number of observed calls matching the pattern.
    pub fn count_matching(&self, matching: &MatchingInvocation) -> usize {
        self.observed
            .iter()
            .filter(|o| matching.matches(o.invocation()))
            .count()
    }

    /// First observed call matching the pattern.
    pub fn find_matching(&self, matching: &MatchingInvocation) -> Option<&ObservedInvocation> {
        self.observed
            .iter()
            .find(|o| matching.matches(o.invocation()))
    }

    /// Asserts that at least one matching call was observed. Fires
    /// the capture hooks of the pattern against the first match.
    pub fn assert_invoked(&self, matching: &MatchingInvocation) -> AttestResult<()> {
        match self.find_matching(matching) {
            Some(observed) => {
                matching.fire_matched(observed.invocation());
                Ok(())
            }
            None => Err(AttestError::assertion(format!(
                "Expected invocation of {}, but it didn't occur.\n\nObserved scenario:\n{}",
                matching.description(),
                self.report()
            ))),
        }
    }

    /// Asserts that exactly `times` matching calls were observed.
    /// Fires the capture hooks against every match on success.
    pub fn assert_invoked_times(
        &self,
        matching: &MatchingInvocation,
        times: usize,
    ) -> AttestResult<()> {
        let count = self.count_matching(matching);
        if count == times {
            for observed in self
                .observed
                .iter()
                .filter(|o| matching.matches(o.invocation()))
            {
                matching.fire_matched(observed.invocation());
            }
            return Ok(());
        }
        let qualifier = if count < times { "found only" } else { "found" };
        Err(AttestError::assertion(format!(
            "Expected {} invocation(s) of {}, but {} {}.\n\nObserved scenario:\n{}",
            times,
            matching.description(),
            qualifier,
            count,
            self.report()
        )))
    }

    /// Asserts that no matching call was observed.
    pub fn assert_not_invoked(&self, matching: &MatchingInvocation) -> AttestResult<()> {
        match self.find_matching(matching) {
            None => Ok(()),
            Some(observed) => Err(AttestError::assertion(format!(
                "Expected no invocation of {}, but it did occur at {}.\n\nObserved scenario:\n{}",
                matching.description(),
                observed.invocation().call_site(),
                self.report()
            ))),
        }
    }

    /// Clears the history. The scenario keeps its identifier.
    pub fn reset(&mut self) {
        self.observed.clear();
    }

    /// Numbered transcript of all observed calls.
    pub fn report(&self) -> String {
        report::scenario_report(&self.observed)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::new()
    }
}

/// Verification state of one snapshotted invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unverified,
    Verified,
    VerifiedInSequence,
}

/// Consuming verifier over a scenario snapshot.
///
/// Each successful assertion marks one invocation off, so repeated
/// assertions need repeated calls. Later recording on the live
/// scenario does not affect an existing verifier.
pub struct Verifier {
    observed: Vec<ObservedInvocation>,
    marks: Vec<Mark>,
}

impl Verifier {
    /// Snapshots the scenario for verification.
    pub fn new(scenario: &Scenario) -> Self {
        let observed = scenario.observed().to_vec();
        let marks = vec![Mark::Unverified; observed.len()];
        Verifier { observed, marks }
    }

    /// Verifies one matching invocation, consuming it. Fires the
    /// capture hooks of the pattern against the consumed call.
    pub fn assert_invoked(&mut self, matching: &MatchingInvocation) -> AttestResult<()> {
        match self.find_unverified(matching) {
            Some(index) => {
                self.marks[index] = Mark::Verified;
                matching.fire_matched(self.observed[index].invocation());
                Ok(())
            }
            None => Err(self.missing(matching)),
        }
    }

    /// Verifies one matching invocation and additionally checks that
    /// it happened after every invocation already verified in
    /// sequence.
    pub fn assert_invoked_in_sequence(
        &mut self,
        matching: &MatchingInvocation,
    ) -> AttestResult<()> {
        let index = match self.find_unverified(matching) {
            Some(index) => index,
            None => return Err(self.missing(matching)),
        };
        let out_of_order =
            (index + 1..self.marks.len()).find(|&i| self.marks[i] == Mark::VerifiedInSequence);
        if let Some(later) = out_of_order {
            return Err(AttestError::assertion(format!(
                "Expected invocation of {} after the previously verified invocations, \
                 but the match at {} occurred before the invocation verified at {}.\n\n\
                 Observed scenario:\n{}",
                matching.description(),
                self.observed[index].invocation().call_site(),
                self.observed[later].invocation().call_site(),
                report::scenario_report(&self.observed)
            )));
        }
        self.marks[index] = Mark::VerifiedInSequence;
        matching.fire_matched(self.observed[index].invocation());
        Ok(())
    }

    /// Asserts that every observed invocation has been verified.
    pub fn assert_no_more_invocations(&self) -> AttestResult<()> {
        let unverified: Vec<&ObservedInvocation> = self
            .observed
            .iter()
            .zip(&self.marks)
            .filter(|(_, mark)| **mark == Mark::Unverified)
            .map(|(observed, _)| observed)
            .collect();
        if unverified.is_empty() {
            return Ok(());
        }
        let formatter = ValueFormatter::from_config(&Config::global().report);
        Err(AttestError::assertion(format!(
            "No more invocations expected, yet observed the following calls:\n{}",
            report::render_invocations(unverified.into_iter(), &formatter)
        )))
    }

    fn find_unverified(&self, matching: &MatchingInvocation) -> Option<usize> {
        self.observed
            .iter()
            .zip(&self.marks)
            .position(|(observed, mark)| {
                *mark == Mark::Unverified && matching.matches(observed.invocation())
            })
    }

    fn missing(&self, matching: &MatchingInvocation) -> AttestError {
        AttestError::assertion(format!(
            "Expected invocation of {}, but it didn't occur.\n\nObserved scenario:\n{}",
            matching.description(),
            report::scenario_report(&self.observed)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{capture, eq, Capture, MatcherSpec};
    use crate::proxy::{Argument, CallSite, ProxyInvocation};
    use attest_core::Value;

    fn observed(method: &str, args: Vec<Value>) -> ObservedInvocation {
        ObservedInvocation::new(
            ProxyInvocation::new(
                "service",
                method,
                args.into_iter().map(Argument::new).collect(),
                CallSite::capture(),
            ),
            None,
        )
    }

    fn pattern(method: &str, matchers: Vec<MatcherSpec>) -> MatchingInvocation {
        MatchingInvocation::new(
            "service",
            method,
            matchers.into_iter().map(|m| m.into_inner()).collect(),
        )
    }

    fn scenario_with(calls: Vec<ObservedInvocation>) -> Scenario {
        let mut scenario = Scenario::new();
        for call in calls {
            scenario.record(call);
        }
        scenario
    }

    // ==== Scenario ====

    #[test]
    fn record_and_outcome_round_trip() {
        let mut scenario = Scenario::new();
        let index = scenario.record(observed("find", vec![Value::from(1)]));
        scenario.set_outcome(index, InvocationOutcome::Returned(Value::from(2)));

        assert_eq!(scenario.observed().len(), 1);
        assert_eq!(
            scenario.observed()[0].outcome(),
            Some(&InvocationOutcome::Returned(Value::from(2)))
        );
    }

    #[test]
    fn counting_and_finding_are_pure_queries() {
        let scenario = scenario_with(vec![
            observed("find", vec![Value::from(1)]),
            observed("find", vec![Value::from(2)]),
            observed("find", vec![Value::from(1)]),
        ]);
        let ones = pattern("find", vec![eq(1)]);

        assert_eq!(scenario.count_matching(&ones), 2);
        assert_eq!(scenario.count_matching(&ones), 2);
        assert!(scenario.find_matching(&ones).is_some());
    }

    #[test]
    fn assert_invoked_passes_and_repeats() {
        let scenario = scenario_with(vec![observed("find", vec![Value::from(1)])]);
        let p = pattern("find", vec![eq(1)]);

        scenario.assert_invoked(&p).unwrap();
        // Pure query, the same call satisfies it again.
        scenario.assert_invoked(&p).unwrap();
    }

    #[test]
    fn assert_invoked_failure_carries_the_transcript() {
        let scenario = scenario_with(vec![observed("save", vec![Value::from(1)])]);
        let p = pattern("find", vec![eq(1)]);

        let message = scenario.assert_invoked(&p).unwrap_err().to_string();
        assert!(message.starts_with("Assertion failed."));
        assert!(message.contains("Expected invocation of service.find(eq(1)), but it didn't occur."));
        assert!(message.contains("Observed scenario:"));
        assert!(message.contains("1. service.save(1)"));
    }

    #[test]
    fn assert_invoked_times_requires_an_exact_count() {
        let scenario = scenario_with(vec![
            observed("find", vec![Value::from(1)]),
            observed("find", vec![Value::from(1)]),
        ]);
        let p = pattern("find", vec![eq(1)]);

        scenario.assert_invoked_times(&p, 2).unwrap();

        let fewer_than_expected = scenario.assert_invoked_times(&p, 3).unwrap_err().to_string();
        assert!(fewer_than_expected.contains("Expected 3 invocation(s)"));
        assert!(fewer_than_expected.contains("found only 2"));

        let more_than_expected = scenario.assert_invoked_times(&p, 1).unwrap_err().to_string();
        assert!(more_than_expected.contains("Expected 1 invocation(s)"));
        assert!(more_than_expected.contains("found 2"));
        assert!(!more_than_expected.contains("found only"));
    }

    #[test]
    fn assert_not_invoked_reports_the_call_site() {
        let scenario = scenario_with(vec![observed("find", vec![Value::from(1)])]);
        let p = pattern("find", vec![eq(1)]);

        let message = scenario.assert_not_invoked(&p).unwrap_err().to_string();
        assert!(message.contains("Expected no invocation of service.find(eq(1))"));
        assert!(message.contains("but it did occur at "));

        scenario
            .assert_not_invoked(&pattern("save", vec![eq(1)]))
            .unwrap();
    }

    #[test]
    fn assert_fires_captures() {
        let scenario = scenario_with(vec![observed("find", vec![Value::from(7)])]);
        let cap = Capture::new();
        let p = pattern("find", vec![capture(&cap)]);

        scenario.assert_invoked(&p).unwrap();
        assert_eq!(cap.value(), Some(Value::from(7)));
    }

    #[test]
    fn reset_clears_history_but_keeps_identity() {
        let mut scenario = scenario_with(vec![observed("find", vec![Value::from(1)])]);
        let id = scenario.id();

        scenario.reset();
        assert!(scenario.observed().is_empty());
        assert_eq!(scenario.id(), id);
    }

    // ==== Verifier ====

    #[test]
    fn verifier_consumes_one_call_per_assertion() {
        let scenario = scenario_with(vec![
            observed("find", vec![Value::from(1)]),
            observed("find", vec![Value::from(1)]),
        ]);
        let p = pattern("find", vec![eq(1)]);
        let mut verifier = Verifier::new(&scenario);

        verifier.assert_invoked(&p).unwrap();
        verifier.assert_invoked(&p).unwrap();
        let message = verifier.assert_invoked(&p).unwrap_err().to_string();
        assert!(message.contains("but it didn't occur"));
    }

    #[test]
    fn verifier_snapshot_ignores_later_recording() {
        let mut scenario = scenario_with(vec![observed("find", vec![Value::from(1)])]);
        let p = pattern("find", vec![eq(1)]);
        let mut verifier = Verifier::new(&scenario);

        scenario.record(observed("find", vec![Value::from(1)]));

        verifier.assert_invoked(&p).unwrap();
        assert!(verifier.assert_invoked(&p).is_err());
    }

    #[test]
    fn in_sequence_accepts_forward_order() {
        let scenario = scenario_with(vec![
            observed("first", vec![]),
            observed("second", vec![]),
        ]);
        let mut verifier = Verifier::new(&scenario);

        verifier
            .assert_invoked_in_sequence(&pattern("first", vec![]))
            .unwrap();
        verifier
            .assert_invoked_in_sequence(&pattern("second", vec![]))
            .unwrap();
    }

    #[test]
    fn in_sequence_rejects_backward_order() {
        let scenario = scenario_with(vec![
            observed("first", vec![]),
            observed("second", vec![]),
        ]);
        let mut verifier = Verifier::new(&scenario);

        verifier
            .assert_invoked_in_sequence(&pattern("second", vec![]))
            .unwrap();
        let message = verifier
            .assert_invoked_in_sequence(&pattern("first", vec![]))
            .unwrap_err()
            .to_string();
        assert!(message.contains("occurred before the invocation verified at"));
    }

    #[test]
    fn plain_verification_does_not_constrain_order() {
        let scenario = scenario_with(vec![
            observed("first", vec![]),
            observed("second", vec![]),
        ]);
        let mut verifier = Verifier::new(&scenario);

        verifier.assert_invoked(&pattern("second", vec![])).unwrap();
        verifier.assert_invoked(&pattern("first", vec![])).unwrap();
        verifier.assert_no_more_invocations().unwrap();
    }

    #[test]
    fn no_more_invocations_lists_the_unverified_calls() {
        let scenario = scenario_with(vec![
            observed("find", vec![Value::from(1)]),
            observed("save", vec![Value::from(2)]),
        ]);
        let mut verifier = Verifier::new(&scenario);
        verifier.assert_invoked(&pattern("find", vec![eq(1)])).unwrap();

        let message = verifier.assert_no_more_invocations().unwrap_err().to_string();
        assert!(message.contains("No more invocations expected"));
        assert!(message.contains("service.save(2)"));
        assert!(!message.contains("service.find(1)"));
    }
}
