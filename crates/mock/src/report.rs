//! Scenario transcripts.
//!
//! Renders observed invocations as a numbered list, one line per
//! call, with the invocation-time arguments, the outcome, and the
//! call site. Assertion failures append this transcript so a failing
//! test shows what actually happened.

use attest_core::{Config, ValueFormatter};

use crate::invocation::{InvocationOutcome, ObservedInvocation};

/// Renders the full transcript with the configured formatter caps.
pub fn scenario_report(observed: &[ObservedInvocation]) -> String {
    let formatter = ValueFormatter::from_config(&Config::global().report);
    render_invocations(observed.iter(), &formatter)
}

/// Renders a numbered transcript of the given invocations.
pub fn render_invocations<'a>(
    invocations: impl Iterator<Item = &'a ObservedInvocation>,
    formatter: &ValueFormatter,
) -> String {
    let mut out = String::new();
    for (index, observed) in invocations.enumerate() {
        out.push_str(&format!(
            "{}. {}\n",
            index + 1,
            render_line(observed, formatter)
        ));
    }
    if out.is_empty() {
        out.push_str("<none>\n");
    }
    out
}

fn render_line(observed: &ObservedInvocation, formatter: &ValueFormatter) -> String {
    let invocation = observed.invocation();
    let args: Vec<String> = invocation
        .arguments()
        .iter()
        .map(|a| formatter.format(a.value_at_invocation()))
        .collect();
    let outcome = match observed.outcome() {
        Some(InvocationOutcome::Returned(value)) => formatter.format(value),
        Some(InvocationOutcome::DefaultReturned) => "null (default)".to_string(),
        Some(InvocationOutcome::Raised(message)) => format!("raised \"{}\"", message),
        Some(InvocationOutcome::ChainedMock(name)) => format!("chained mock {}", name),
        None => "<pending>".to_string(),
    };
    format!(
        "{}.{}({}) -> {} (at {})",
        invocation.mock_name(),
        invocation.method(),
        args.join(", "),
        outcome,
        invocation.call_site()
    )
}
