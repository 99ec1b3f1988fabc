use sweep_domain::{IssueRef, Transition};

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Maps an operator-supplied action name to one of an issue's transitions.
pub struct TransitionResolver;

impl TransitionResolver {
    /// Find the transition named `name` among those `issue` offers.
    ///
    /// Case-insensitive, whole-name match only. Should two offered names
    /// differ only by case, the one spelled exactly like `name` wins,
    /// otherwise the first in tracker order.
    pub fn resolve<'a>(issue: &'a IssueRef, name: &str) -> Option<&'a Transition> {
        issue
            .transitions
            .iter()
            .find(|t| t.name == name)
            .or_else(|| issue.transitions.iter().find(|t| eq_ignore_case(&t.name, name)))
    }
}
