use combobox_types::{CandidateSet, Choice, MatchPolicy};

/// Whether `label` is offered for the typed `text` under `policy`.
///
/// Empty text matches every label.
pub fn matches(label: &str, text: &str, policy: MatchPolicy) -> bool {
    match policy {
        MatchPolicy::SubstringCaseInsensitive => label.to_lowercase().contains(&text.to_lowercase()),
    }
}

/// The subset of `set` offered for `text`, in candidate order.
pub fn filter_candidates(set: &CandidateSet, text: &str, policy: MatchPolicy) -> Vec<Choice> {
    set.iter().filter(|choice| matches(&choice.label, text, policy)).cloned().collect()
}
