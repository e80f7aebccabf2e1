use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single selectable item offered by the dropdown.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    /// Stable identifier (service name, role name, `user.<short>` ...).
    pub id: String,
    /// Text written into the input when the choice is picked.
    pub label: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// A choice whose label equals its id, as used for services, roles and domains.
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            label: name,
        }
    }

    /// A user account rendered as `Full Name [user.short]`.
    pub fn user(short_name: &str, full_name: &str) -> Self {
        let id = format!("user.{short_name}");
        let label = format!("{full_name} [{id}]");
        Self { id, label }
    }
}

/// Ordered collection of choices, unique by id.
///
/// Inserting a choice whose id is already present replaces it in place so the
/// original ordering is kept. Serialized as a plain list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Choice>", into = "Vec<Choice>")]
pub struct CandidateSet {
    entries: IndexMap<String, Choice>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, choice: Choice) {
        self.entries.insert(choice.id.clone(), choice);
    }

    pub fn get(&self, id: &str) -> Option<&Choice> {
        self.entries.get(id)
    }

    /// True when a choice with the same id and label is part of the set.
    pub fn contains(&self, choice: &Choice) -> bool {
        self.entries.get(&choice.id).is_some_and(|existing| existing == choice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.entries.values()
    }

    pub fn to_vec(&self) -> Vec<Choice> {
        self.entries.values().cloned().collect()
    }
}

impl FromIterator<Choice> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Choice>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for choice in iter {
            set.insert(choice);
        }
        set
    }
}

impl From<Vec<Choice>> for CandidateSet {
    fn from(choices: Vec<Choice>) -> Self {
        choices.into_iter().collect()
    }
}

impl From<CandidateSet> for Vec<Choice> {
    fn from(set: CandidateSet) -> Self {
        set.entries.into_values().collect()
    }
}
