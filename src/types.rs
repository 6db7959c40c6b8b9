use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Core types for the family tree maker

/// A uniquely identified individual in the family graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier: the explicit `id=` attribute, or the display name
    /// stripped to alphanumerics.
    pub id: String,
    /// Real name of the person, as written in the input.
    pub name: String,
    /// Key=value attributes (surname, birthday, deathday, notes, ...).
    /// Ordered so serialized output stays byte-identical across runs.
    pub attributes: BTreeMap<String, String>,
    /// Bare attributes (M, F, unique, ...).
    pub flags: BTreeSet<String>,
}

impl Person {
    pub fn is_female(&self) -> bool {
        self.flags.contains("F")
    }

    pub fn is_male(&self) -> bool {
        self.flags.contains("M")
    }

    /// Enrich this record with a later occurrence of the same person.
    ///
    /// Attributes and flags are unioned, with the later occurrence winning
    /// per key; the display name of the first occurrence is kept.
    pub fn merge_from(&mut self, other: Person) {
        self.attributes.extend(other.attributes);
        self.flags.extend(other.flags);
    }
}

/// A union of one or two parents and their ordered children.
///
/// One household corresponds to one block of consecutive lines in the input:
/// unindented lines are the parents, tab-indented lines the children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

impl Household {
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}

/// The whole parsed family: every person keyed by id, plus all households.
///
/// Insertion order of persons is preserved so that lookups, root fallback and
/// serialization stay deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    persons: HashMap<String, Person>,
    order: Vec<String>,
    households: Vec<Household>,
}

impl Family {
    /// Add a person, or merge into the existing record with the same id.
    /// Returns the id under which the person is stored.
    pub fn add_person(&mut self, person: Person) -> String {
        let id = person.id.clone();
        match self.persons.get_mut(&id) {
            Some(existing) => existing.merge_from(person),
            None => {
                self.order.push(id.clone());
                self.persons.insert(id.clone(), person);
            }
        }
        id
    }

    pub fn add_household(&mut self, household: Household) {
        self.households.push(household);
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    /// All persons, in input order.
    pub fn persons_in_order(&self) -> impl Iterator<Item = &Person> {
        self.order.iter().filter_map(|id| self.persons.get(id))
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    /// Find a person by id, falling back to a display-name scan in input
    /// order.
    pub fn find(&self, identifier: &str) -> Option<&Person> {
        if let Some(person) = self.persons.get(identifier) {
            return Some(person);
        }
        self.persons_in_order().find(|p| p.name == identifier)
    }

    /// All directed parent -> child links implied by the households.
    pub fn relationships(&self) -> impl Iterator<Item = (&str, &str)> {
        self.households.iter().flat_map(|h| {
            h.parents.iter().flat_map(move |parent| {
                h.children
                    .iter()
                    .map(move |child| (parent.as_str(), child.as_str()))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
