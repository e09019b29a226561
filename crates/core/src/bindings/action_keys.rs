use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::bindings::action_key::ActionKey;
use crate::bindings::bind::Bind;

/// Actions keyed by unique name, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionKeySet {
    actions: IndexMap<Arc<str>, ActionKey>,
}

/// Which actions lose a bind when it is stripped from a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripScope {
    /// Only actions in this category.
    Category(i32),
    Everywhere,
}

impl ActionKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ActionKey> {
        self.actions.get(name)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ActionKey> {
        self.actions.get_mut(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// `false` (and nothing inserted) when the name is already taken.
    pub fn insert(&mut self, action: ActionKey) -> bool {
        if self.actions.contains_key(&action.name) {
            return false;
        }
        self.actions.insert(Arc::clone(&action.name), action);
        true
    }

    /// Keeps the order of the remaining actions.
    pub(crate) fn remove(&mut self, name: &str) -> Option<ActionKey> {
        self.actions.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionKey> {
        self.actions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.actions.keys()
    }

    /// Remove `bind` from every action in `scope` except `keep`. Returns the
    /// names of the actions that lost it.
    pub(crate) fn strip_bind(&mut self, bind: &Bind, keep: &str, scope: StripScope) -> Vec<Arc<str>> {
        self.actions
            .values_mut()
            .filter(|a| a.name.as_ref() != keep)
            .filter(|a| match scope {
                StripScope::Category(c) => a.category == c,
                StripScope::Everywhere => true,
            })
            .filter_map(|a| a.remove_matching(bind).then(|| Arc::clone(&a.name)))
            .collect()
    }
}

impl FromIterator<ActionKey> for ActionKeySet {
    /// Later duplicates of a name are dropped.
    fn from_iter<T: IntoIterator<Item = ActionKey>>(iter: T) -> Self {
        let mut set = ActionKeySet::new();
        for a in iter {
            set.insert(a);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ActionKeySet {
    type Item = &'a ActionKey;
    type IntoIter = indexmap::map::Values<'a, Arc<str>, ActionKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.values()
    }
}
