//! An interning index of player identifiers. Assigns a dense ordinal to each distinct player in
//! first-seen order, so similarity grids can be addressed by `usize` rather than by string id.

use std::ops::Index;

use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("duplicate player id {0}")]
pub struct DuplicateId(pub String);

#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    id_to_ordinal: FxHashMap<String, usize>,
    ordinal_to_id: Vec<String>,
}
impl PlayerIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        let id_to_ordinal = FxHashMap::with_capacity_and_hasher(capacity, Default::default());
        let ordinal_to_id = Vec::with_capacity(capacity);
        Self {
            id_to_ordinal,
            ordinal_to_id,
        }
    }

    /// Resolves the ordinal for `id`, assigning the next free one on first sight.
    pub fn intern(&mut self, id: &str) -> usize {
        match self.id_to_ordinal.get(id) {
            Some(&ordinal) => ordinal,
            None => {
                let ordinal = self.ordinal_to_id.len();
                self.id_to_ordinal.insert(String::from(id), ordinal);
                self.ordinal_to_id.push(String::from(id));
                ordinal
            }
        }
    }

    /// Builds an index from already-distinct identifiers, failing on the first repeat.
    pub fn from_unique<I>(ids: I) -> Result<Self, DuplicateId>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut index = Self::default();
        for id in ids {
            let id = id.as_ref();
            if index.ordinal_of(id).is_some() {
                return Err(DuplicateId(String::from(id)));
            }
            index.intern(id);
        }
        Ok(index)
    }

    pub fn id_at(&self, ordinal: usize) -> Option<&str> {
        self.ordinal_to_id.get(ordinal).map(String::as_str)
    }

    pub fn ordinal_of(&self, id: &str) -> Option<usize> {
        self.id_to_ordinal.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ordinal_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinal_to_id.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ordinal_to_id
    }
}

impl Index<usize> for PlayerIndex {
    type Output = str;

    fn index(&self, ordinal: usize) -> &Self::Output {
        self.id_at(ordinal)
            .unwrap_or_else(|| panic!("no player at ordinal {ordinal}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_resolve() {
        let mut index = PlayerIndex::with_capacity(2);
        assert_eq!(0, index.len());
        assert!(index.is_empty());
        assert_eq!(0, index.intern("a-rodgers"));
        assert_eq!(1, index.intern("b-favre"));
        assert!(!index.is_empty());
        assert_eq!(2, index.len());
        assert_eq!(&["a-rodgers", "b-favre"], index.ids());

        assert_eq!(Some("a-rodgers"), index.id_at(0));
        assert_eq!(Some(0), index.ordinal_of("a-rodgers"));
        assert_eq!(None, index.id_at(2));
        assert_eq!(None, index.ordinal_of("j-montana"));
    }

    #[test]
    fn intern_is_idempotent() {
        let mut index = PlayerIndex::default();
        assert_eq!(0, index.intern("a-rodgers"));
        assert_eq!(1, index.intern("b-favre"));
        assert_eq!(0, index.intern("a-rodgers"));
        assert_eq!(2, index.len());
    }

    #[test]
    fn from_unique() {
        let index = PlayerIndex::from_unique(["zero", "one"]).unwrap();
        assert_eq!(Some(1), index.ordinal_of("one"));
        assert_eq!(2, index.len());
    }

    #[test]
    fn from_unique_rejects_repeat() {
        let err = PlayerIndex::from_unique(["zero", "one", "one"]).unwrap_err();
        assert_eq!("duplicate player id one", err.to_string());
    }

    #[test]
    #[should_panic(expected = "no player at ordinal 2")]
    fn no_player_at_ordinal() {
        let index = PlayerIndex::from_unique(["zero", "one"]).unwrap();
        let _ = &index[2];
    }
}
