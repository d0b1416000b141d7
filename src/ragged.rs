//! Ragged arrays, a flat container of values grouped by owner.
//!
//! Every per-box list produced by this crate (the depth grouping, the points per leaf and the U,
//! V, W and X lists) is stored as a single backing vector together with an index pointer into it,
//! so that the group of any owner is a contiguous slice found in constant time.
use crate::types::{Error, Result};

/// Values grouped into contiguous per-owner ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ragged<V> {
    /// Values of all groups, stored back to back in owner order.
    values: Vec<V>,

    /// Index pointer, group `i` is `values[index_pointer[i]..index_pointer[i + 1]]`.
    index_pointer: Vec<usize>,
}

impl<V> Ragged<V> {
    /// Group `(owner, value)` pairs by owner.
    ///
    /// Owners may appear in any order and any owner may have an empty group. Values of the same
    /// owner keep the order in which they appear in `pairs`.
    ///
    /// # Arguments
    /// * `pairs` - Owner and value pairs.
    /// * `nowners` - Size of the owner domain, owners must lie in `0..nowners`.
    pub fn from_pairs(pairs: Vec<(usize, V)>, nowners: usize) -> Result<Self> {
        let mut counts = vec![0usize; nowners];
        for &(owner, _) in pairs.iter() {
            match counts.get_mut(owner) {
                Some(count) => *count += 1,
                None => return Err(Error::OwnerOutOfRange { owner, nowners }),
            }
        }

        let index_pointer = index_pointer(&counts);

        // Counting sort, stable within each owner
        let mut slots: Vec<Option<V>> = std::iter::repeat_with(|| None).take(pairs.len()).collect();
        let mut cursor = index_pointer[..nowners].to_vec();
        for (owner, value) in pairs {
            slots[cursor[owner]] = Some(value);
            cursor[owner] += 1;
        }

        Ok(Self {
            values: slots.into_iter().flatten().collect(),
            index_pointer,
        })
    }

    /// Create from values already in owner order, and the size of each owner's group.
    pub fn from_counts(values: Vec<V>, counts: &[usize]) -> Result<Self> {
        let found: usize = counts.iter().sum();
        if found != values.len() {
            return Err(Error::CountMismatch {
                expected: values.len(),
                found,
            });
        }

        Ok(Self {
            values,
            index_pointer: index_pointer(counts),
        })
    }

    /// The group of an owner, empty if the owner has no values or is out of range.
    pub fn get(&self, owner: usize) -> &[V] {
        match (
            self.index_pointer.get(owner),
            self.index_pointer.get(owner + 1),
        ) {
            (Some(&l), Some(&r)) => &self.values[l..r],
            _ => &[],
        }
    }

    /// Number of owners, including those with empty groups.
    pub fn nowners(&self) -> usize {
        self.index_pointer.len() - 1
    }

    /// Total number of values across all groups.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no owner has any value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values, in owner order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Iterate over `(owner, group)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[V])> + '_ {
        (0..self.nowners()).map(move |owner| (owner, self.get(owner)))
    }
}

fn index_pointer(counts: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(counts.len() + 1);
    let mut total = 0;
    result.push(total);
    for &count in counts.iter() {
        total += count;
        result.push(total);
    }
    result
}

#[cfg(test)]
mod test {
    use super::Ragged;
    use crate::types::Error;

    #[test]
    fn test_from_pairs_unsorted() {
        let pairs = vec![(2, 'a'), (0, 'b'), (2, 'c'), (0, 'd'), (3, 'e')];
        let ragged = Ragged::from_pairs(pairs, 5).unwrap();

        assert_eq!(ragged.nowners(), 5);
        assert_eq!(ragged.len(), 5);
        assert_eq!(ragged.get(0), &['b', 'd']);
        assert!(ragged.get(1).is_empty());
        assert_eq!(ragged.get(2), &['a', 'c']);
        assert_eq!(ragged.get(3), &['e']);
        assert!(ragged.get(4).is_empty());

        // Out of range owners have no values
        assert!(ragged.get(5).is_empty());
    }

    #[test]
    fn test_from_pairs_owner_out_of_range() {
        let pairs = vec![(0, 1), (3, 2)];
        assert_eq!(
            Ragged::from_pairs(pairs, 3),
            Err(Error::OwnerOutOfRange {
                owner: 3,
                nowners: 3
            })
        );
    }

    #[test]
    fn test_from_counts() {
        let ragged = Ragged::from_counts((0..7).collect(), &[1, 2, 0, 4]).unwrap();

        assert_eq!(ragged.get(0), &[0]);
        assert_eq!(ragged.get(1), &[1, 2]);
        assert!(ragged.get(2).is_empty());
        assert_eq!(ragged.get(3), &[3, 4, 5, 6]);

        let groups: Vec<usize> = ragged.iter().map(|(_, g)| g.len()).collect();
        assert_eq!(groups, vec![1, 2, 0, 4]);

        assert_eq!(
            Ragged::from_counts(vec![0, 1], &[1, 2]),
            Err(Error::CountMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_empty() {
        let ragged = Ragged::<usize>::from_pairs(Vec::new(), 3).unwrap();
        assert!(ragged.is_empty());
        assert_eq!(ragged.nowners(), 3);
        assert!(ragged.iter().all(|(_, g)| g.is_empty()));
    }
}
