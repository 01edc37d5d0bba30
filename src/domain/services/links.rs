use std::collections::BTreeSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkDiff {
    pub added: Vec<i32>,
    pub removed: Vec<i32>,
}

impl LinkDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Rows to insert and delete to turn the `current` link set into `wanted`.
pub fn diff_links(current: &[i32], wanted: &[i32]) -> LinkDiff {
    let current: BTreeSet<i32> = current.iter().copied().collect();
    let wanted: BTreeSet<i32> = wanted.iter().copied().collect();

    LinkDiff {
        added: wanted.difference(&current).copied().collect(),
        removed: current.difference(&wanted).copied().collect(),
    }
}

/// Sorted, duplicate-free copy of a link list from a request body.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_added_and_removed() {
        let diff = diff_links(&[1, 2, 3], &[3, 4, 4, 5]);
        assert_eq!(diff.added, vec![4, 5]);
        assert_eq!(diff.removed, vec![1, 2]);
    }

    #[test]
    fn same_set_is_a_no_op() {
        assert!(diff_links(&[2, 1], &[1, 2]).is_empty());
        assert_eq!(dedup_ids(&[3, 1, 3]), vec![1, 3]);
    }
}
