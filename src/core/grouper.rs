//! Optional clustering of duplicate pairs for display.
//!
//! If A~B and B~C, then {A, B, C} forms one group even though A and C may
//! be outside tolerance of each other. The matcher never does this itself;
//! grouping is applied on top of its pairs by presentation code.

use crate::core::matcher::DuplicatePair;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A transitive cluster of images joined by duplicate pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Members sorted by path
    pub members: Vec<PathBuf>,
    /// Number of pairs inside the group
    pub pair_count: usize,
    /// Largest pair distance inside the group
    pub max_distance: u32,
}

impl DuplicateGroup {
    /// Members beyond the first, i.e. the copies a user could remove
    pub fn redundant_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }
}

/// Union-find over indices
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            self.parent[root_a.max(root_b)] = root_a.min(root_b);
        }
    }
}

/// Cluster pairs into groups; groups are ordered by their first member
pub fn group_pairs(pairs: &[DuplicatePair]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<&OsStr, usize> = HashMap::new();
    let mut paths: Vec<&Path> = Vec::new();

    for pair in pairs {
        for path in [pair.first(), pair.second()] {
            index.entry(path.as_os_str()).or_insert_with(|| {
                paths.push(path);
                paths.len() - 1
            });
        }
    }

    let mut set = DisjointSet::new(paths.len());
    for pair in pairs {
        set.union(
            index[pair.first().as_os_str()],
            index[pair.second().as_os_str()],
        );
    }

    let mut clusters: HashMap<usize, DuplicateGroup> = HashMap::new();
    for (idx, path) in paths.iter().enumerate() {
        let root = set.find(idx);
        clusters
            .entry(root)
            .or_insert_with(|| DuplicateGroup {
                members: Vec::new(),
                pair_count: 0,
                max_distance: 0,
            })
            .members
            .push(path.to_path_buf());
    }

    for pair in pairs {
        let root = set.find(index[pair.first().as_os_str()]);
        if let Some(group) = clusters.get_mut(&root) {
            group.pair_count += 1;
            group.max_distance = group.max_distance.max(pair.distance());
        }
    }

    let mut ordered: BTreeMap<OsString, DuplicateGroup> = BTreeMap::new();
    for (_, mut group) in clusters {
        group.members.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        ordered.insert(group.members[0].clone().into_os_string(), group);
    }

    ordered.into_values().collect()
}
