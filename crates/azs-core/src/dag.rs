//! Dependency graph and deterministic topological ordering

use crate::error::{CoreError, CoreResult};
use crate::object::{ObjectIdentity, ObjectKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Directed graph of "depends on" edges between schema objects.
///
/// An edge `from -> to` means `from` must be created after `to`. Both edge
/// maps are kept as exact transposes of each other, and every node has an
/// entry (possibly empty) in both.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Node identities with their kind; `None` for referenced-but-undefined objects
    nodes: HashMap<ObjectIdentity, Option<ObjectKind>>,

    /// identity -> identities it depends on
    forward: HashMap<ObjectIdentity, HashSet<ObjectIdentity>>,

    /// identity -> identities that depend on it
    reverse: HashMap<ObjectIdentity, HashSet<ObjectIdentity>>,
}

/// Nodes left over after Kahn's algorithm ran out of ready nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclicDependencyWarning {
    /// Every node that could not be ordered, sorted by the tie-break key
    pub unresolved: Vec<ObjectIdentity>,

    /// Strongly connected components (size > 1) among the unresolved nodes
    pub cycles: Vec<Vec<ObjectIdentity>>,
}

impl CyclicDependencyWarning {
    /// Keep only the members accepted by `keep`; `None` when nothing remains.
    pub fn restricted_to(&self, keep: impl Fn(&ObjectIdentity) -> bool) -> Option<Self> {
        let unresolved: Vec<_> = self.unresolved.iter().filter(|i| keep(*i)).cloned().collect();
        if unresolved.is_empty() {
            return None;
        }
        let cycles = self
            .cycles
            .iter()
            .filter(|cycle| cycle.iter().any(&keep))
            .cloned()
            .collect();
        Some(Self { unresolved, cycles })
    }
}

impl fmt::Display for CyclicDependencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.unresolved.iter().map(|i| i.to_string()).collect();
        write!(
            f,
            "cyclic dependency leaves {} object(s) unordered: {}",
            members.len(),
            members.join(", ")
        )
    }
}

/// Output of a topological sort: the full order plus an optional warning
/// when cycles forced some nodes to be appended in tie-break order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Every node exactly once
    pub order: Vec<ObjectIdentity>,

    /// Present when the graph had cycles
    pub warning: Option<CyclicDependencyWarning>,
}

impl TopologicalOrder {
    /// Treat a cycle warning as fatal.
    pub fn into_result(self) -> CoreResult<Vec<ObjectIdentity>> {
        match self.warning {
            None => Ok(self.order),
            Some(warning) => Err(CoreError::CyclicDependency {
                members: warning
                    .unresolved
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Dependencies before dependents
    DependenciesFirst,
    /// Dependents before dependencies
    DependentsFirst,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; re-adding overwrites the kind (last write wins).
    ///
    /// The spelling passed here replaces any spelling the node was first
    /// seen with as an edge endpoint, including inside neighbour sets.
    pub fn add_node(&mut self, identity: ObjectIdentity, kind: ObjectKind) {
        let dependencies = self.forward.remove(&identity).unwrap_or_default();
        let dependents = self.reverse.remove(&identity).unwrap_or_default();
        for dependency in &dependencies {
            if let Some(set) = self.reverse.get_mut(dependency) {
                set.replace(identity.clone());
            }
        }
        for dependent in &dependents {
            if let Some(set) = self.forward.get_mut(dependent) {
                set.replace(identity.clone());
            }
        }

        self.nodes.remove(&identity);
        self.forward.insert(identity.clone(), dependencies);
        self.reverse.insert(identity.clone(), dependents);
        self.nodes.insert(identity, Some(kind));
    }

    /// Register a node without a kind unless it already exists.
    fn ensure_node(&mut self, identity: &ObjectIdentity) {
        if !self.nodes.contains_key(identity) {
            self.nodes.insert(identity.clone(), None);
            self.forward.insert(identity.clone(), HashSet::new());
            self.reverse.insert(identity.clone(), HashSet::new());
        }
    }

    /// Add a dependency edge (`from` depends on `to`). Self-edges are ignored.
    pub fn add_edge(&mut self, from: &ObjectIdentity, to: &ObjectIdentity) {
        if from == to {
            return;
        }
        self.ensure_node(from);
        self.ensure_node(to);
        self.forward
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
        self.reverse
            .entry(to.clone())
            .or_default()
            .insert(from.clone());
    }

    /// Check if an identity is a node of the graph
    pub fn contains(&self, identity: &ObjectIdentity) -> bool {
        self.nodes.contains_key(identity)
    }

    /// Recorded kind of a node; `None` for unknown or kindless nodes
    pub fn kind(&self, identity: &ObjectIdentity) -> Option<ObjectKind> {
        self.nodes.get(identity).copied().flatten()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.forward.values().map(HashSet::len).sum()
    }

    /// Whether `from` directly depends on `to`
    pub fn depends_on(&self, from: &ObjectIdentity, to: &ObjectIdentity) -> bool {
        self.forward
            .get(from)
            .is_some_and(|deps| deps.contains(to))
    }

    /// Direct dependencies of a node, in tie-break order
    pub fn dependencies(&self, identity: &ObjectIdentity) -> Vec<ObjectIdentity> {
        self.sorted_neighbours(self.forward.get(identity))
    }

    /// Direct dependents of a node, in tie-break order
    pub fn dependents(&self, identity: &ObjectIdentity) -> Vec<ObjectIdentity> {
        self.sorted_neighbours(self.reverse.get(identity))
    }

    fn sorted_neighbours(&self, set: Option<&HashSet<ObjectIdentity>>) -> Vec<ObjectIdentity> {
        let mut out: Vec<&ObjectIdentity> = set.into_iter().flatten().collect();
        self.sort_nodes(&mut out);
        out.into_iter().cloned().collect()
    }

    /// Sort by `(kind, schema, name)`; kindless nodes sort before known kinds.
    fn sort_nodes(&self, nodes: &mut [&ObjectIdentity]) {
        nodes.sort_by(|a, b| {
            let ka = self.nodes.get(*a).copied().flatten();
            let kb = self.nodes.get(*b).copied().flatten();
            ka.cmp(&kb).then_with(|| a.cmp(b))
        });
    }

    /// Nodes in creation order: dependencies before dependents.
    ///
    /// Ties are broken by `(kind, schema, name)`. Nodes caught in cycles are
    /// appended in tie-break order and reported in the warning.
    pub fn topological_order(&self) -> TopologicalOrder {
        self.kahn(Direction::DependenciesFirst)
    }

    /// Nodes in removal order: dependents before dependencies.
    ///
    /// Unrelated nodes keep the same `(kind, schema, name)` tie-break as
    /// [`topological_order`](Self::topological_order).
    pub fn reverse_topological_order(&self) -> TopologicalOrder {
        self.kahn(Direction::DependentsFirst)
    }

    fn kahn(&self, direction: Direction) -> TopologicalOrder {
        let (outstanding, release) = match direction {
            Direction::DependenciesFirst => (&self.forward, &self.reverse),
            Direction::DependentsFirst => (&self.reverse, &self.forward),
        };

        let mut in_degree: HashMap<&ObjectIdentity, usize> = self
            .nodes
            .keys()
            .map(|node| (node, outstanding.get(node).map_or(0, HashSet::len)))
            .collect();

        let mut ready: Vec<&ObjectIdentity> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&node, _)| node)
            .collect();
        self.sort_nodes(&mut ready);
        let mut queue: VecDeque<&ObjectIdentity> = ready.into_iter().collect();

        let mut order: Vec<ObjectIdentity> = Vec::with_capacity(self.nodes.len());
        while let Some(node) = queue.pop_front() {
            order.push(node.clone());

            let mut newly_ready = Vec::new();
            for next in release.get(node).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        newly_ready.push(next);
                    }
                }
            }
            self.sort_nodes(&mut newly_ready);
            queue.extend(newly_ready);
        }

        if order.len() == self.nodes.len() {
            return TopologicalOrder {
                order,
                warning: None,
            };
        }

        let placed: HashSet<&ObjectIdentity> = order.iter().collect();
        let mut remaining: Vec<&ObjectIdentity> = self
            .nodes
            .keys()
            .filter(|node| !placed.contains(node))
            .collect();
        self.sort_nodes(&mut remaining);

        let cycles = self.cycles_among(&remaining);
        let unresolved: Vec<ObjectIdentity> = remaining.into_iter().cloned().collect();
        log::debug!(
            "Dependency cycle: {} object(s) ordered by name only",
            unresolved.len()
        );
        order.extend(unresolved.iter().cloned());

        TopologicalOrder {
            order,
            warning: Some(CyclicDependencyWarning { unresolved, cycles }),
        }
    }

    /// Strongly connected components of size > 1 within `members`.
    fn cycles_among(&self, members: &[&ObjectIdentity]) -> Vec<Vec<ObjectIdentity>> {
        let mut graph: DiGraph<&ObjectIdentity, ()> = DiGraph::new();
        let index: HashMap<&ObjectIdentity, NodeIndex> = members
            .iter()
            .map(|&member| (member, graph.add_node(member)))
            .collect();

        for &member in members {
            for dep in self.forward.get(member).into_iter().flatten() {
                if let Some(&target) = index.get(dep) {
                    graph.add_edge(index[member], target, ());
                }
            }
        }

        let mut cycles: Vec<Vec<ObjectIdentity>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut nodes: Vec<&ObjectIdentity> =
                    component.into_iter().map(|idx| graph[idx]).collect();
                self.sort_nodes(&mut nodes);
                nodes.into_iter().cloned().collect()
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
