use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::identity::{ObjectId, ObjectKind};

/// Directed dependency: `dependency` must be created before `dependent`.
///
/// An absent dependency only registers `dependent` as a node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub dependent: ObjectId,
    pub dependency: Option<ObjectId>,
}

impl Edge {
    pub fn new(dependent: ObjectId, dependency: ObjectId) -> Self {
        Self {
            dependent,
            dependency: Some(dependency),
        }
    }

    /// Node without further dependencies.
    pub fn root(dependent: ObjectId) -> Self {
        Self {
            dependent,
            dependency: None,
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.dependency.as_ref() == Some(&self.dependent)
    }
}

/// Merged adjacency keyed by dependent; values are dependency sets.
///
/// Every dependency is also a node. Nodes seeded from the catalog are marked
/// as defined; the rest are external leaves that are ordered but never
/// rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    adjacency: BTreeMap<ObjectId, BTreeSet<ObjectId>>,
    defined: BTreeSet<ObjectId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: ObjectId) {
        self.adjacency.entry(id).or_default();
    }

    /// Add a node that has a definition in the catalog.
    pub fn define(&mut self, id: ObjectId) {
        self.defined.insert(id.clone());
        self.add_node(id);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        let Edge {
            dependent,
            dependency,
        } = edge;
        match dependency {
            Some(dependency) => {
                self.add_node(dependency.clone());
                self.adjacency.entry(dependent).or_default().insert(dependency);
            }
            None => self.add_node(dependent),
        }
    }

    pub fn extend(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn is_defined(&self, id: &ObjectId) -> bool {
        self.defined.contains(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ObjectId> {
        self.adjacency.keys()
    }

    pub fn dependencies(&self, id: &ObjectId) -> Option<&BTreeSet<ObjectId>> {
        self.adjacency.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Order every node after all of its dependencies.
    ///
    /// Ties are broken by identity order, so the result only depends on the
    /// graph contents. Self references are ignored. Any other cycle fails
    /// with the nodes that take part in it.
    pub fn topological_order(&self) -> Result<Vec<ObjectId>> {
        let mut indegree: BTreeMap<&ObjectId, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&ObjectId, Vec<&ObjectId>> = BTreeMap::new();

        for (node, dependencies) in &self.adjacency {
            let count = dependencies
                .iter()
                .filter(|dependency| *dependency != node)
                .inspect(|dependency| dependents.entry(*dependency).or_default().push(node))
                .count();
            indegree.insert(node, count);
        }

        let mut ready: BTreeSet<&ObjectId> = indegree
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| *node)
            .collect();

        let mut order = Vec::with_capacity(self.adjacency.len());
        while let Some(node) = ready.pop_first() {
            order.push(node.clone());
            for dependent in dependents.get(node).into_iter().flatten() {
                if let Some(count) = indegree.get_mut(dependent) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if order.len() == self.adjacency.len() {
            Ok(order)
        } else {
            let stuck: BTreeSet<&ObjectId> = indegree
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(node, _)| node)
                .collect();
            Err(Error::Cycle {
                nodes: self.cyclic_core(stuck),
                foreign_keys: Vec::new(),
            })
        }
    }

    /// Drop stuck nodes that merely sit downstream of a cycle: a node no
    /// other stuck node depends on cannot be part of one.
    fn cyclic_core(&self, mut stuck: BTreeSet<&ObjectId>) -> Vec<ObjectId> {
        loop {
            let depended_on: BTreeSet<&ObjectId> = stuck
                .iter()
                .filter_map(|node| self.adjacency.get(*node).map(|deps| (*node, deps)))
                .flat_map(|(node, deps)| deps.iter().filter(move |dep| *dep != node))
                .filter(|dep| stuck.contains(dep))
                .collect();
            let before = stuck.len();
            stuck.retain(|node| depended_on.contains(node));
            if stuck.len() == before {
                break;
            }
        }
        stuck.into_iter().cloned().collect()
    }

    pub fn report(&self) -> GraphReport {
        let summary = GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
        };
        match self.topological_order() {
            Ok(order) => GraphReport {
                summary,
                topo_order: Some(order),
                cycle: None,
            },
            Err(Error::Cycle { nodes, .. }) => GraphReport {
                summary,
                topo_order: None,
                cycle: Some(nodes),
            },
            Err(_) => GraphReport {
                summary,
                topo_order: None,
                cycle: None,
            },
        }
    }
}

/// Size of a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Ordering outcome of a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphReport {
    pub summary: GraphSummary,
    pub topo_order: Option<Vec<ObjectId>>,
    pub cycle: Option<Vec<ObjectId>>,
}

/// Merges catalog-derived and provider edges into one graph.
pub struct GraphBuilder<'a> {
    catalog: &'a Catalog,
    graph: DependencyGraph,
}

impl<'a> GraphBuilder<'a> {
    /// Seed every catalog object as a defined node together with the edges
    /// implied by the objects themselves.
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut graph = DependencyGraph::new();
        for id in catalog.ids() {
            graph.define(id.clone());
        }
        graph.extend(catalog.intrinsic_edges());
        Self { catalog, graph }
    }

    /// Merge a stream of edges. Ingestion order does not affect the result.
    ///
    /// Edges whose dependent is not a catalog object are dropped: they
    /// describe objects a filtered extraction left out. Dependencies that
    /// were never loaded stay as leaves.
    pub fn ingest(&mut self, edges: impl IntoIterator<Item = Edge>) -> &mut Self {
        for edge in edges {
            let dependent = self.resolve(edge.dependent);
            if !self.catalog.contains(&dependent) {
                tracing::debug!(event = "dangling_edge_dropped", dependent = %dependent);
                continue;
            }
            let dependency = edge.dependency.map(|id| self.resolve(id));
            self.graph.add_edge(Edge {
                dependent,
                dependency,
            });
        }
        self
    }

    /// Map an edge endpoint onto the loaded object it names.
    ///
    /// Tables and views share a namespace, so a reference of either kind is
    /// retargeted to whichever was loaded. A routine reference without a
    /// specific name resolves when exactly one overload exists.
    pub fn resolve(&self, id: ObjectId) -> ObjectId {
        if self.catalog.contains(&id) {
            return id;
        }

        let resolved = match id.kind {
            ObjectKind::Table | ObjectKind::View => {
                let other = if id.kind == ObjectKind::Table {
                    ObjectId::view(&id.schema, &id.name)
                } else {
                    ObjectId::table(&id.schema, &id.name)
                };
                self.catalog.contains(&other).then_some(other)
            }
            ObjectKind::Routine if id.qualifier.is_none() => {
                match self.catalog.find_routines(&id.schema, &id.name).as_slice() {
                    [only] => Some((*only).clone()),
                    _ => None,
                }
            }
            _ => None,
        };

        match resolved {
            Some(target) => {
                tracing::debug!(event = "edge_retarget", from = %id, to = %target);
                target
            }
            None => id,
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(name: &str) -> ObjectId {
        ObjectId::table("APP", name)
    }

    #[test]
    fn self_reference_does_not_block_ordering() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(Edge::new(t("EMPLOYEE"), t("EMPLOYEE")));
        graph.add_edge(Edge::new(t("EMPLOYEE"), t("DEPT")));
        assert_eq!(graph.topological_order().unwrap(), vec![t("DEPT"), t("EMPLOYEE")]);
    }

    #[test]
    fn root_edge_only_adds_node() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(Edge::root(t("A")));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn ties_break_by_identity() {
        let mut graph = DependencyGraph::new();
        graph.add_node(t("C"));
        graph.add_node(t("A"));
        graph.add_node(ObjectId::index("APP", "AA"));
        graph.add_node(t("B"));
        assert_eq!(
            graph.topological_order().unwrap(),
            vec![t("A"), t("B"), t("C"), ObjectId::index("APP", "AA")]
        );
    }

    #[test]
    fn cycle_error_excludes_downstream_nodes() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(Edge::new(t("A"), t("B")));
        graph.add_edge(Edge::new(t("B"), t("C")));
        graph.add_edge(Edge::new(t("C"), t("A")));
        graph.add_edge(Edge::new(t("D"), t("A")));
        graph.add_edge(Edge::new(t("E"), t("D")));
        graph.add_edge(Edge::new(t("A"), t("ROOT")));

        match graph.topological_order() {
            Err(Error::Cycle { nodes, .. }) => assert_eq!(nodes, vec![t("A"), t("B"), t("C")]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn edges_of_unloaded_dependents_are_dropped() {
        let mut catalog = Catalog::new();
        catalog
            .insert(crate::schema::Table::new("APP", "T"))
            .unwrap();
        let mut builder = GraphBuilder::new(&catalog);
        builder.ingest([
            Edge::new(ObjectId::table("OTHER", "A"), ObjectId::table("OTHER", "B")),
            Edge::new(ObjectId::table("OTHER", "B"), ObjectId::table("OTHER", "A")),
            Edge::new(t("T"), ObjectId::table("OTHER", "A")),
        ]);
        let graph = builder.build();

        assert!(!graph.contains(&ObjectId::table("OTHER", "B")));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.topological_order().unwrap(),
            vec![ObjectId::table("OTHER", "A"), t("T")]
        );
    }

    #[test]
    fn report_carries_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(Edge::new(t("A"), t("B")));
        graph.add_edge(Edge::new(t("B"), t("A")));
        let report = graph.report();
        assert_eq!(report.summary, GraphSummary { nodes: 2, edges: 2 });
        assert!(report.topo_order.is_none());
        assert_eq!(report.cycle, Some(vec![t("A"), t("B")]));
    }
}
