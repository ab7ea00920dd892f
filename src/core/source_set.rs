//! Source sets and the `dependsOn` graph between them.
//!
//! An edge `a -> b` means "a depends on b": code in `b` is visible from `a`
//! and is compiled into every target whose compilation uses `a`. The graph
//! is kept acyclic; an edge that would close a cycle is rejected before the
//! graph is touched.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use serde::Serialize;

use crate::util::errors::{ModelError, ModelResult};
use crate::util::naming::validate_name;

/// Root source set for shared production code.
pub const COMMON_MAIN: &str = "commonMain";

/// Root source set for shared test code.
pub const COMMON_TEST: &str = "commonTest";

/// A named bundle of source roots.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSet {
    name: String,
    roots: Vec<PathBuf>,
}

impl SourceSet {
    /// Create a source set with the conventional roots under `project_dir`:
    /// `src/<name>/kotlin` and `src/<name>/resources`.
    pub fn new(name: impl Into<String>, project_dir: &Path) -> Self {
        let name = name.into();
        let base = project_dir.join("src").join(&name);
        SourceSet {
            roots: vec![base.join("kotlin"), base.join("resources")],
            name,
        }
    }

    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }
}

/// The source-set DAG.
#[derive(Debug, Clone, Default)]
pub struct SourceSetGraph {
    graph: DiGraph<SourceSet, ()>,
    by_name: HashMap<String, NodeIndex>,
}

impl SourceSetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source set, failing if the name is taken.
    pub fn add(&mut self, source_set: SourceSet) -> ModelResult<()> {
        validate_name("source set", source_set.name())?;
        if self.by_name.contains_key(source_set.name()) {
            return Err(ModelError::NamingConflict {
                kind: "source set",
                name: source_set.name().to_string(),
            });
        }
        let name = source_set.name().to_string();
        let node = self.graph.add_node(source_set);
        self.by_name.insert(name, node);
        Ok(())
    }

    /// Return the source set named `name`, creating it with conventional
    /// roots if it does not exist yet.
    pub fn maybe_create(&mut self, name: &str, project_dir: &Path) -> ModelResult<&mut SourceSet> {
        if !self.by_name.contains_key(name) {
            tracing::debug!("Creating source set {}", name);
            self.add(SourceSet::new(name, project_dir))?;
        }
        let node = self.node(name)?;
        Ok(&mut self.graph[node])
    }

    fn node(&self, name: &str) -> ModelResult<NodeIndex> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownSourceSet(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&SourceSet> {
        self.by_name.get(name).map(|&n| &self.graph[n])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SourceSet> {
        match self.by_name.get(name) {
            Some(&n) => Some(&mut self.graph[n]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All source sets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceSet> {
        self.graph.node_weights()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add `from dependsOn to`.
    ///
    /// Returns `Ok(false)` if the edge already existed. An edge that would
    /// create a cycle (including `from == to`) is rejected and the graph is
    /// left unchanged.
    pub fn depends_on(&mut self, from: &str, to: &str) -> ModelResult<bool> {
        let from_node = self.node(from)?;
        let to_node = self.node(to)?;

        if self.graph.contains_edge(from_node, to_node) {
            return Ok(false);
        }

        if from_node == to_node || has_path_connecting(&self.graph, to_node, from_node, None) {
            let mut path = self.path(to_node, from_node);
            path.insert(0, from.to_string());
            return Err(ModelError::DependsOnCycle {
                from: from.to_string(),
                to: to.to_string(),
                path,
            });
        }

        tracing::debug!("Source set {} dependsOn {}", from, to);
        self.graph.add_edge(from_node, to_node, ());
        Ok(true)
    }

    /// Names along a shortest path from `start` to `end` (inclusive).
    fn path(&self, start: NodeIndex, end: NodeIndex) -> Vec<String> {
        let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            if node == end {
                break;
            }
            for next in self.graph.neighbors(node) {
                if seen.insert(next) {
                    parents.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        let mut path = vec![self.graph[end].name.clone()];
        let mut current = end;
        while let Some(&parent) = parents.get(&current) {
            path.push(self.graph[parent].name.clone());
            current = parent;
        }
        path.reverse();
        path
    }

    /// Direct `dependsOn` edges of a source set.
    pub fn dependencies(&self, name: &str) -> ModelResult<Vec<String>> {
        let node = self.node(name)?;
        let mut deps: Vec<String> = self
            .graph
            .neighbors(node)
            .map(|n| self.graph[n].name.clone())
            .collect();
        deps.sort();
        Ok(deps)
    }

    /// Source sets that directly depend on `name`.
    pub fn dependents(&self, name: &str) -> ModelResult<Vec<String>> {
        let node = self.node(name)?;
        let mut deps: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n].name.clone())
            .collect();
        deps.sort();
        Ok(deps)
    }

    /// `name` followed by everything it transitively depends on, breadth first.
    pub fn depends_on_closure(&self, name: &str) -> ModelResult<Vec<String>> {
        let node = self.node(name)?;
        let mut bfs = Bfs::new(&self.graph, node);
        let mut closure = Vec::new();
        while let Some(n) = bfs.next(&self.graph) {
            closure.push(self.graph[n].name.clone());
        }
        Ok(closure)
    }

    /// All source sets with dependencies before dependents.
    pub fn topological_order(&self) -> Vec<String> {
        match toposort(&self.graph, None) {
            Ok(order) => order
                .into_iter()
                .rev()
                .map(|n| self.graph[n].name.clone())
                .collect(),
            // Edges are checked on insertion, so the graph is always acyclic.
            Err(_) => self.iter().map(|s| s.name.clone()).collect(),
        }
    }

    /// Number of `dependsOn` edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
