//! Static registry of Mind implementations
//!
//! The orchestrator consults the registry to resolve dependencies.
//! Adding a new Mind means registering its identity, dependency list,
//! and implementation here - no other component changes. Graph
//! problems (unknown dependencies, cycles) are rejected at setup,
//! never at run time.

use crate::error::PipelineError;
use crate::mind::Mind;
use crate::minds;
use crate::types::MindId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Registry of available analyzer stages, in registration order.
#[derive(Default)]
pub struct MindRegistry {
    minds: Vec<Arc<dyn Mind>>,
}

impl MindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all eight built-in analyzers.
    pub fn with_default_minds() -> Self {
        let mut registry = Self::new();
        for mind in minds::default_minds() {
            // built-in identities are distinct, so this cannot fail
            let _ = registry.register(mind);
        }
        registry
    }

    pub fn register(&mut self, mind: Arc<dyn Mind>) -> Result<(), PipelineError> {
        if self.get(mind.id()).is_some() {
            return Err(PipelineError::DuplicateRegistration { mind: mind.id() });
        }
        self.minds.push(mind);
        Ok(())
    }

    pub fn get(&self, id: MindId) -> Option<&Arc<dyn Mind>> {
        self.minds.iter().find(|m| m.id() == id)
    }

    pub fn minds(&self) -> &[Arc<dyn Mind>] {
        &self.minds
    }

    pub fn ids(&self) -> Vec<MindId> {
        self.minds.iter().map(|m| m.id()).collect()
    }

    /// Check that every declared dependency is registered and the
    /// graph is acyclic.
    pub fn validate_graph(&self) -> Result<(), PipelineError> {
        for mind in &self.minds {
            for dependency in mind.dependencies() {
                if self.get(dependency).is_none() {
                    return Err(PipelineError::UnknownDependency {
                        mind: mind.id(),
                        dependency,
                    });
                }
            }
        }
        self.check_acyclic()
    }

    fn check_acyclic(&self) -> Result<(), PipelineError> {
        // DFS with an explicit on-path set; the path is kept so a
        // cycle can be reported in full.
        let mut visited: HashSet<MindId> = HashSet::new();

        for start in self.ids() {
            if visited.contains(&start) {
                continue;
            }
            let mut path: Vec<MindId> = Vec::new();
            let mut on_path: HashSet<MindId> = HashSet::new();
            self.dfs(start, &mut visited, &mut path, &mut on_path)?;
        }
        Ok(())
    }

    fn dfs(
        &self,
        node: MindId,
        visited: &mut HashSet<MindId>,
        path: &mut Vec<MindId>,
        on_path: &mut HashSet<MindId>,
    ) -> Result<(), PipelineError> {
        if on_path.contains(&node) {
            let mut cycle: Vec<String> = path
                .iter()
                .skip_while(|n| **n != node)
                .map(|n| n.to_string())
                .collect();
            cycle.push(node.to_string());
            return Err(PipelineError::DependencyCycle {
                path: cycle.join(" -> "),
            });
        }
        if visited.contains(&node) {
            return Ok(());
        }

        path.push(node);
        on_path.insert(node);
        if let Some(mind) = self.get(node) {
            for dependency in mind.dependencies() {
                self.dfs(dependency, visited, path, on_path)?;
            }
        }
        on_path.remove(&node);
        path.pop();
        visited.insert(node);
        Ok(())
    }

    /// Kahn layering of the dependency graph: each layer's Minds are
    /// mutually independent and may run concurrently; layer N+1 only
    /// depends on layers <= N.
    pub fn execution_layers(&self) -> Result<Vec<Vec<MindId>>, PipelineError> {
        self.validate_graph()?;

        let mut remaining: Vec<MindId> = self.ids();
        let mut satisfied: HashSet<MindId> = HashSet::new();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let deps: HashMap<MindId, Vec<MindId>> = remaining
                .iter()
                .filter_map(|id| self.get(*id).map(|m| (*id, m.dependencies())))
                .collect();

            let ready: Vec<MindId> = remaining
                .iter()
                .filter(|id| {
                    deps.get(id)
                        .map(|d| d.iter().all(|dep| satisfied.contains(dep)))
                        .unwrap_or(false)
                })
                .copied()
                .collect();

            // validate_graph already ruled out cycles
            debug_assert!(!ready.is_empty());
            if ready.is_empty() {
                return Err(PipelineError::DependencyCycle {
                    path: remaining
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(" -> "),
                });
            }

            remaining.retain(|id| !ready.contains(id));
            satisfied.extend(ready.iter().copied());
            layers.push(ready);
        }

        Ok(layers)
    }
}
