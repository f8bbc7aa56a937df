//! Orders requested tasks and their dependencies for execution.
//!
//! For the execution plan to be valid, the following must hold:
//! - No Cycles
//! - Every task a task depends on runs before said task

use super::TaskContainer;
use crate::identifier::TaskId;
use crate::project::ProjectError;
use log::trace;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, VecDeque};

/// The order tasks should be executed in.
#[derive(Debug)]
pub struct ExecutionPlan {
    order: Vec<TaskId>,
}

impl ExecutionPlan {
    /// Creates a plan for the requested tasks and everything they depend on.
    pub fn new(container: &TaskContainer, requested: &[TaskId]) -> Result<Self, ProjectError> {
        let mut graph = TaskIdentifierGraph::new();
        let mut queue: VecDeque<TaskId> = requested.iter().cloned().collect();

        while let Some(id) = queue.pop_front() {
            if graph.contains_id(&id) {
                continue;
            }
            let task = container.get_task(&id)?;
            graph.add_id(id.clone());
            for dependency in task.dependencies() {
                queue.push_back(dependency);
            }
        }

        for id in graph.ids() {
            for dependency in container.get_task(&id)?.dependencies() {
                trace!("{} depends on {}", id, dependency);
                graph.add_edge(&dependency, &id);
            }
        }

        let sorted = toposort(&graph.graph, None)
            .map_err(|cycle| ProjectError::TaskCycle(graph.graph[cycle.node_id()].clone()))?;
        Ok(Self {
            order: sorted
                .into_iter()
                .map(|index| graph.graph[index].clone())
                .collect(),
        })
    }

    pub fn order(&self) -> &[TaskId] {
        &self.order
    }
}

struct TaskIdentifierGraph {
    graph: DiGraph<TaskId, ()>,
    index_to_id: HashMap<TaskId, NodeIndex>,
}

impl TaskIdentifierGraph {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index_to_id: HashMap::new(),
        }
    }

    fn add_id(&mut self, id: TaskId) {
        let index = self.graph.add_node(id.clone());
        self.index_to_id.insert(id, index);
    }

    fn contains_id(&self, id: &TaskId) -> bool {
        self.index_to_id.contains_key(id)
    }

    fn ids(&self) -> Vec<TaskId> {
        self.graph.node_weights().cloned().collect()
    }

    fn add_edge(&mut self, from: &TaskId, to: &TaskId) {
        if let (Some(from), Some(to)) = (self.index_to_id.get(from), self.index_to_id.get(to)) {
            self.graph.update_edge(*from, *to, ());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Empty;

    fn id(s: &str) -> TaskId {
        TaskId::new(s).unwrap()
    }

    #[test]
    fn dependencies_run_first() {
        let mut container = TaskContainer::new();
        let task1 = container.register_task::<Empty>(id("task1")).unwrap();
        let task2 = container.register_task::<Empty>(id("task2")).unwrap();
        container.register_task::<Empty>(id("task3")).unwrap();
        container.register_task::<Empty>(id("unrelated")).unwrap();
        task1.configure_with(|t| t.depends_on(&id("task2")));
        task2.configure_with(|t| t.depends_on(&id("task3")));

        let plan = ExecutionPlan::new(&container, &[id("task1")]).unwrap();
        assert_eq!(plan.order(), &[id("task3"), id("task2"), id("task1")]);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut container = TaskContainer::new();
        let task1 = container.register_task::<Empty>(id("task1")).unwrap();
        let task2 = container.register_task::<Empty>(id("task2")).unwrap();
        task1.configure_with(|t| t.depends_on(&id("task2")));
        task2.configure_with(|t| t.depends_on(&id("task1")));

        assert!(matches!(
            ExecutionPlan::new(&container, &[id("task1")]),
            Err(ProjectError::TaskCycle(_))
        ));
    }

    #[test]
    fn missing_dependency_is_an_error() {
        let mut container = TaskContainer::new();
        let task1 = container.register_task::<Empty>(id("task1")).unwrap();
        task1.configure_with(|t| t.depends_on(&id("ghost")));
        assert!(matches!(
            ExecutionPlan::new(&container, &[id("task1")]),
            Err(ProjectError::IdentifierMissing(_))
        ));
    }
}
