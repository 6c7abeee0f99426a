use crate::repository::TaskRepository;
use crate::task::TaskId;
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Prerequisite graph of a repository. Edges run from prerequisite to dependent;
/// prerequisites missing from the repository contribute no edge.
pub struct DependencyGraph {
    pub graph: DiGraph<TaskId, ()>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(tasks: &TaskRepository) -> Self {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(tasks.len(), 0);
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());

        for task_id in tasks.ids() {
            id_to_index.insert(task_id, graph.add_node(task_id));
        }

        for task in tasks.iter() {
            let v = id_to_index[&task.id];
            for pred_id in &task.prerequisites {
                if let Some(&u) = id_to_index.get(pred_id) {
                    graph.add_edge(u, v, ());
                }
            }
        }

        Self { graph, id_to_index }
    }

    /// Tasks that lie on at least one cycle, ascending.
    pub fn cycle_members(&self) -> Vec<TaskId> {
        let mut members: Vec<TaskId> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || self.graph.find_edge(component[0], component[0]).is_some()
            })
            .flatten()
            .map(|ix| self.graph[ix])
            .collect();
        members.sort_unstable();
        members
    }

    /// Task ids in dependency order, or the id of a task found on a cycle.
    pub fn topological_order(&self) -> Result<Vec<TaskId>, TaskId> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
            .map_err(|cycle| self.graph[cycle.node_id()])
    }

    pub fn successors(&self, task_id: TaskId) -> Vec<TaskId> {
        let Some(&ix) = self.id_to_index.get(&task_id) else {
            return Vec::new();
        };
        let mut successors: Vec<TaskId> = self
            .graph
            .neighbors_directed(ix, Direction::Outgoing)
            .map(|succ_ix| self.graph[succ_ix])
            .collect();
        successors.sort_unstable();
        successors.dedup();
        successors
    }
}
