use super::{ScheduleError, ScheduleResult};
use crate::graph::DependencyGraph;
use crate::repository::TaskRepository;
use crate::schedule::Schedule;
use crate::task::TaskId;
use serde::Serialize;
use std::collections::BTreeMap;

const EPSILON: f64 = 1e-9;

fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskFloat {
    pub late_start: f64,
    pub late_finish: f64,
    pub total_float: f64,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPathAnalysis {
    pub project_finish: f64,
    pub floats: BTreeMap<TaskId, TaskFloat>,
    /// One chain of critical tasks, first to last.
    pub critical_path: Vec<TaskId>,
}

impl CriticalPathAnalysis {
    pub fn is_critical(&self, task_id: TaskId) -> bool {
        self.floats
            .get(&task_id)
            .map(|f| f.is_critical)
            .unwrap_or(false)
    }

    pub fn critical_count(&self) -> usize {
        self.floats.values().filter(|f| f.is_critical).count()
    }
}

/// Late dates and float for an already computed schedule, anchored at the
/// schedule's makespan.
pub struct BackwardPass<'a> {
    tasks: &'a TaskRepository,
    schedule: &'a Schedule,
}

impl<'a> BackwardPass<'a> {
    pub fn new(tasks: &'a TaskRepository, schedule: &'a Schedule) -> Self {
        Self { tasks, schedule }
    }

    /// Expects a schedule produced by [`ForwardPass`](super::ForwardPass) for the
    /// same repository, so the graph is acyclic and every task has a start.
    pub fn execute(&self) -> ScheduleResult<CriticalPathAnalysis> {
        let dag = DependencyGraph::build(self.tasks);

        let mut order = dag.topological_order().map_err(|_| {
            let cycle = dag.cycle_members();
            ScheduleError::CyclicDependency {
                unresolved: cycle.clone(),
                cycle,
            }
        })?;
        order.reverse();

        let project_finish = self.schedule.makespan(self.tasks);
        let mut floats: BTreeMap<TaskId, TaskFloat> = BTreeMap::new();

        for task_id in order {
            let Some(task) = self.tasks.get(task_id) else {
                continue;
            };
            let early_start = self
                .schedule
                .start_of(task_id)
                .ok_or(ScheduleError::MissingStart { task: task_id })?;

            // Successors precede this task in reverse topological order.
            let late_finish = dag
                .successors(task_id)
                .iter()
                .filter_map(|succ| floats.get(succ).map(|f| f.late_start))
                .fold(project_finish, f64::min);
            let late_start = late_finish - task.duration;
            let total_float = late_start - early_start;

            floats.insert(
                task_id,
                TaskFloat {
                    late_start,
                    late_finish,
                    total_float,
                    is_critical: total_float.abs() <= EPSILON,
                },
            );
        }

        let critical_path = self.trace_critical_path(&floats, project_finish);

        Ok(CriticalPathAnalysis {
            project_finish,
            floats,
            critical_path,
        })
    }

    fn trace_critical_path(
        &self,
        floats: &BTreeMap<TaskId, TaskFloat>,
        project_finish: f64,
    ) -> Vec<TaskId> {
        let is_critical = |id: &TaskId| floats.get(id).map(|f| f.is_critical).unwrap_or(false);
        let finishes_at = |id: TaskId, at: f64| {
            self.schedule
                .finish_of(id, self.tasks)
                .map(|finish| approx_equal(finish, at))
                .unwrap_or(false)
        };

        let Some(mut current) = self
            .tasks
            .ids()
            .find(|id| is_critical(id) && finishes_at(*id, project_finish))
        else {
            return Vec::new();
        };

        let mut path = vec![current];
        while let (Some(task), Some(start)) =
            (self.tasks.get(current), self.schedule.start_of(current))
        {
            let next = task
                .prerequisites
                .iter()
                .copied()
                .find(|pred| is_critical(pred) && finishes_at(*pred, start));
            match next {
                Some(pred) => {
                    path.push(pred);
                    current = pred;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}
