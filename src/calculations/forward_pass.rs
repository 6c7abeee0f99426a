use super::{ScheduleError, ScheduleResult};
use crate::graph::DependencyGraph;
use crate::repository::TaskRepository;
use crate::schedule::Schedule;
use crate::task::{Task, TaskId};
use crate::task_validation;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, trace};

/// Earliest-start computation over a task repository.
///
/// Tasks are resolved in repeated sweeps over the pending set: a task is
/// resolved once all of its prerequisites are, and starts at the latest
/// finish among them (0 without prerequisites). A sweep that resolves
/// nothing while tasks remain means the rest sit on, or behind, a cycle.
pub struct ForwardPass<'a> {
    tasks: &'a TaskRepository,
}

impl<'a> ForwardPass<'a> {
    pub fn new(tasks: &'a TaskRepository) -> Self {
        Self { tasks }
    }

    pub fn execute(&self) -> ScheduleResult<Schedule> {
        task_validation::validate_task_collection(self.tasks)?;

        if let Some(&(task, prerequisite)) = self.tasks.unknown_prerequisites().first() {
            return Err(ScheduleError::UnknownPrerequisite { task, prerequisite });
        }

        let mut pending: BTreeSet<TaskId> = self.tasks.ids().collect();
        let mut resolved: HashSet<TaskId> = HashSet::with_capacity(pending.len());
        let mut starts: BTreeMap<TaskId, f64> = BTreeMap::new();
        let mut sweeps = 0usize;

        while !pending.is_empty() {
            sweeps += 1;
            let mut progressed = 0usize;
            let candidates: Vec<TaskId> = pending.iter().copied().collect();

            for task_id in candidates {
                let Some(task) = self.tasks.get(task_id) else {
                    continue;
                };
                if !task.prerequisites.iter().all(|p| resolved.contains(p)) {
                    continue;
                }

                let start = self.earliest_start(task, &starts);
                trace!(task_id, start, "resolved task");
                starts.insert(task_id, start);
                resolved.insert(task_id);
                pending.remove(&task_id);
                progressed += 1;
            }

            debug!(
                sweep = sweeps,
                progressed,
                remaining = pending.len(),
                "forward pass sweep"
            );

            if progressed == 0 {
                let unresolved: Vec<TaskId> = pending.into_iter().collect();
                let mut cycle = DependencyGraph::build(self.tasks).cycle_members();
                if cycle.is_empty() {
                    cycle = unresolved.clone();
                }
                debug!(?cycle, "no task resolvable, dependency cycle");
                return Err(ScheduleError::CyclicDependency { cycle, unresolved });
            }
        }

        Ok(Schedule::from_starts(starts))
    }

    fn earliest_start(&self, task: &Task, starts: &BTreeMap<TaskId, f64>) -> f64 {
        task.prerequisites
            .iter()
            .filter_map(|pred_id| {
                let start = starts.get(pred_id)?;
                let duration = self.tasks.get(*pred_id)?.duration;
                Some(start + duration)
            })
            .fold(0.0, f64::max)
    }
}
