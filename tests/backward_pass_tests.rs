use project_planner::calculations::BackwardPass;
use project_planner::{Schedule, Task, TaskRepository};

fn project() -> TaskRepository {
    // 1(2) -> {2(3), 3(1)} -> 4(2); 5(1) stands alone
    [
        Task::new(1, "Design", 2.0),
        Task::new(2, "Build", 3.0).with_prerequisites([1]),
        Task::new(3, "Docs", 1.0).with_prerequisites([1]),
        Task::new(4, "Ship", 2.0).with_prerequisites([2, 3]),
        Task::new(5, "Party", 1.0),
    ]
    .into_iter()
    .collect()
}

#[test]
fn late_dates_and_float_follow_successors() {
    let tasks = project();
    let schedule = Schedule::compute(&tasks).unwrap();
    let analysis = BackwardPass::new(&tasks, &schedule).execute().unwrap();

    assert_eq!(analysis.project_finish, 7.0);

    let docs = analysis.floats[&3];
    assert_eq!(docs.late_finish, 5.0);
    assert_eq!(docs.late_start, 4.0);
    assert_eq!(docs.total_float, 2.0);
    assert!(!docs.is_critical);

    let party = analysis.floats[&5];
    assert_eq!(party.late_finish, 7.0);
    assert_eq!(party.total_float, 6.0);

    for id in [1, 2, 4] {
        assert!(analysis.is_critical(id), "task {id} should be critical");
        assert_eq!(analysis.floats[&id].total_float, 0.0);
    }
    assert_eq!(analysis.critical_count(), 3);
}

#[test]
fn critical_path_runs_from_first_to_last_task() {
    let tasks = project();
    let analysis = Schedule::compute(&tasks).unwrap().analyze(&tasks).unwrap();
    assert_eq!(analysis.critical_path, vec![1, 2, 4]);
}

#[test]
fn ties_on_the_critical_path_prefer_lower_ids() {
    let tasks: TaskRepository = [
        Task::new(1, "A", 2.0),
        Task::new(2, "B", 2.0),
        Task::new(3, "Join", 1.0).with_prerequisites([1, 2]),
    ]
    .into_iter()
    .collect();
    let analysis = Schedule::compute(&tasks).unwrap().analyze(&tasks).unwrap();
    assert_eq!(analysis.critical_count(), 3);
    assert_eq!(analysis.critical_path, vec![1, 3]);
}

#[test]
fn empty_project_has_no_critical_path() {
    let tasks = TaskRepository::new();
    let analysis = Schedule::compute(&tasks).unwrap().analyze(&tasks).unwrap();
    assert_eq!(analysis.project_finish, 0.0);
    assert!(analysis.floats.is_empty());
    assert!(analysis.critical_path.is_empty());
}

#[test]
fn schedule_not_from_forward_pass_is_refused() {
    let cyclic: TaskRepository = [
        Task::new(1, "A", 1.0).with_prerequisites([2]),
        Task::new(2, "B", 1.0).with_prerequisites([1]),
    ]
    .into_iter()
    .collect();
    let unrelated = Schedule::compute(&TaskRepository::new()).unwrap();
    let err = BackwardPass::new(&cyclic, &unrelated).execute().unwrap_err();
    assert_eq!(err.kind(), "cyclic_dependency");

    let acyclic = project();
    let err = BackwardPass::new(&acyclic, &unrelated).execute().unwrap_err();
    assert_eq!(err.kind(), "missing_start");
}
