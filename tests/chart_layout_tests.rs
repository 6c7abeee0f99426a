use project_planner::chart::{self, ChartOptions, Primitive, svg};
use project_planner::{Schedule, ScheduleError, Task, TaskRepository};
use tempfile::tempdir;

fn sample() -> TaskRepository {
    [
        Task::new(1, "Design", 2.0),
        Task::new(2, "Build", 3.0).with_prerequisites([1]),
        Task::new(3, "Docs", 1.0).with_prerequisites([1]),
    ]
    .into_iter()
    .collect()
}

fn texts(chart: &project_planner::Chart) -> Vec<String> {
    chart
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn week_grid_covers_the_makespan() {
    let chart = chart::render_plan(&sample(), &ChartOptions::default()).unwrap();

    // makespan 5 days at 5 days per week
    assert_eq!(chart.total_weeks, 2);
    assert_eq!(chart.day_width, 75.0);

    let lines: Vec<f64> = chart
        .primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { x1, .. } => Some(*x1),
            _ => None,
        })
        .collect();
    assert_eq!(lines, vec![250.0, 625.0]);
    assert_eq!(chart.primitives.len(), 2 * 2 + 3 * 3);
}

#[test]
fn rows_follow_ascending_ids_with_labels() {
    let chart = chart::render_plan(&sample(), &ChartOptions::default()).unwrap();
    assert_eq!(
        texts(&chart),
        vec!["Week 1", "Week 2", "1", "Design", "2", "Build", "3", "Docs"]
    );
}

#[test]
fn bars_span_start_to_finish() {
    let chart = chart::render_plan(&sample(), &ChartOptions::default()).unwrap();

    match chart.bar_for(2).unwrap() {
        Primitive::Bar {
            x,
            y,
            width,
            height,
            fill,
            tooltip,
            ..
        } => {
            assert_eq!(*x, 400.0);
            assert_eq!(*y, 90.0);
            assert_eq!(*width, 225.0);
            assert_eq!(*height, 20.0);
            assert_eq!(fill, "#f75d59");
            assert_eq!(tooltip, "Build (3 days)");
        }
        other => panic!("expected bar, got {other:?}"),
    }
    assert!(chart.bar_for(42).is_none());
}

#[test]
fn dark_mode_swaps_colors() {
    let options = ChartOptions {
        dark_mode: true,
        ..ChartOptions::default()
    };
    let chart = chart::render_plan(&sample(), &options).unwrap();
    assert_eq!(chart.background, "#2c2c2c");
    assert!(chart.primitives.iter().all(|p| match p {
        Primitive::Text { color, .. } => color == "white",
        _ => true,
    }));

    let light = chart::render_plan(&sample(), &ChartOptions::default()).unwrap();
    assert_eq!(light.background, "white");
}

#[test]
fn empty_repository_draws_one_week() {
    let chart = chart::render_plan(&TaskRepository::new(), &ChartOptions::default()).unwrap();
    assert_eq!(chart.total_weeks, 1);
    assert_eq!(chart.day_width, 150.0);
    assert!(chart.bar_for(1).is_none());
}

#[test]
fn layout_requires_a_start_for_every_task() {
    let tasks = sample();
    let schedule = Schedule::compute(&tasks.without_task(3)).unwrap();
    let err = chart::layout(&tasks, &schedule, &ChartOptions::default()).unwrap_err();
    assert_eq!(err, ScheduleError::MissingStart { task: 3 });
}

#[test]
fn scheduling_failure_draws_nothing() {
    let tasks: TaskRepository = [
        Task::new(1, "A", 1.0).with_prerequisites([2]),
        Task::new(2, "B", 1.0).with_prerequisites([1]),
    ]
    .into_iter()
    .collect();
    assert!(matches!(
        chart::render_plan(&tasks, &ChartOptions::default()),
        Err(ScheduleError::CyclicDependency { .. })
    ));
}

#[test]
fn svg_export_contains_bars_and_tooltips() {
    let mut tasks = sample();
    tasks.insert(Task::new(4, "R&D", 1.0));
    let chart = chart::render_plan(&tasks, &ChartOptions::default()).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.svg");
    svg::write_svg(&chart, &path).unwrap();
    let out = std::fs::read_to_string(&path).unwrap();

    assert!(out.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1000\""));
    assert!(out.trim_end().ends_with("</svg>"));
    assert_eq!(out.matches("data-task-id=").count(), 4);
    assert!(out.contains("<title>Build (3 days)</title>"));
    assert!(out.contains(">R&amp;D</text>"));
    assert!(out.contains(">Week 2</text>"));
}

#[test]
fn overlong_plans_are_rejected_instead_of_drawn() {
    for duration in [3.0e10, 1.0e9, f64::MAX] {
        let tasks: TaskRepository = [Task::new(1, "Long haul", duration)].into_iter().collect();
        let err = chart::render_plan(&tasks, &ChartOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "timeline_too_long", "duration {duration}");
    }
}

#[test]
fn chain_overflowing_to_infinity_is_rejected() {
    let tasks: TaskRepository = [
        Task::new(1, "Huge", f64::MAX),
        Task::new(2, "Huger", f64::MAX).with_prerequisites([1]),
    ]
    .into_iter()
    .collect();
    assert!(matches!(
        chart::render_plan(&tasks, &ChartOptions::default()),
        Err(ScheduleError::TimelineTooLong { max_weeks: chart::MAX_WEEKS, .. })
    ));
}

#[test]
fn longest_allowed_timeline_still_lays_out() {
    // 9_999 full weeks plus a partial one
    let days = f64::from(chart::MAX_WEEKS - 1) * 5.0 + 2.0;
    let tasks: TaskRepository = [Task::new(1, "Marathon", days)].into_iter().collect();
    let chart = chart::render_plan(&tasks, &ChartOptions::default()).unwrap();
    assert_eq!(chart.total_weeks, chart::MAX_WEEKS);
    assert_eq!(chart.day_width, 0.0);
}
