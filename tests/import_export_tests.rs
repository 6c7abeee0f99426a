use std::io::Write;

use project_planner::persistence::{
    read_tasks_csv_from_reader, tasks_from_json_str, tasks_to_json_string,
};
use project_planner::{
    PersistenceError, Task, TaskDocument, TaskRepository, load_tasks_json, read_tasks_csv,
    save_tasks_json,
};
use tempfile::{NamedTempFile, tempdir};

fn sample() -> TaskRepository {
    [
        Task::new(1, "Design", 2.0),
        Task::new(2, "Build", 3.5).with_prerequisites([1]),
        Task::new(3, "Ship", 1.0).with_prerequisites([1, 2]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn csv_rows_become_tasks() {
    let input = "1,Design,2\n2,Build,3.5,1\n3,Ship,1,1 2\n";
    let tasks = read_tasks_csv_from_reader(input.as_bytes()).unwrap();
    assert_eq!(tasks, sample());
}

#[test]
fn csv_fields_are_trimmed_around_numbers() {
    let input = " 7 ,Spaced title, 4 ,  \n";
    let tasks = read_tasks_csv_from_reader(input.as_bytes()).unwrap();
    let task = tasks.get(7).unwrap();
    assert_eq!(task.title, "Spaced title");
    assert_eq!(task.duration, 4.0);
    assert!(task.prerequisites.is_empty());
}

#[test]
fn malformed_csv_rows_are_skipped() {
    let input = "\
1,Good,2
2,Too short
x,Bad id,1
3,Bad duration,soon
4,Bad prereq,1,1 two
5,Negative,-1
6,Also good,1,1
";
    let tasks = read_tasks_csv_from_reader(input.as_bytes()).unwrap();
    assert_eq!(tasks.ids().collect::<Vec<_>>(), vec![1, 6]);
    assert_eq!(
        tasks.get(6).unwrap().prerequisites.iter().copied().collect::<Vec<_>>(),
        vec![1]
    );
}

#[test]
fn csv_file_loads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1,Design,2").unwrap();
    writeln!(file, "2,Build,3.5,1").unwrap();
    let tasks = read_tasks_csv(file.path()).unwrap();
    assert_eq!(tasks.len(), 2);
}

#[test]
fn missing_csv_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = read_tasks_csv(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn json_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");

    save_tasks_json(&sample(), &path).unwrap();
    let loaded = load_tasks_json(&path).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn json_document_shape() {
    let json = tasks_to_json_string(&sample()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let tasks = value["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[2]["id"], 3);
    assert_eq!(tasks[2]["title"], "Ship");
    assert_eq!(tasks[2]["duration"], 1.0);
    assert_eq!(tasks[2]["prerequisites"], serde_json::json!([1, 2]));
}

#[test]
fn json_prerequisites_may_be_omitted() {
    let tasks =
        tasks_from_json_str(r#"{"tasks":[{"id":1,"title":"Only","duration":2}]}"#).unwrap();
    assert!(tasks.get(1).unwrap().prerequisites.is_empty());
}

#[test]
fn json_with_invalid_duration_is_rejected() {
    let err = tasks_from_json_str(r#"{"tasks":[{"id":1,"title":"Bad","duration":-2}]}"#)
        .unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = tasks_from_json_str("{not json").unwrap_err();
    assert!(matches!(err, PersistenceError::Serialization(_)));
}

#[test]
fn later_duplicate_ids_replace_earlier_ones() {
    let document = TaskDocument {
        tasks: vec![Task::new(1, "First", 1.0), Task::new(1, "Second", 2.0)],
    };
    let tasks = document.into_repository().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks.get(1).unwrap().title, "Second");
}
