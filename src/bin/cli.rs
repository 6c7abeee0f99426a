use polars::prelude::{AnyValue, DataFrame};
use project_planner::chart::{self, ChartOptions, svg};
use project_planner::{
    Schedule, Task, TaskId, TaskRepository, config, load_tasks_json, logging, read_tasks_csv,
    save_tasks_json, task_validation,
};
use std::io::{self, Write};

fn parse_id_list(s: &str) -> Option<Vec<TaskId>> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.trim().parse::<TaskId>().ok())
        .collect()
}

/// Splits on whitespace; double quotes group words into one token.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    tokens
}

fn format_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::List(inner) => match inner.i32() {
            Ok(ca) => ca
                .into_iter()
                .flatten()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => av.to_string(),
        },
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| {
                    col.get(row_idx)
                        .map(|av| format_cell(&av))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current tasks\n  add <id> <title> <duration> [prereqs_csv]\n                                     Upsert a task (prereqs like 1,2,3;\n                                     quote titles with spaces: \"Write docs\")\n  delete <id>                        Delete a task and drop references to it\n  schedule|compute                   Compute start times and the critical path\n  load <csv|json> <path>             Replace tasks from a file\n  save json <path>                   Write tasks to a JSON file\n  chart <path.svg>                   Schedule and export the timeline chart\n  dark <on|off>                      Toggle dark chart colors\n  quit|exit                          Exit"
    );
}

fn print_tasks(tasks: &TaskRepository) {
    match tasks.to_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering tasks: {}", e),
    }
}

fn print_schedule(tasks: &TaskRepository) {
    let schedule = match Schedule::compute(tasks) {
        Ok(schedule) => schedule,
        Err(e) => {
            println!("Scheduling error: {}", e);
            return;
        }
    };
    let analysis = match schedule.analyze(tasks) {
        Ok(analysis) => analysis,
        Err(e) => {
            println!("Scheduling error: {}", e);
            return;
        }
    };
    let summary = schedule.summary_with(&analysis).to_cli_summary();
    match schedule.to_dataframe(tasks, &analysis) {
        Ok(df) => println!("Scheduled ({})\n{}", summary, render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering schedule: {}", e),
    }
}

fn export_chart(tasks: &TaskRepository, options: &ChartOptions, path: &str) {
    match chart::render_plan(tasks, options) {
        Ok(rendered) => match svg::write_svg(&rendered, path) {
            Ok(_) => println!("Chart written to {}.", path),
            Err(e) => println!("Error writing chart: {}", e),
        },
        Err(e) => println!("Scheduling error: {}", e),
    }
}

fn main() -> anyhow::Result<()> {
    let planner_config = config::load()?;
    logging::init_logging(None, planner_config.log_level.as_deref())?;

    let mut tasks = TaskRepository::new();
    let mut chart_options = planner_config.chart;

    println!("Project Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let tokens = tokenize(input);
        let mut parts = tokens.iter().map(String::as_str);
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_tasks(&tasks),
            "add" => {
                let id_s = parts.next();
                let title = parts.next();
                let dur_s = parts.next();
                let preds_s = parts.next();
                match (id_s, title, dur_s) {
                    (Some(id_s), Some(title), Some(dur_s)) => {
                        let id: TaskId = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let duration: f64 = match dur_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid duration");
                                continue;
                            }
                        };
                        let prerequisites = match preds_s.map(parse_id_list) {
                            Some(Some(ids)) => ids,
                            Some(None) => {
                                println!("Invalid prerequisite list");
                                continue;
                            }
                            None => Vec::new(),
                        };
                        let task = Task::new(id, title, duration).with_prerequisites(prerequisites);
                        match task_validation::validate_task(&task) {
                            Ok(_) => {
                                let mut next = tasks.clone();
                                next.insert(task);
                                tasks = next;
                                println!("Task upserted.");
                                print_tasks(&tasks);
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: add <id> <title> <duration> [prereqs_csv]"),
                }
            }
            "delete" => match parts.next().map(str::parse::<TaskId>) {
                Some(Ok(id)) => {
                    if tasks.contains(id) {
                        tasks = tasks.without_task(id);
                        println!("Deleted task {id}.");
                        print_tasks(&tasks);
                    } else {
                        println!("Task {id} not found.");
                    }
                }
                Some(Err(_)) => println!("Invalid id"),
                None => println!("Usage: delete <id>"),
            },
            "schedule" | "compute" => print_schedule(&tasks),
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                let loaded = match (fmt, path) {
                    (Some("csv"), Some(path)) => read_tasks_csv(path).map(|t| (t, path)),
                    (Some("json"), Some(path)) => load_tasks_json(path).map(|t| (t, path)),
                    _ => {
                        println!("Usage: load <csv|json> <path>");
                        continue;
                    }
                };
                match loaded {
                    Ok((loaded, path)) => {
                        tasks = loaded;
                        println!("Loaded {} tasks from {}.", tasks.len(), path);
                        print_tasks(&tasks);
                    }
                    Err(e) => println!("Error loading tasks: {}", e),
                }
            }
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match save_tasks_json(&tasks, path) {
                    Ok(_) => println!("Tasks saved to {}.", path),
                    Err(e) => println!("Error saving tasks: {}", e),
                },
                _ => println!("Usage: save json <path>"),
            },
            "chart" => match parts.next() {
                Some(path) => export_chart(&tasks, &chart_options, path),
                None => println!("Usage: chart <path.svg>"),
            },
            "dark" => match parts.next() {
                Some("on") => {
                    chart_options.dark_mode = true;
                    println!("Dark mode on.");
                }
                Some("off") => {
                    chart_options.dark_mode = false;
                    println!("Dark mode off.");
                }
                _ => println!("Usage: dark <on|off>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }

    Ok(())
}
