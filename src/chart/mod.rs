//! Timeline chart layout.
//!
//! Turns a repository and its schedule into backend-neutral drawing
//! primitives: a grid of week columns, then one row per task (ascending id)
//! with its id, title and a bar spanning `[start, finish)`.

pub mod svg;

use crate::calculations::{ScheduleError, ScheduleResult};
use crate::repository::TaskRepository;
use crate::schedule::Schedule;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ID_LABEL_X: f64 = 10.0;
const TITLE_LABEL_X: f64 = 40.0;
const BAR_FILL: &str = "#f75d59";
const BAR_OUTLINE: &str = "black";
/// Longest timeline the chart grid is drawn for.
pub const MAX_WEEKS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    /// Left column holding task ids and titles.
    pub title_width: f64,
    pub row_height: f64,
    pub bar_height: f64,
    pub days_per_week: u32,
    pub dark_mode: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 550.0,
            title_width: 250.0,
            row_height: 40.0,
            bar_height: 20.0,
            days_per_week: 5,
            dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub background: &'static str,
    pub foreground: &'static str,
    pub grid: &'static str,
}

impl ColorScheme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                background: "#2c2c2c",
                foreground: "white",
                grid: "gray",
            }
        } else {
            Self {
                background: "white",
                foreground: "black",
                grid: "gray",
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        color: String,
    },
    Bar {
        task_id: TaskId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        outline: String,
        tooltip: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub total_weeks: u32,
    /// Pixels per day of duration.
    pub day_width: f64,
    pub primitives: Vec<Primitive>,
}

impl Chart {
    pub fn bar_for(&self, task_id: TaskId) -> Option<&Primitive> {
        self.primitives
            .iter()
            .find(|p| matches!(p, Primitive::Bar { task_id: id, .. } if *id == task_id))
    }

    pub fn to_svg(&self) -> String {
        svg::Svg(self).to_string()
    }
}

/// Schedules `tasks` afresh and lays out the result. Nothing is drawn when
/// scheduling fails.
pub fn render_plan(tasks: &TaskRepository, options: &ChartOptions) -> ScheduleResult<Chart> {
    let schedule = Schedule::compute(tasks)?;
    layout(tasks, &schedule, options)
}

pub fn layout(
    tasks: &TaskRepository,
    schedule: &Schedule,
    options: &ChartOptions,
) -> ScheduleResult<Chart> {
    if let Some(task) = tasks.iter().find(|t| !schedule.contains(t.id)) {
        return Err(ScheduleError::MissingStart { task: task.id });
    }

    let colors = ColorScheme::for_mode(options.dark_mode);
    let days_per_week = f64::from(options.days_per_week.max(1));
    let total_days = schedule.makespan(tasks);
    let weeks = (total_days / days_per_week).floor() + 1.0;
    if !weeks.is_finite() || weeks > f64::from(MAX_WEEKS) {
        return Err(ScheduleError::TimelineTooLong {
            total_days,
            max_weeks: MAX_WEEKS,
        });
    }
    let total_weeks = weeks as u32;
    let day_width = ((options.width - options.title_width)
        / (f64::from(total_weeks) * days_per_week))
        .floor()
        .max(0.0);
    let week_width = days_per_week * day_width;

    let mut primitives = Vec::with_capacity(total_weeks as usize * 2 + tasks.len() * 3);

    for week in 0..total_weeks {
        let x = options.title_width + f64::from(week) * week_width;
        primitives.push(Primitive::Line {
            x1: x,
            y1: 0.0,
            x2: x,
            y2: options.height,
            color: colors.grid.to_string(),
        });
        primitives.push(Primitive::Text {
            x: x + week_width / 2.0,
            y: options.row_height / 2.0,
            text: format!("Week {}", week + 1),
            anchor: TextAnchor::Middle,
            color: colors.foreground.to_string(),
        });
    }

    let mut y = options.row_height;
    for task in tasks.iter() {
        let start = schedule
            .start_of(task.id)
            .ok_or(ScheduleError::MissingStart { task: task.id })?;
        let label_y = y + options.row_height / 2.0;

        primitives.push(Primitive::Text {
            x: ID_LABEL_X,
            y: label_y,
            text: task.id.to_string(),
            anchor: TextAnchor::Start,
            color: colors.foreground.to_string(),
        });
        primitives.push(Primitive::Text {
            x: TITLE_LABEL_X,
            y: label_y,
            text: task.title.clone(),
            anchor: TextAnchor::Start,
            color: colors.foreground.to_string(),
        });
        primitives.push(Primitive::Bar {
            task_id: task.id,
            x: options.title_width + start * day_width,
            y: y + (options.row_height - options.bar_height) / 2.0,
            width: task.duration * day_width,
            height: options.bar_height,
            fill: BAR_FILL.to_string(),
            outline: BAR_OUTLINE.to_string(),
            tooltip: task.tooltip(),
        });

        y += options.row_height;
    }

    debug!(total_weeks, day_width, tasks = tasks.len(), "laid out chart");

    Ok(Chart {
        width: options.width,
        height: options.height,
        background: colors.background.to_string(),
        total_weeks,
        day_width,
        primitives,
    })
}
