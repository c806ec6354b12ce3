//! Browser-side application state, kept free of any DOM or storage handle.

use crate::board::{render_columns, BoardView, RenderMode};
use crate::task::{Direction, Status, Task};

/// Storage key holding the demo token (the logged-in username).
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the safe-render flag as `"1"` or `"0"`.
pub const SAFE_RENDER_KEY: &str = "safeRender";

pub fn encode_flag(flag: bool) -> &'static str {
    if flag {
        "1"
    } else {
        "0"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    identity: Option<String>,
    safe_render: bool,
    tasks: Vec<Task>,
}

impl ClientState {
    /// Rebuild state from what the previous page load persisted.
    /// Only a stored `"1"` turns safe rendering on.
    pub fn restore(token: Option<String>, safe_flag: Option<&str>) -> Self {
        Self {
            identity: token.filter(|t| !t.is_empty()),
            safe_render: safe_flag == Some("1"),
            tasks: Vec::new(),
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn safe_render(&self) -> bool {
        self.safe_render
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::from_safe_flag(self.safe_render)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn log_in(&mut self, token: String) {
        self.identity = Some(token);
        self.tasks.clear();
    }

    pub fn log_out(&mut self) {
        self.identity = None;
        self.tasks.clear();
    }

    /// Swap in a fresh list response. The old mirror is dropped, not merged.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Show a just-created task at the top of its column without refetching.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn toggle_safe_render(&mut self) -> bool {
        self.safe_render = !self.safe_render;
        self.safe_render
    }

    /// Status to request when moving task `id`, or `None` when the move is a no-op.
    pub fn move_target(&self, id: i64, direction: Direction) -> Option<Status> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .and_then(|task| task.status.step(direction))
    }

    pub fn board(&self) -> BoardView {
        render_columns(&self.tasks, self.render_mode())
    }
}
