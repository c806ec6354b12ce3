//! Types and pure logic shared by the task board API and its browser client.

pub mod board;
pub mod session;
pub mod task;
pub mod validate;

pub use board::{render_columns, BoardView, CardView, ColumnView, Fragment, RenderMode};
pub use session::ClientState;
pub use task::{
    CreateTaskRequest, Direction, LoginRequest, LoginResponse, MessageBody, ParseStatusError,
    Status, Task, TaskEnvelope, TaskList, UpdateStatusRequest,
};
pub use validate::is_valid_username;
