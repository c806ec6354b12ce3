use sauron::{
    html::{attributes::*, *},
    prelude::*,
    vdom::Leaf,
};
use taskboard_shared::{
    is_valid_username,
    session::{encode_flag, SAFE_RENDER_KEY, TOKEN_KEY},
    CardView, ClientState, ColumnView, CreateTaskRequest, Direction, Fragment, Status, Task,
};
use web_sys::console;

mod api;
mod storage;

/// Which login endpoint a button talks to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginMode {
    Safe,
    Vulnerable,
}

impl LoginMode {
    fn path(&self) -> &'static str {
        match self {
            LoginMode::Safe => "/api/login",
            LoginMode::Vulnerable => "/api/login-vulnerable",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    // Auth
    SetUsername(String),
    SetPassword(String),
    Login(LoginMode),
    LoggedIn(String),
    LoginFailed(String),
    Logout,

    // Tasks
    LoadTasks,
    TasksLoaded(Vec<Task>),
    SetNewTaskTitle(String),
    SetNewTaskDescription(String),
    SetNewTaskStatus(String),
    AddTask,
    TaskAdded(Task),
    SaveFailed(String),
    Move(i64, Direction),

    ToggleSafeRender,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    is_error: bool,
}

impl Notice {
    fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    state: ClientState,
    username: String,
    password: String,
    login_notice: Option<Notice>,
    new_task_title: String,
    new_task_description: String,
    new_task_status: Status,
    save_notice: Option<Notice>,
}

impl Model {
    fn new(state: ClientState) -> Self {
        Self {
            state,
            username: String::new(),
            password: String::new(),
            login_notice: None,
            new_task_title: String::new(),
            new_task_description: String::new(),
            new_task_status: Status::Todo,
            save_notice: None,
        }
    }

    /// Pick up the identity and render flag left by the previous page load.
    fn restore() -> Self {
        let flag = storage::load(SAFE_RENDER_KEY);
        Self::new(ClientState::restore(storage::load(TOKEN_KEY), flag.as_deref()))
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        if self.state.identity().is_some() {
            Cmd::new(async { Msg::LoadTasks })
        } else {
            Cmd::none()
        }
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::SetUsername(username) => {
                self.username = username;
                Cmd::none()
            }
            Msg::SetPassword(password) => {
                self.password = password;
                Cmd::none()
            }
            Msg::Login(mode) => {
                let username = self.username.trim().to_string();
                if !is_valid_username(&username) {
                    self.login_notice = Some(Notice::error("Bad username"));
                    return Cmd::none();
                }
                let password = self.password.clone();
                Cmd::new(async move {
                    match api::login(mode, username, password).await {
                        Ok(reply) => Msg::LoggedIn(reply.token),
                        Err(e) => Msg::LoginFailed(e.message()),
                    }
                })
            }
            Msg::LoggedIn(token) => {
                storage::save(TOKEN_KEY, &token);
                self.state.log_in(token);
                self.password.clear();
                self.login_notice = None;
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::LoginFailed(message) => {
                self.login_notice = Some(Notice::error(message));
                Cmd::none()
            }
            Msg::Logout => {
                storage::remove(TOKEN_KEY);
                self.state.log_out();
                self.save_notice = None;
                Cmd::none()
            }
            Msg::LoadTasks => {
                let Some(username) = self.state.identity().map(str::to_string) else {
                    return Cmd::none();
                };
                // Overlapping refreshes are not cancelled; the last response to land wins.
                Cmd::new(async move {
                    match api::fetch_tasks(&username).await {
                        Ok(tasks) => Msg::TasksLoaded(tasks),
                        Err(e) => Msg::Error(e.message()),
                    }
                })
            }
            Msg::TasksLoaded(tasks) => {
                console::log_1(&format!("[board] {} tasks loaded", tasks.len()).into());
                self.state.replace_tasks(tasks);
                Cmd::none()
            }
            Msg::SetNewTaskTitle(task_title) => {
                self.new_task_title = task_title;
                Cmd::none()
            }
            Msg::SetNewTaskDescription(description) => {
                self.new_task_description = description;
                Cmd::none()
            }
            Msg::SetNewTaskStatus(raw) => {
                if let Ok(status) = raw.parse() {
                    self.new_task_status = status;
                }
                Cmd::none()
            }
            Msg::AddTask => {
                let Some(username) = self.state.identity().map(str::to_string) else {
                    return Cmd::none();
                };
                let task_title = self.new_task_title.trim().to_string();
                if task_title.is_empty() {
                    self.save_notice = Some(Notice::error("Title required"));
                    return Cmd::none();
                }
                // The description goes out exactly as typed.
                let request = CreateTaskRequest {
                    username,
                    title: task_title,
                    description: self.new_task_description.clone(),
                    status: self.new_task_status,
                };
                Cmd::new(async move {
                    match api::create_task(request).await {
                        Ok(task) => Msg::TaskAdded(task),
                        Err(e) => Msg::SaveFailed(e.message()),
                    }
                })
            }
            Msg::TaskAdded(task) => {
                self.state.add_task(task);
                self.new_task_title.clear();
                self.new_task_description.clear();
                self.save_notice = Some(Notice::ok("Saved"));
                Cmd::none()
            }
            Msg::SaveFailed(message) => {
                self.save_notice = Some(Notice::error(message));
                Cmd::none()
            }
            Msg::Move(id, direction) => {
                let Some(next) = self.state.move_target(id, direction) else {
                    return Cmd::none();
                };
                Cmd::new(async move {
                    if let Err(e) = api::update_status(id, next).await {
                        console::log_1(&format!("[board] move of task {} failed: {}", id, e.message()).into());
                    }
                    Msg::LoadTasks
                })
            }
            Msg::ToggleSafeRender => {
                let safe = self.state.toggle_safe_render();
                storage::save(SAFE_RENDER_KEY, encode_flag(safe));
                Cmd::new(async { Msg::LoadTasks })
            }
            Msg::Error(error) => {
                console::log_1(&format!("Error: {}", error).into());
                let notice = Some(Notice::error(error));
                if self.state.identity().is_some() {
                    self.save_notice = notice;
                } else {
                    self.login_notice = notice;
                }
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                self.view_header(),
                div(
                    [class("max-w-6xl mx-auto px-6 py-8")],
                    [match self.state.identity() {
                        Some(user) => self.view_app_card(user),
                        None => self.view_login_card(),
                    }],
                ),
            ],
        )
    }
}

impl Model {
    fn view_header(&self) -> Node<Msg> {
        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-6xl mx-auto px-6 py-4 flex items-center justify-between")], [
                h1([class("text-2xl font-bold text-ctp-text")], [text("Task Board")]),
                match self.state.identity() {
                    Some(user) => span([id("who"), class("text-ctp-subtext0")], [
                        text(&format!("logged in as {}", user)),
                    ]),
                    None => span([], []),
                },
            ]),
        ])
    }

    fn view_notice(notice: &Option<Notice>) -> Node<Msg> {
        match notice {
            Some(notice) => p(
                [class(if notice.is_error { "error text-ctp-red" } else { "muted text-ctp-green" })],
                [text(&notice.text)],
            ),
            None => span([], []),
        }
    }

    fn view_login_card(&self) -> Node<Msg> {
        div([id("loginCard"), class("max-w-md mx-auto bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1")], [
            h2([class("text-xl font-semibold mb-4")], [text("Sign in")]),
            div([class("space-y-3")], [
                input([
                    r#type("text"),
                    placeholder("username"),
                    value(&self.username),
                    on_input(|event| Msg::SetUsername(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md"),
                ], []),
                input([
                    r#type("password"),
                    placeholder("password"),
                    value(&self.password),
                    on_input(|event| Msg::SetPassword(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md"),
                ], []),
                div([class("flex gap-2")], [
                    button([
                        on_click(|_| Msg::Login(LoginMode::Safe)),
                        class("bg-ctp-blue text-ctp-base font-medium px-4 py-2 rounded-md"),
                    ], [text("Login (safe)")]),
                    button([
                        on_click(|_| Msg::Login(LoginMode::Vulnerable)),
                        class("bg-ctp-red text-ctp-base font-medium px-4 py-2 rounded-md"),
                    ], [text("Login (vulnerable)")]),
                ]),
                Self::view_notice(&self.login_notice),
            ]),
        ])
    }

    fn view_app_card(&self, user: &str) -> Node<Msg> {
        div([id("appCard"), class("space-y-6")], [
            div([class("flex items-center justify-between")], [
                label([class("flex items-center gap-2 cursor-pointer")], [
                    input([
                        r#type("checkbox"),
                        id("safeToggle"),
                        checked(self.state.safe_render()),
                        on_click(|_| Msg::ToggleSafeRender),
                    ], []),
                    text("Safe render (descriptions as text)"),
                ]),
                button([
                    id("logoutBtn"),
                    on_click(|_| Msg::Logout),
                    class("bg-ctp-overlay0 text-ctp-text px-4 py-2 rounded-md"),
                ], [text(&format!("Log out {}", user))]),
            ]),
            self.view_create_form(),
            self.view_board(),
        ])
    }

    fn view_create_form(&self) -> Node<Msg> {
        div([class("p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2 space-y-3")], [
            h2([class("text-xl font-semibold")], [text("Add Task")]),
            input([
                r#type("text"),
                placeholder("Task title"),
                value(&self.new_task_title),
                on_input(|event| Msg::SetNewTaskTitle(event.value())),
                class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md"),
            ], []),
            textarea([
                placeholder("Description (HTML is not sanitized)"),
                value(&self.new_task_description),
                on_input(|event| Msg::SetNewTaskDescription(event.value())),
                class("w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md h-20 resize-y"),
            ], []),
            div([class("flex items-center gap-3")], [
                select(
                    [
                        on_input(|event| Msg::SetNewTaskStatus(event.value())),
                        class("px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md"),
                    ],
                    Status::ALL
                        .iter()
                        .map(|status| {
                            option(
                                [value(status.as_str()), selected(*status == self.new_task_status)],
                                [text(status.as_str())],
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                button([
                    on_click(|_| Msg::AddTask),
                    class("bg-ctp-blue text-ctp-base font-medium px-6 py-2 rounded-md"),
                ], [text("Add Task")]),
                Self::view_notice(&self.save_notice),
            ]),
        ])
    }

    fn view_board(&self) -> Node<Msg> {
        let board = self.state.board();
        div(
            [class("grid grid-cols-1 md:grid-cols-3 gap-6")],
            board.columns.iter().map(|column| self.view_column(column)).collect::<Vec<_>>(),
        )
    }

    fn view_column(&self, column: &ColumnView) -> Node<Msg> {
        div([id(&format!("col-{}", column.status)), class("bg-ctp-surface0 rounded-lg p-4 border border-ctp-surface1")], [
            h3([class("text-lg font-semibold mb-3 uppercase")], [text(column.status.as_str())]),
            div(
                [class("space-y-3")],
                column.cards.iter().map(|card| self.view_card(card)).collect::<Vec<_>>(),
            ),
        ])
    }

    fn view_card(&self, card: &CardView) -> Node<Msg> {
        let task_id = card.id;
        div([key(card_key(card)), class("task rounded-xl p-4 bg-ctp-surface1 border border-ctp-surface2")], [
            div([class("title font-semibold")], [text(&card.title)]),
            div([class("desc text-sm text-ctp-subtext1 break-words")], [description_node(&card.description)]),
            div([class("bar flex gap-2 mt-2")], [
                button([
                    class("ghost px-2 rounded"),
                    on_click(move |_| Msg::Move(task_id, Direction::Left)),
                ], [text("←")]),
                button([
                    class("ghost px-2 rounded"),
                    on_click(move |_| Msg::Move(task_id, Direction::Right)),
                ], [text("→")]),
            ]),
        ])
    }
}

/// A symbol leaf is only ever inserted while its parent element is being
/// created, never patched in place, so the key changes with the render mode
/// and the whole card is rebuilt when the toggle flips.
fn card_key(card: &CardView) -> String {
    let mode = if card.description.is_live_markup() { "raw" } else { "safe" };
    format!("{}-{mode}", card.id)
}

fn description_node(fragment: &Fragment) -> Node<Msg> {
    match fragment {
        Fragment::Text(plain) => text(plain),
        // Handed to insertAdjacentHTML as-is: the browser parses the markup and
        // inline handlers such as onerror run.
        Fragment::Markup(markup) => Node::Leaf(Leaf::Symbol(markup.clone().into())),
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::restore());
}
