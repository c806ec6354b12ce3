//! Declarative rendering of the three-column board.
//!
//! `render_columns` turns the client's task mirror into a view model that the
//! browser layer paints one-to-one. All render-mode decisions are made here so
//! they can be checked without a DOM.

use crate::task::{Direction, Status, Task};

/// How task descriptions reach the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Descriptions are inserted as inert text.
    Safe,
    /// Descriptions are parsed as markup, so embedded handlers run.
    Raw,
}

impl RenderMode {
    pub fn from_safe_flag(safe: bool) -> Self {
        if safe {
            RenderMode::Safe
        } else {
            RenderMode::Raw
        }
    }
}

/// A piece of user-supplied content and how the page must insert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Markup(String),
}

impl Fragment {
    pub fn is_live_markup(&self) -> bool {
        matches!(self, Fragment::Markup(_))
    }

    pub fn source(&self) -> &str {
        match self {
            Fragment::Text(s) | Fragment::Markup(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: i64,
    pub status: Status,
    /// Always plain text, whatever the mode.
    pub title: String,
    pub description: Fragment,
    pub left: Option<Status>,
    pub right: Option<Status>,
}

impl CardView {
    pub fn target(&self, direction: Direction) -> Option<Status> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub status: Status,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, status: Status) -> &ColumnView {
        // render_columns always emits one column per status, in order
        &self.columns[status_index(status)]
    }

    pub fn find_card(&self, id: i64) -> Option<&CardView> {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter())
            .find(|card| card.id == id)
    }
}

fn status_index(status: Status) -> usize {
    Status::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or_default()
}

fn card(task: &Task, mode: RenderMode) -> CardView {
    let description = match mode {
        RenderMode::Safe => Fragment::Text(task.description.clone()),
        RenderMode::Raw => Fragment::Markup(task.description.clone()),
    };
    CardView {
        id: task.id,
        status: task.status,
        title: task.title.clone(),
        description,
        left: task.status.step(Direction::Left),
        right: task.status.step(Direction::Right),
    }
}

/// Lay `tasks` out into todo/doing/done columns, keeping their relative order.
pub fn render_columns(tasks: &[Task], mode: RenderMode) -> BoardView {
    let columns = Status::ALL
        .iter()
        .map(|status| ColumnView {
            status: *status,
            cards: tasks
                .iter()
                .filter(|task| task.status == *status)
                .map(|task| card(task, mode))
                .collect(),
        })
        .collect();
    BoardView { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const PAYLOAD: &str = "<img src=x onerror=alert('XSS')>";

    fn task(id: i64, status: Status, description: &str) -> Task {
        Task {
            id,
            username: "alice".into(),
            title: format!("<b>task {id}</b>"),
            description: description.into(),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, id as u32).unwrap(),
        }
    }

    #[test]
    fn safe_mode_keeps_description_inert() {
        let board = render_columns(&[task(1, Status::Todo, PAYLOAD)], RenderMode::Safe);
        let card = board.find_card(1).unwrap();
        assert_eq!(card.description, Fragment::Text(PAYLOAD.into()));
        assert!(!card.description.is_live_markup());
    }

    #[test]
    fn raw_mode_makes_description_live_markup() {
        let board = render_columns(&[task(1, Status::Todo, PAYLOAD)], RenderMode::Raw);
        let card = board.find_card(1).unwrap();
        assert_eq!(card.description, Fragment::Markup(PAYLOAD.into()));
        assert!(card.description.source().contains("onerror="));
    }

    #[test]
    fn title_is_plain_text_in_both_modes() {
        for mode in [RenderMode::Safe, RenderMode::Raw] {
            let board = render_columns(&[task(7, Status::Doing, "")], mode);
            assert_eq!(board.find_card(7).unwrap().title, "<b>task 7</b>");
        }
    }

    #[test]
    fn cards_land_in_their_status_column_in_input_order() {
        let tasks = vec![
            task(3, Status::Done, ""),
            task(2, Status::Todo, ""),
            task(1, Status::Todo, ""),
        ];
        let board = render_columns(&tasks, RenderMode::Safe);

        let order: Vec<Status> = board.columns.iter().map(|c| c.status).collect();
        assert_eq!(order, Status::ALL.to_vec());

        let todo: Vec<i64> = board.column(Status::Todo).cards.iter().map(|c| c.id).collect();
        assert_eq!(todo, vec![2, 1]);
        assert!(board.column(Status::Doing).cards.is_empty());
        assert_eq!(board.column(Status::Done).cards.len(), 1);
    }

    #[test]
    fn edge_columns_have_no_outward_move() {
        let tasks = vec![task(1, Status::Todo, ""), task(2, Status::Done, "")];
        let board = render_columns(&tasks, RenderMode::Safe);

        let first = board.find_card(1).unwrap();
        assert_eq!(first.target(Direction::Left), None);
        assert_eq!(first.target(Direction::Right), Some(Status::Doing));

        let last = board.find_card(2).unwrap();
        assert_eq!(last.target(Direction::Left), Some(Status::Doing));
        assert_eq!(last.target(Direction::Right), None);
    }

    #[test]
    fn rendering_is_pure() {
        let tasks = vec![task(1, Status::Doing, PAYLOAD)];
        assert_eq!(
            render_columns(&tasks, RenderMode::Raw),
            render_columns(&tasks, RenderMode::Raw)
        );
    }
}
