//! Explicit application state for front ends.
//!
//! Front-end event handlers take the current state and an event and receive
//! the next state back, keeping the ledger core free of any UI framework
//! lifecycle. The month cursor and edit mode live here and nowhere else.

/// UI-facing state: the month being browsed and the movement being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub month: u32,
    pub year: i32,
    pub editing: Option<i64>,
}

impl AppState {
    pub fn at(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            editing: None,
        }
    }

    /// Human label for the browsed period, e.g. `March 2024`.
    pub fn period_label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    NextMonth,
    PrevMonth,
    JumpTo { month: u32, year: i32 },
    BeginEdit(i64),
    CancelEdit,
}

/// Pure state transition. Invalid jumps leave the state unchanged; month
/// navigation wraps across year boundaries.
pub fn reduce(state: AppState, event: AppEvent) -> AppState {
    match event {
        AppEvent::NextMonth => {
            if state.month == 12 {
                AppState {
                    month: 1,
                    year: state.year + 1,
                    ..state
                }
            } else {
                AppState {
                    month: state.month + 1,
                    ..state
                }
            }
        }
        AppEvent::PrevMonth => {
            if state.month == 1 {
                AppState {
                    month: 12,
                    year: state.year - 1,
                    ..state
                }
            } else {
                AppState {
                    month: state.month - 1,
                    ..state
                }
            }
        }
        AppEvent::JumpTo { month, year } => {
            if (1..=12).contains(&month) {
                AppState {
                    month,
                    year,
                    ..state
                }
            } else {
                state
            }
        }
        AppEvent::BeginEdit(id) => AppState {
            editing: Some(id),
            ..state
        },
        AppEvent::CancelEdit => AppState {
            editing: None,
            ..state
        },
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_navigation_wraps_year_boundaries() {
        let state = AppState::at(12, 2023);
        let next = reduce(state, AppEvent::NextMonth);
        assert_eq!((next.month, next.year), (1, 2024));
        let back = reduce(next, AppEvent::PrevMonth);
        assert_eq!((back.month, back.year), (12, 2023));
    }

    #[test]
    fn invalid_jump_is_ignored() {
        let state = AppState::at(6, 2024);
        let same = reduce(state, AppEvent::JumpTo { month: 13, year: 2024 });
        assert_eq!(same, state);
        let moved = reduce(state, AppEvent::JumpTo { month: 1, year: 2020 });
        assert_eq!((moved.month, moved.year), (1, 2020));
    }

    #[test]
    fn edit_mode_round_trips() {
        let state = AppState::at(3, 2024);
        let editing = reduce(state, AppEvent::BeginEdit(7));
        assert_eq!(editing.editing, Some(7));
        let cleared = reduce(editing, AppEvent::CancelEdit);
        assert_eq!(cleared.editing, None);
    }
}
