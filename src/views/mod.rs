//! Projections of [`TodoStore`](crate::store::TodoStore) state.
//!
//! Views never write the collection. They render the latest published
//! state and forward user intents to the store; the only state they own is
//! form drafts and edit mode.

mod detail;
mod input;
mod item;
mod list;

use std::sync::{Mutex, MutexGuard, PoisonError};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub use detail::{DetailRender, DetailView, TodoCard};
pub use input::TodoForm;
pub use item::ItemRow;
pub use list::{ListRender, ListView, RowRender};

pub const TITLE_BANNER: &str = "~~ TODO LIST ~~";

fn lock<T>(local: &Mutex<T>) -> MutexGuard<'_, T> {
    local.lock().unwrap_or_else(PoisonError::into_inner)
}

fn format_timestamp(ts: Option<OffsetDateTime>) -> String {
    ts.and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
