pub mod detail;
pub mod list;
pub mod navigation;
pub mod options;
pub mod shell;

#[cfg(test)]
mod testing;

pub use detail::{DetailController, DetailSnapshot, DETAIL_ERROR};
pub use list::{ListController, ListSnapshot, LIST_ERROR};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use options::{ResponseOrdering, ViewOptions};
pub use shell::{ActiveView, ViewShell};

pub mod prelude {
    pub use super::{DetailController, ListController, Navigator, Route, ViewOptions, ViewShell};
    pub use ar_core::{Article, FetchState, FilterCriteria, Result, Error};
}
