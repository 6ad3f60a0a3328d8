//! Project tracker for Collabot.
//!
//! Each Slack user owns at most one project record: a description, a list
//! of free-text updates and the topic tags derived from both. Records live
//! in a single JSON file keyed by owner id.
//!
//! # Example
//!
//! ```rust,no_run
//! use collabot_projects::ProjectStore;
//!
//! let store = ProjectStore::new("projects.json");
//! store.add("U123", "A Streamlit dashboard for churn")?;
//! store.update("U123", "Moved the data into SQL")?;
//! for (owner, record) in store.list()? {
//!     println!("{owner}: {:?}", record.tags);
//! }
//! # Ok::<(), collabot_projects::ProjectError>(())
//! ```

mod error;
mod record;
mod render;
mod store;
mod tagger;

pub use error::{ProjectError, ProjectResult};
pub use record::ProjectRecord;
pub use render::{EMPTY_LIST_MESSAGE, render_list, render_record};
pub use store::{ProjectMap, ProjectStore};
pub use tagger::{TAG_KEYWORDS, auto_tag, merge_tags};
