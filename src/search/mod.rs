//! Search and pagination state.
//!
//! - [`descriptor`]: the canonical query and its URL form
//! - [`debounce`]: trailing debouncer for the search box
//! - [`sync`]: reconciles URL history, search box, gender picker and grid

pub mod debounce;
pub mod descriptor;
pub mod sync;

pub use debounce::Debouncer;
pub use descriptor::{PaginationState, QueryDescriptor};
pub use sync::{Commit, FetchTicket, HistoryMode, SearchSync};
