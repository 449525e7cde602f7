pub mod auth;
pub mod entries;
pub mod middleware;
pub mod state;

// Re-export the journal handlers to make them easily accessible
// to the binary that will build the web server router.
pub use entries::{
    calendar_handler, create_entry_handler, dashboard_handler, delete_entry_handler,
    get_entry_handler, list_entries_handler,
};
pub use middleware::require_auth;
