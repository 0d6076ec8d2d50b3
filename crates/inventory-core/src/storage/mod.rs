mod queries;
mod sqlite;

pub use queries::quote_ident;
pub use sqlite::Database;
