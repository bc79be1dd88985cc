//! Search state: filters, pagination and the session that drives fetches.

mod filters;
mod pagination;
mod session;

pub use session::{SearchSession, SessionOptions};
