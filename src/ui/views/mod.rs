mod empty;
mod home;
mod search;

pub use empty::EmptyView;
pub use home::HomeView;
pub use search::SearchView;
