mod collection;
mod data_store;
mod fetch_state;

pub use data_store::DataStore;
pub use fetch_state::FetchState;
