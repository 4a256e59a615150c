pub mod remote;
pub mod status;
pub mod store;
