//! Domain types and models

pub mod data_source;
pub mod person;

pub use data_source::DataSourceId;
pub use person::Person;
