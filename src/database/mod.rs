pub mod manager;
pub mod models;
pub mod repository;
pub mod unit_of_work;

pub use manager::{DatabaseError, DatabaseManager};
pub use unit_of_work::{TxMode, UnitOfWork};
