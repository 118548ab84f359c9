pub mod change_set;
pub mod generic;
pub mod store;
pub mod unit_of_work;
pub mod user;
