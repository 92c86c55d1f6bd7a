pub mod customers;
pub mod expenses;
pub mod organizations;
pub mod users;
