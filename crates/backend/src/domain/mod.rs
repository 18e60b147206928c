pub mod logs;
pub mod orders;
pub mod products;
pub mod sales;
pub mod users;
