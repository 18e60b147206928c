pub mod analytics;
pub mod orders;
pub mod products;
pub mod sales;
pub mod users;
