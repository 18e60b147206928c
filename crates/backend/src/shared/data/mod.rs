pub mod dates;
pub mod db;
