pub mod health;
pub mod links;
