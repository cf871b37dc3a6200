pub mod file;
pub mod sea_orm;
