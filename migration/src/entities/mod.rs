pub mod contact_message;
pub mod project;
pub mod visit;
