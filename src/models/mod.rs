pub mod admin;
pub mod quotation;
