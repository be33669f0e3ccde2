pub mod heart;
pub mod resp;
