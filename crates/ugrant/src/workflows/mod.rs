pub mod admin;
pub mod checker;
pub mod epc;
pub mod installers;
pub mod leads;
pub mod repository;
