pub mod base;
pub mod sge;
