pub mod mappers;
pub mod money;
