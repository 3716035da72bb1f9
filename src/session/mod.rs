pub mod exercise;
pub mod input;
pub mod result;
