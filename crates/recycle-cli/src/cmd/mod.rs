pub mod list;
pub mod recycle;
pub mod register;
