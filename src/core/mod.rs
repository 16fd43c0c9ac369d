pub mod balance;
pub mod classifier;
pub mod composer;
pub mod draw;
pub mod engine;
pub mod pillars;
pub mod sal;

pub use crate::domain::ports::{ConfigProvider, Interpreter, LunarConverter};
pub use crate::utils::error::Result;
