//! 异步运行时模块

mod message;
mod worker;

pub use message::AppMessage;
pub use worker::Worker;
