//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod kv;
pub mod math;
pub mod random;
pub mod todo;

pub use kv::{StoreValueParams, StoreValueTool};
pub use math::{AddParams, AddTool, CalculateParams, CalculateTool, Operation};
pub use random::{RandomNumberParams, RandomNumberTool};
pub use todo::{
    AddTodoParams, AddTodoTool, CompleteTodoParams, CompleteTodoTool, ListTodosParams,
    ListTodosTool, TodoRecord,
};
