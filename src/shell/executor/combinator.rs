//! 串行组合：`;`、`&&`、`||`。左侧完全结束后才会开始右侧。

use super::executor::Executor;
use super::status::Status;
use crate::shell::parser::ast::CommandNode;

/// `a ; b`
pub fn sequential(
    executor: &mut Executor,
    left: &CommandNode,
    right: &CommandNode,
    level: usize,
) -> Status {
    match executor.execute(left, level + 1) {
        Status::Terminate => Status::Terminate,
        _ => executor.execute(right, level + 1),
    }
}

/// `a && b`，左侧失败时返回左侧的状态
pub fn and(
    executor: &mut Executor,
    left: &CommandNode,
    right: &CommandNode,
    level: usize,
) -> Status {
    match executor.execute(left, level + 1) {
        Status::Terminate => Status::Terminate,
        status if status.is_success() => executor.execute(right, level + 1),
        status => status,
    }
}

/// `a || b`
pub fn or(
    executor: &mut Executor,
    left: &CommandNode,
    right: &CommandNode,
    level: usize,
) -> Status {
    match executor.execute(left, level + 1) {
        Status::Terminate => Status::Terminate,
        status if status.is_success() => Status::SUCCESS,
        _ => executor.execute(right, level + 1),
    }
}
