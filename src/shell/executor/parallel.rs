use log::debug;

use super::executor::Executor;
use super::process::{self, ExecError};
use super::status::Status;
use crate::shell::parser::ast::CommandNode;

/// `a & b`：两侧各自在子进程中运行，等待两者结束。
///
/// 分支中的 `exit` 只结束该分支进程，无法终止当前会话。
pub fn run(
    executor: &mut Executor,
    left: &CommandNode,
    right: &CommandNode,
    level: usize,
) -> Result<Status, ExecError> {
    let left_pid = process::spawn_branch(executor, left, level)?;
    let right_pid = match process::spawn_branch(executor, right, level) {
        Ok(pid) => pid,
        Err(e) => {
            let _ = process::wait(left_pid);
            return Err(e);
        }
    };

    let left_status = process::wait(left_pid);
    let right_status = process::wait(right_pid);
    let (left_status, right_status) = (left_status?, right_status?);
    debug!("并行分支结束: {:?} {:?}", left_status, right_status);

    if left_status.is_success() && right_status.is_success() {
        Ok(Status::SUCCESS)
    } else {
        Ok(Status::FAILURE)
    }
}
