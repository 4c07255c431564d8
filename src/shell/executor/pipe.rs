use libc::{STDIN_FILENO, STDOUT_FILENO};
use log::{debug, warn};
use nix::unistd::{pipe, ForkResult};

use super::executor::Executor;
use super::process::{self, ExecError};
use super::redirect;
use super::status::Status;
use crate::shell::parser::ast::CommandNode;

/// `a | b`：两个子进程并发运行，通过一个匿名管道连接。
///
/// 返回右侧的状态；左侧的状态只记录日志后丢弃，与常见 shell 的管道语义一致。
pub fn run(
    executor: &mut Executor,
    left: &CommandNode,
    right: &CommandNode,
    level: usize,
) -> Result<Status, ExecError> {
    let (reader, writer) = pipe().map_err(ExecError::Pipe)?;

    let left_pid = match process::fork_process()? {
        ForkResult::Child => {
            drop(reader);
            if let Err(e) = redirect::bind(writer, &[STDOUT_FILENO]) {
                eprintln!("treesh: {}", e);
                process::exit_child(1);
            }
            let status = executor.execute(left, level + 1);
            process::exit_child(status.exit_code());
        }
        ForkResult::Parent { child } => child,
    };

    let right_pid = match process::fork_process() {
        Ok(ForkResult::Child) => {
            drop(writer);
            if let Err(e) = redirect::bind(reader, &[STDIN_FILENO]) {
                eprintln!("treesh: {}", e);
                process::exit_child(1);
            }
            let status = executor.execute(right, level + 1);
            process::exit_child(status.exit_code());
        }
        Ok(ForkResult::Parent { child }) => child,
        Err(e) => {
            drop(reader);
            drop(writer);
            let _ = process::wait(left_pid);
            return Err(e);
        }
    };

    // 父进程必须关闭两端，否则右侧永远读不到 EOF
    drop(reader);
    drop(writer);

    let left_status = process::wait(left_pid);
    let right_status = process::wait(right_pid);
    match left_status {
        Ok(status) => debug!("管道左侧 pid={} 结束: {:?}", left_pid, status),
        Err(e) => warn!("等待管道左侧失败: {}", e),
    }
    right_status
}
