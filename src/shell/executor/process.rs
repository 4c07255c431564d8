use std::io::{self, Write};

use log::debug;
use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{fork, ForkResult, Pid};
use thiserror::Error;

use super::executor::Executor;
use super::status::Status;
use crate::shell::parser::ast::CommandNode;
use crate::shell::signals;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("fork failed: {0}")]
    Fork(Errno),
    #[error("pipe failed: {0}")]
    Pipe(Errno),
    #[error("dup2 failed: {0}")]
    Dup(Errno),
    #[error("waitpid failed for pid {pid}: {source}")]
    Wait { pid: Pid, source: Errno },
    #[error("{path}: {source}")]
    Redirect { path: String, source: io::Error },
}

/// fork 之前刷新标准输出/错误，避免缓冲内容在子进程中重复写出
fn flush_std() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

pub fn fork_process() -> Result<ForkResult, ExecError> {
    flush_std();
    // SAFETY: 子进程只执行本 crate 的命令树，随后 exec 或 exit
    let result = unsafe { fork() }.map_err(ExecError::Fork)?;
    if let ForkResult::Child = result {
        signals::restore_default_signals();
    }
    Ok(result)
}

/// 子进程退出，不返回调用方
pub fn exit_child(code: i32) -> ! {
    flush_std();
    // SAFETY: 缓冲已刷新；子进程不运行父进程注册的 atexit 处理
    unsafe { libc::_exit(code) }
}

/// 在新进程中完整执行子树，以其状态作为退出码
pub fn spawn_branch(
    executor: &mut Executor,
    node: &CommandNode,
    level: usize,
) -> Result<Pid, ExecError> {
    match fork_process()? {
        ForkResult::Child => {
            let status = executor.execute(node, level + 1);
            exit_child(status.exit_code());
        }
        ForkResult::Parent { child } => {
            debug!("派生分支进程 pid={} op={:?}", child, node.op());
            Ok(child)
        }
    }
}

/// 阻塞等待指定子进程终止
pub fn wait(pid: Pid) -> Result<Status, ExecError> {
    loop {
        match waitpid(pid, None) {
            Ok(ws) => {
                debug!("子进程结束: {:?}", ws);
                return Ok(Status::from_wait(ws));
            }
            Err(Errno::EINTR) => continue,
            Err(source) => return Err(ExecError::Wait { pid, source }),
        }
    }
}
