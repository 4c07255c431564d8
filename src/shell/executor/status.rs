use nix::sys::wait::WaitStatus;

/// 子进程被信号终止时报告的哨兵值，不会与任何合法退出码冲突
pub const SIGNALED_STATUS: i32 = -1;

/// 命令执行结果：普通退出码，或要求结束会话的 Terminate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Code(i32),
    Terminate,
}

impl Status {
    pub const SUCCESS: Status = Status::Code(0);
    pub const FAILURE: Status = Status::Code(1);

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Code(0))
    }

    /// fork 出的分支进程以此值退出；分支内的 Terminate 只结束该分支自身
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Code(code) => *code,
            Status::Terminate => 0,
        }
    }

    pub fn from_wait(status: WaitStatus) -> Status {
        match status {
            WaitStatus::Exited(_, code) => Status::Code(code),
            _ => Status::Code(SIGNALED_STATUS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal;
    use nix::unistd::Pid;

    #[test]
    fn test_success() {
        assert!(Status::SUCCESS.is_success());
        assert!(!Status::Code(3).is_success());
        assert!(!Status::Terminate.is_success());
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(Status::Code(42).exit_code(), 42);
        assert_eq!(Status::Terminate.exit_code(), 0);
    }

    #[test]
    fn test_from_wait() {
        let pid = Pid::from_raw(1234);
        assert_eq!(
            Status::from_wait(WaitStatus::Exited(pid, 7)),
            Status::Code(7)
        );
        assert_eq!(
            Status::from_wait(WaitStatus::Signaled(pid, Signal::SIGKILL, false)),
            Status::Code(SIGNALED_STATUS)
        );
    }
}
