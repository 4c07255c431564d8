use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use nix::sys::signal::{signal, SigHandler, Signal};

static IGNORING: AtomicBool = AtomicBool::new(false);

const INTERACTIVE_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGQUIT];

/// 交互模式下 shell 自身忽略 Ctrl-C / Ctrl-\，交给前台子进程处理
pub fn ignore_interactive_signals() {
    for sig in INTERACTIVE_SIGNALS {
        // SAFETY: 只设置为 SIG_IGN，不安装自定义处理函数
        if let Err(e) = unsafe { signal(sig, SigHandler::SigIgn) } {
            warn!("无法忽略信号 {}: {}", sig, e);
            return;
        }
    }
    IGNORING.store(true, Ordering::SeqCst);
    debug!("已忽略交互信号");
}

/// fork 后在子进程中调用，使外部命令恢复默认的信号处理
pub fn restore_default_signals() {
    if !IGNORING.load(Ordering::SeqCst) {
        return;
    }
    for sig in INTERACTIVE_SIGNALS {
        // SAFETY: 恢复为 SIG_DFL
        let _ = unsafe { signal(sig, SigHandler::SigDfl) };
    }
}
