use std::env;

use log::{debug, warn};

use super::environment::Environment;
use super::status::Status;

/// 必须在当前进程内执行的内建命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
}

impl Builtin {
    pub fn lookup(verb: &str) -> Option<Self> {
        match verb {
            "cd" => Some(Builtin::Cd),
            "exit" | "quit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    pub fn run(self, args: &[String], env: &mut Environment) -> Status {
        match self {
            Builtin::Cd => builtin_cd(args, env),
            Builtin::Exit => Status::Terminate,
        }
    }
}

/// 无参数时切换到环境表中的 HOME
fn builtin_cd(args: &[String], env: &mut Environment) -> Status {
    let target = match args.first() {
        Some(path) => shellexpand::tilde_with_context(path, || env.get("HOME")).into_owned(),
        None => match env.get("HOME") {
            Some(home) => home.to_string(),
            None => {
                warn!("cd: HOME 未设置");
                return Status::FAILURE;
            }
        },
    };

    let previous = env::current_dir().ok();
    if let Err(e) = env::set_current_dir(&target) {
        debug!("cd {} 失败: {}", target, e);
        return Status::FAILURE;
    }

    if let Some(previous) = previous {
        env.set("OLDPWD", previous.to_string_lossy());
    }
    if let Ok(current) = env::current_dir() {
        env.set("PWD", current.to_string_lossy());
    }
    debug!("切换工作目录: {}", target);
    Status::SUCCESS
}
