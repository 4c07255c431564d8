use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;

use super::environment::Environment;
use super::process::ExecError;
use crate::shell::parser::ast::{OutputRedirect, SimpleCommand};

/// rw-r--r--
const REDIRECT_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Truncate,
    Append,
}

impl Access {
    fn write(append: bool) -> Self {
        if append {
            Access::Append
        } else {
            Access::Truncate
        }
    }
}

/// 一次打开，dup 到一个或多个标准描述符上
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub path: String,
    pub access: Access,
    pub targets: Vec<RawFd>,
}

/// 输出与错误指向同一路径时只打开一次，使用输出重定向的追加标志
pub fn plan(command: &SimpleCommand, env: &Environment) -> Vec<Binding> {
    let mut bindings = Vec::new();

    if let Some(input) = &command.input {
        bindings.push(Binding {
            path: input.materialize(env),
            access: Access::Read,
            targets: vec![STDIN_FILENO],
        });
    }

    let resolve = |redirect: &Option<OutputRedirect>| {
        redirect
            .as_ref()
            .map(|r| (r.target.materialize(env), Access::write(r.append)))
    };

    match (resolve(&command.output), resolve(&command.error)) {
        (Some((out, access)), Some((err, _))) if out == err => bindings.push(Binding {
            path: out,
            access,
            targets: vec![STDOUT_FILENO, STDERR_FILENO],
        }),
        (output, error) => {
            if let Some((path, access)) = output {
                bindings.push(Binding {
                    path,
                    access,
                    targets: vec![STDOUT_FILENO],
                });
            }
            if let Some((path, access)) = error {
                bindings.push(Binding {
                    path,
                    access,
                    targets: vec![STDERR_FILENO],
                });
            }
        }
    }

    bindings
}

fn open(binding: &Binding) -> Result<File, ExecError> {
    let mut options = OpenOptions::new();
    match binding.access {
        Access::Read => options.read(true),
        Access::Truncate => options
            .write(true)
            .create(true)
            .truncate(true)
            .mode(REDIRECT_MODE),
        Access::Append => options.append(true).create(true).mode(REDIRECT_MODE),
    };
    options
        .open(&binding.path)
        .map_err(|source| ExecError::Redirect {
            path: binding.path.clone(),
            source,
        })
}

/// 把 fd 复制到各目标描述符，然后关闭原始 fd
pub fn bind(fd: OwnedFd, targets: &[RawFd]) -> Result<(), ExecError> {
    let raw = fd.as_raw_fd();
    for &target in targets {
        if target != raw {
            dup2(raw, target).map_err(ExecError::Dup)?;
        }
    }
    if targets.contains(&raw) {
        // 原始 fd 恰好就是目标描述符，不能关闭
        let _ = fd.into_raw_fd();
    }
    Ok(())
}

/// 仅在子进程中调用
pub fn apply(bindings: &[Binding]) -> Result<(), ExecError> {
    for binding in bindings {
        let file = open(binding)?;
        bind(OwnedFd::from(file), &binding.targets)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::parser::ast::{Word, WordPart};

    fn redirect(path: &str, append: bool) -> Option<OutputRedirect> {
        Some(OutputRedirect {
            target: Word::literal(path),
            append,
        })
    }

    #[test]
    fn test_input_binding() {
        let mut command = SimpleCommand::new(Word::literal("wc"));
        command.input = Some(Word::literal("in.txt"));
        assert_eq!(
            plan(&command, &Environment::default()),
            vec![Binding {
                path: "in.txt".to_string(),
                access: Access::Read,
                targets: vec![STDIN_FILENO],
            }]
        );
    }

    #[test]
    fn test_same_target_opened_once() {
        let mut command = SimpleCommand::new(Word::literal("make"));
        command.output = redirect("build.log", false);
        command.error = redirect("build.log", true);
        assert_eq!(
            plan(&command, &Environment::default()),
            vec![Binding {
                path: "build.log".to_string(),
                access: Access::Truncate,
                targets: vec![STDOUT_FILENO, STDERR_FILENO],
            }]
        );
    }

    #[test]
    fn test_same_target_after_materialize() {
        let mut env = Environment::default();
        env.set("LOG", "run.log");
        let mut command = SimpleCommand::new(Word::literal("make"));
        command.output = redirect("run.log", true);
        command.error = Some(OutputRedirect {
            target: Word::new(vec![WordPart::Variable("LOG".to_string())]),
            append: true,
        });
        let bindings = plan(&command, &env);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].access, Access::Append);
    }

    #[test]
    fn test_independent_append_flags() {
        let mut command = SimpleCommand::new(Word::literal("job"));
        command.output = redirect("out.log", true);
        command.error = redirect("err.log", false);
        assert_eq!(
            plan(&command, &Environment::default()),
            vec![
                Binding {
                    path: "out.log".to_string(),
                    access: Access::Append,
                    targets: vec![STDOUT_FILENO],
                },
                Binding {
                    path: "err.log".to_string(),
                    access: Access::Truncate,
                    targets: vec![STDERR_FILENO],
                },
            ]
        );
    }

    #[test]
    fn test_no_redirections() {
        let command = SimpleCommand::new(Word::literal("true"));
        assert!(plan(&command, &Environment::default()).is_empty());
    }
}
