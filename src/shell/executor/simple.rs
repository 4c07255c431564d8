use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

use log::debug;
use nix::errno::Errno;
use nix::unistd::{execve, ForkResult};

use super::builtin::Builtin;
use super::environment::Environment;
use super::process::{self, ExecError};
use super::redirect::{self, Binding};
use super::status::Status;
use crate::shell::parser::ast::SimpleCommand;
use crate::utils::path::find_file_in_path;

const EXIT_NOT_EXECUTABLE: i32 = 126;
const EXIT_NOT_FOUND: i32 = 127;

/// 依次判断：环境变量赋值、内建命令、外部命令
pub fn run(command: &SimpleCommand, env: &mut Environment) -> Result<Status, ExecError> {
    let verb = command.verb.materialize(env);

    if let Some((name, value)) = Environment::parse_assignment(&verb) {
        debug!("设置环境变量: {}={}", name, value);
        env.set(name, value);
        return Ok(Status::SUCCESS);
    }

    let argv = command.argv(env);
    if let Some(builtin) = Builtin::lookup(&verb) {
        debug!("执行内建命令: {:?} {:?}", builtin, &argv[1..]);
        return Ok(builtin.run(&argv[1..], env));
    }

    run_external(command, argv, env)
}

fn run_external(
    command: &SimpleCommand,
    argv: Vec<String>,
    env: &Environment,
) -> Result<Status, ExecError> {
    let bindings = redirect::plan(command, env);

    match process::fork_process()? {
        ForkResult::Child => {
            let code = exec_child(&argv, &bindings, env);
            process::exit_child(code);
        }
        ForkResult::Parent { child } => {
            debug!("执行外部命令: {:?} pid={}", argv, child);
            process::wait(child)
        }
    }
}

/// 只有 exec 失败时才会返回，返回值即子进程退出码
fn exec_child(argv: &[String], bindings: &[Binding], env: &Environment) -> i32 {
    let name = argv.first().map(String::as_str).unwrap_or_default();

    if let Err(e) = redirect::apply(bindings) {
        eprintln!("treesh: {}", e);
        return 1;
    }

    let args = match argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(args) => args,
        Err(_) => {
            eprintln!("treesh: {}: argument contains a NUL byte", name);
            return EXIT_NOT_EXECUTABLE;
        }
    };
    // 按会话环境表中的 PATH 查找，而不是本进程的 PATH
    let Some(program) = find_file_in_path(name, env.get("PATH")) else {
        eprintln!("treesh: {}: command not found", name);
        return EXIT_NOT_FOUND;
    };
    let Ok(program) = CString::new(program.as_os_str().as_bytes()) else {
        return EXIT_NOT_FOUND;
    };

    let err = match execve(&program, &args, &env.to_envp()) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    match err {
        Errno::ENOENT => {
            eprintln!("treesh: {}: command not found", name);
            EXIT_NOT_FOUND
        }
        e => {
            eprintln!("treesh: {}: {}", name, e.desc());
            EXIT_NOT_EXECUTABLE
        }
    }
}
