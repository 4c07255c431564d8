use colored::Colorize;
use log::{debug, error, warn};
use std::error::Error;

use crate::shell::executor::{Environment, Executor, Status};
use crate::shell::parser::Parser;
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::shell::signals;
use crate::utils::config::Config;
use crate::utils::path::{basename, current_dir};

/// 解析失败时报告的状态
const PARSE_ERROR_STATUS: i32 = 2;

pub struct Shell<'a> {
    config: &'a Config,
    executor: Executor,
    last_status: i32,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            executor: Executor::new(Environment::from_host()),
            last_status: 0,
        }
    }

    /// 最近一次数值状态，作为进程退出码
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// 交互式读取-执行循环，遇到 Terminate 或 EOF 时结束
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("初始化 treesh...");
        signals::ignore_interactive_signals();
        let mut readline = ReadlineManager::new(self.config)?;
        debug!("treesh 准备就绪...");

        loop {
            match readline.readline(&self.prompt()) {
                Ok(line) => {
                    if self.run_line(&line) == Status::Terminate {
                        break;
                    }
                }
                Err(ReadlineError::Eof) => {
                    debug!("接收到 EOF，退出 treesh...");
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    warn!("接收到中断信号...");
                }
                Err(err) => {
                    error!("读取输入失败: {}", err);
                    return Err(err.into());
                }
            }
        }

        debug!("退出 treesh...");
        Ok(())
    }

    /// 解析并执行一行输入
    pub fn run_line(&mut self, line: &str) -> Status {
        let node = match Parser::new(line).parse_command() {
            Ok(Some(node)) => node,
            Ok(None) => return Status::Code(self.last_status),
            Err(e) => {
                eprintln!("treesh: parse error: {}", e);
                self.last_status = PARSE_ERROR_STATUS;
                return Status::Code(PARSE_ERROR_STATUS);
            }
        };

        debug!("执行命令: {}", line.trim());
        let status = self.executor.execute(&node, 0);
        if let Status::Code(code) = status {
            self.last_status = code;
        }
        status
    }

    fn prompt(&self) -> String {
        let user = self.executor.environment().get("USER").unwrap_or("treesh");
        let cwd = current_dir();
        let marker = if self.last_status == 0 {
            "❯".bright_green()
        } else {
            "❯".bright_red()
        };
        format!(
            "{} {} {} ",
            user.bright_cyan(),
            basename(&cwd).bright_blue(),
            marker
        )
    }
}
