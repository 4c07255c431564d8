use log::debug;
use std::env;
use std::error::Error;

use crate::shell::Shell;
use crate::utils::config::Config;
use crate::utils::log::init_logger;

mod shell;
mod utils;

fn usage() -> String {
    format!("usage: {} [-c command]", env!("CARGO_PKG_NAME"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::new();
    init_logger(&config);
    debug!("配置加载成功 {}", config.logger_dir.display());

    let mut args = env::args().skip(1);
    let mut shell = Shell::new(&config);

    match args.next().as_deref() {
        None => shell.run()?,
        Some("-c") => {
            let line = args.next().ok_or_else(usage)?;
            shell.run_line(&line);
        }
        Some(other) => {
            eprintln!("{}: unknown argument: {}", config.name, other);
            return Err(usage().into());
        }
    }

    // 退出码截断到 0..=255，被信号终止的哨兵 -1 变为 255
    std::process::exit(shell.last_status() & 0xff)
}
