use log::debug;

use super::environment::Environment;
use super::process::ExecError;
use super::status::Status;
use super::{combinator, parallel, pipe, simple};
use crate::shell::parser::ast::{CommandNode, Operator};

pub struct Executor {
    env: Environment,
}

impl Executor {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// 递归执行命令树。`level` 只用于日志，不影响行为。
    ///
    /// 编排进程中的 fork/pipe/wait 失败会打印诊断并以状态 1 返回，
    /// 组合命令的其余部分照常继续。
    pub fn execute(&mut self, node: &CommandNode, level: usize) -> Status {
        match self.dispatch(node, level) {
            Ok(status) => status,
            Err(e) => {
                debug!("执行失败: {}", e);
                eprintln!("treesh: {}", e);
                Status::FAILURE
            }
        }
    }

    fn dispatch(&mut self, node: &CommandNode, level: usize) -> Result<Status, ExecError> {
        debug!("[level {}] 执行节点 op={:?}", level, node.op());
        match node {
            CommandNode::Leaf(command) => simple::run(command, &mut self.env),
            CommandNode::Binary { op, left, right } => match op {
                Operator::Sequential => Ok(combinator::sequential(self, left, right, level)),
                Operator::And => Ok(combinator::and(self, left, right, level)),
                Operator::Or => Ok(combinator::or(self, left, right, level)),
                Operator::Pipe => pipe::run(self, left, right, level),
                Operator::Parallel => parallel::run(self, left, right, level),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::parser::ast::{OutputRedirect, SimpleCommand, Word};

    fn leaf(verb: &str) -> CommandNode {
        CommandNode::Leaf(SimpleCommand::new(Word::literal(verb)))
    }

    // 以下用例只涉及不 fork 的叶子节点
    #[test]
    fn test_assignments_visible_to_siblings() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::Sequential, leaf("A=1"), leaf("B=2"));
        assert_eq!(executor.execute(&tree, 0), Status::SUCCESS);
        assert_eq!(executor.environment().get("A"), Some("1"));
        assert_eq!(executor.environment().get("B"), Some("2"));
    }

    #[test]
    fn test_terminate_short_circuits_sequence() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::Sequential, leaf("exit"), leaf("X=1"));
        assert_eq!(executor.execute(&tree, 0), Status::Terminate);
        assert_eq!(executor.environment().get("X"), None);
    }

    #[test]
    fn test_terminate_passes_through_conditionals() {
        let mut executor = Executor::new(Environment::default());
        let and = CommandNode::binary(Operator::And, leaf("quit"), leaf("X=1"));
        assert_eq!(executor.execute(&and, 0), Status::Terminate);
        let or = CommandNode::binary(Operator::Or, leaf("exit"), leaf("X=1"));
        assert_eq!(executor.execute(&or, 0), Status::Terminate);
        assert_eq!(executor.environment().get("X"), None);
    }

    #[test]
    fn test_terminate_on_right_side_propagates() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::And, leaf("X=1"), leaf("exit"));
        assert_eq!(executor.execute(&tree, 0), Status::Terminate);
        assert_eq!(executor.environment().get("X"), Some("1"));
    }

    #[test]
    fn test_or_skips_right_after_success() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::Or, leaf("X=1"), leaf("Y=2"));
        assert_eq!(executor.execute(&tree, 0), Status::SUCCESS);
        assert_eq!(executor.environment().get("Y"), None);
    }

    #[test]
    fn test_and_runs_right_after_success() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::And, leaf("X=1"), leaf("Y=2"));
        assert_eq!(executor.execute(&tree, 0), Status::SUCCESS);
        assert_eq!(executor.environment().get("Y"), Some("2"));
    }

    #[test]
    fn test_and_returns_left_failure() {
        let mut executor = Executor::new(Environment::default());
        // 没有 HOME 的 cd 失败，且不 fork
        let tree = CommandNode::binary(Operator::And, leaf("cd"), leaf("Y=2"));
        assert_eq!(executor.execute(&tree, 0), Status::FAILURE);
        assert_eq!(executor.environment().get("Y"), None);
    }

    #[test]
    fn test_or_runs_right_after_failure() {
        let mut executor = Executor::new(Environment::default());
        let tree = CommandNode::binary(Operator::Or, leaf("cd"), leaf("Y=2"));
        assert_eq!(executor.execute(&tree, 0), Status::SUCCESS);
        assert_eq!(executor.environment().get("Y"), Some("2"));
    }

    fn command(words: &[&str]) -> CommandNode {
        let mut command = SimpleCommand::new(Word::literal(words[0]));
        command.arguments = words[1..].iter().map(|w| Word::literal(*w)).collect();
        CommandNode::Leaf(command)
    }

    fn open_fds() -> usize {
        std::fs::read_dir("/proc/self/fd").map_or(0, |dir| dir.count())
    }

    const PIPE_OUTPUT_VAR: &str = "TREESH_TEST_PIPE_OUTPUT";

    // 真正会 fork 的部分在重新启动的测试进程里单线程运行
    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_compound_left_side_of_pipe() {
        if let Ok(path) = std::env::var(PIPE_OUTPUT_VAR) {
            let mut wc = SimpleCommand::new(Word::literal("wc"));
            wc.arguments.push(Word::literal("-l"));
            wc.output = Some(OutputRedirect {
                target: Word::literal(path),
                append: false,
            });
            let left = CommandNode::binary(
                Operator::Sequential,
                command(&["echo", "a"]),
                command(&["echo", "b"]),
            );
            let tree = CommandNode::binary(Operator::Pipe, left, CommandNode::Leaf(wc));

            let before = open_fds();
            let mut executor = Executor::new(Environment::from_host());
            assert_eq!(executor.execute(&tree, 0), Status::SUCCESS);
            // 写端未关闭时 wc 读不到 EOF，上面的调用不会返回
            assert_eq!(open_fds(), before);
            return;
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("count.txt");
        let output = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "shell::executor::executor::tests::test_compound_left_side_of_pipe",
                "--test-threads=1",
            ])
            .env(PIPE_OUTPUT_VAR, &path)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stdout)
        );
        let count = std::fs::read_to_string(&path).unwrap();
        assert_eq!(count.trim(), "2");
    }
}
