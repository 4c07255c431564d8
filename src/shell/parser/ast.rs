use crate::shell::executor::Environment;

/// 单词的组成片段：字面文本或待展开的变量引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    Literal(String),
    Variable(String),
}

/// 延迟物化的单词，执行时才根据环境表展开为字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    parts: Vec<WordPart>,
}

impl Word {
    pub fn new(parts: Vec<WordPart>) -> Self {
        Self { parts }
    }

    #[cfg(test)]
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![WordPart::Literal(text.into())],
        }
    }

    /// 未设置的变量展开为空字符串
    pub fn materialize(&self, env: &Environment) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                WordPart::Literal(text) => text.clone(),
                WordPart::Variable(name) => env.get(name).unwrap_or_default().to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRedirect {
    pub target: Word,
    pub append: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleCommand {
    pub verb: Word,
    pub arguments: Vec<Word>,
    pub input: Option<Word>,
    pub output: Option<OutputRedirect>,
    pub error: Option<OutputRedirect>,
}

impl SimpleCommand {
    pub fn new(verb: Word) -> Self {
        Self {
            verb,
            ..Default::default()
        }
    }

    /// 动词加参数，按顺序物化为 argv
    pub fn argv(&self, env: &Environment) -> Vec<String> {
        std::iter::once(&self.verb)
            .chain(self.arguments.iter())
            .map(|word| word.materialize(env))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Sequential, // ;
    And,        // &&
    Or,         // ||
    Pipe,       // |
    Parallel,   // &
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNode {
    Leaf(SimpleCommand),
    Binary {
        op: Operator,
        left: Box<CommandNode>,
        right: Box<CommandNode>,
    },
}

impl CommandNode {
    pub fn binary(op: Operator, left: CommandNode, right: CommandNode) -> Self {
        CommandNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// 叶子节点没有操作符
    pub fn op(&self) -> Option<Operator> {
        match self {
            CommandNode::Leaf(_) => None,
            CommandNode::Binary { op, .. } => Some(*op),
        }
    }
}
