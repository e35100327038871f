use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Keyword,
    Name,
    Integer,
}

/// A lexeme cut straight out of the source text.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Byte offset of the first character.
    pub offset: usize,
    pub line: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommandKind {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Call,
    Return,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
}

impl Segment {
    pub fn from_name(name: &str) -> Option<Segment> {
        Some(match name {
            "constant" => Segment::Constant,
            "local" => Segment::Local,
            "argument" => Segment::Argument,
            "this" => Segment::This,
            "that" => Segment::That,
            "pointer" => Segment::Pointer,
            "temp" => Segment::Temp,
            "static" => Segment::Static,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub fn from_mnemonic(mnemonic: &str) -> Option<ArithmeticOp> {
        Some(match mnemonic {
            "add" => ArithmeticOp::Add,
            "sub" => ArithmeticOp::Sub,
            "neg" => ArithmeticOp::Neg,
            "eq" => ArithmeticOp::Eq,
            "gt" => ArithmeticOp::Gt,
            "lt" => ArithmeticOp::Lt,
            "and" => ArithmeticOp::And,
            "or" => ArithmeticOp::Or,
            "not" => ArithmeticOp::Not,
            _ => return None,
        })
    }
}

/// One source line, as scanned. Operands stay as tokens; their meaning is
/// decided by the code generator.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command<'src> {
    kind: CommandKind,
    tokens: Vec<Token<'src>>,
    line: usize,
}

impl<'src> Command<'src> {
    pub(crate) fn new(kind: CommandKind, tokens: Vec<Token<'src>>, line: usize) -> Self {
        Command { kind, tokens, line }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// The leading keyword, e.g. `push` or `add`.
    pub fn keyword(&self) -> &'src str {
        self.tokens.first().map(|t| t.text).unwrap_or_default()
    }

    /// Operand `n`, counting from the token after the keyword.
    pub fn operand(&self, n: usize) -> Option<&'src str> {
        self.tokens.get(n + 1).map(|t| t.text)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.text)?;
        }
        Ok(())
    }
}
