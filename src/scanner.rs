//! Line-oriented scanner for VM source.
//!
//! The scanner is a small state machine: [`State::Line`] skips blank lines and
//! comments, looks the leading keyword up in [`DISPATCH`] and hands over to the
//! sub-state for that command category. Every command-producing state ends in
//! [`State::LineEnd`], which only accepts blanks, a trailing comment and the
//! line terminator. Individual tokens are recognised with `nom`.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit1, line_ending, multispace0, not_line_ending, space0, space1},
    combinator::{eof, recognize, verify},
    sequence::pair,
    IResult,
};

use crate::ast::{Command, CommandKind, Token, TokenKind};
use crate::error::{ScanError, ScanErrorKind};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum State {
    Line,
    Arithmetic,
    Memory(CommandKind),
    Branch(CommandKind),
    Function(CommandKind),
    Return,
    LineEnd,
    Done,
}

const DISPATCH: &[(&str, State)] = &[
    ("add", State::Arithmetic),
    ("sub", State::Arithmetic),
    ("neg", State::Arithmetic),
    ("eq", State::Arithmetic),
    ("gt", State::Arithmetic),
    ("lt", State::Arithmetic),
    ("and", State::Arithmetic),
    ("or", State::Arithmetic),
    ("not", State::Arithmetic),
    ("push", State::Memory(CommandKind::Push)),
    ("pop", State::Memory(CommandKind::Pop)),
    ("label", State::Branch(CommandKind::Label)),
    ("goto", State::Branch(CommandKind::Goto)),
    ("if-goto", State::Branch(CommandKind::IfGoto)),
    ("function", State::Function(CommandKind::Function)),
    ("call", State::Function(CommandKind::Call)),
    ("return", State::Return),
];

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '-')(input)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

fn name(input: &str) -> IResult<&str, &str> {
    verify(take_while1(is_name_char), |sym: &str| {
        !sym.starts_with(|c: char| c.is_ascii_digit())
    })(input)
}

fn segment(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

fn line_end(input: &str) -> IResult<&str, &str> {
    alt((line_ending, eof))(input)
}

/// Scan a whole source file into commands, stopping at the first error.
pub fn scan(source: &str) -> Result<Vec<Command<'_>>, ScanError> {
    Scanner::new(source).run()
}

pub struct Scanner<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    line_start: usize,
    tokens: Vec<Token<'src>>,
    commands: Vec<Command<'src>>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            tokens: vec![],
            commands: vec![],
        }
    }

    pub fn run(mut self) -> Result<Vec<Command<'src>>, ScanError> {
        let mut state = State::Line;
        while state != State::Done {
            state = self.step(state)?;
        }
        Ok(self.commands)
    }

    fn step(&mut self, state: State) -> Result<State, ScanError> {
        match state {
            State::Line => self.lex_line(),
            State::Arithmetic => Ok(self.emit(CommandKind::Arithmetic)),
            State::Memory(kind) => self.lex_memory(kind),
            State::Branch(kind) => self.lex_branch(kind),
            State::Function(kind) => self.lex_function(kind),
            State::Return => Ok(self.emit(CommandKind::Return)),
            State::LineEnd => self.lex_line_end(),
            State::Done => Ok(State::Done),
        }
    }

    fn lex_line(&mut self) -> Result<State, ScanError> {
        loop {
            self.eat(multispace0);
            if self.rest().is_empty() {
                return Ok(State::Done);
            }
            if self.eat(comment).is_none() {
                break;
            }
        }

        if self.rest().starts_with('/') {
            self.advance(1);
            return Err(self.unexpected("'/' to start a comment"));
        }

        let (offset, line, column) = (self.pos, self.line, self.column());
        let Some(word) = self.eat(keyword) else {
            return Err(self.unexpected("a command"));
        };
        let next = DISPATCH
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|(_, state)| *state)
            .ok_or_else(|| ScanError {
                line,
                column,
                kind: ScanErrorKind::UnknownCommand(word.to_string()),
            })?;

        self.tokens.push(Token {
            kind: TokenKind::Keyword,
            text: word,
            offset,
            line,
        });
        Ok(next)
    }

    fn lex_memory(&mut self, kind: CommandKind) -> Result<State, ScanError> {
        self.separator()?;
        self.expect(TokenKind::Name, segment, "a segment name")?;
        self.separator()?;
        self.expect(TokenKind::Integer, digit1, "a non-negative index")?;
        Ok(self.emit(kind))
    }

    fn lex_branch(&mut self, kind: CommandKind) -> Result<State, ScanError> {
        self.separator()?;
        self.expect(TokenKind::Name, name, "a label name")?;
        Ok(self.emit(kind))
    }

    fn lex_function(&mut self, kind: CommandKind) -> Result<State, ScanError> {
        self.separator()?;
        self.expect(TokenKind::Name, name, "a function name")?;
        self.separator()?;
        self.expect(TokenKind::Integer, digit1, "a count")?;
        Ok(self.emit(kind))
    }

    fn lex_line_end(&mut self) -> Result<State, ScanError> {
        self.eat(space0);
        self.eat(comment);
        if self.eat(line_end).is_some() {
            Ok(State::Line)
        } else {
            Err(self.error(ScanErrorKind::TrailingContent(self.found())))
        }
    }

    fn emit(&mut self, kind: CommandKind) -> State {
        let tokens = std::mem::take(&mut self.tokens);
        let line = tokens.first().map_or(self.line, |t| t.line);
        self.commands.push(Command::new(kind, tokens, line));
        State::LineEnd
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.pos..self.pos + len];
        for (i, c) in consumed.char_indices() {
            if c == '\n' {
                self.line += 1;
                self.line_start = self.pos + i + 1;
            }
        }
        self.pos += len;
    }

    /// Run `parser` at the current position, consuming its input on success.
    fn eat<O>(&mut self, mut parser: impl FnMut(&'src str) -> IResult<&'src str, O>) -> Option<O> {
        let input = self.rest();
        let (rest, out) = parser(input).ok()?;
        self.advance(input.len() - rest.len());
        Some(out)
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        parser: impl FnMut(&'src str) -> IResult<&'src str, &'src str>,
        expected: &'static str,
    ) -> Result<(), ScanError> {
        let (offset, line) = (self.pos, self.line);
        let text = self.eat(parser).ok_or_else(|| self.unexpected(expected))?;
        self.tokens.push(Token {
            kind,
            text,
            offset,
            line,
        });
        Ok(())
    }

    fn separator(&mut self) -> Result<(), ScanError> {
        self.eat(space1)
            .map(|_| ())
            .ok_or_else(|| self.unexpected("whitespace"))
    }

    fn column(&self) -> usize {
        self.source[self.line_start..self.pos].chars().count() + 1
    }

    fn found(&self) -> String {
        match self.rest().chars().next() {
            None => "end of input".to_string(),
            Some('\r' | '\n') => "end of line".to_string(),
            Some(c) => format!("'{c}'"),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ScanError {
        self.error(ScanErrorKind::UnexpectedInput {
            expected,
            found: self.found(),
        })
    }

    fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError {
            line: self.line,
            column: self.column(),
            kind,
        }
    }
}
