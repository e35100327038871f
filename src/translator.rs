use crate::ast::{ArithmeticOp, Command, CommandKind, Segment};
use crate::error::GenerationError;
use crate::fragment::{self, FRAME_SIZE};
use crate::register::{Register, MAX_IMMEDIATE};

/// Return label used by the bootstrap call; no call site has a bare number
/// for a disambiguator, so it cannot clash.
fn bootstrap_return_label(entry: &str) -> String {
    format!("{}$ret.0", entry)
}

/// Prologue setting up the stack and calling `entry` with no arguments.
pub fn bootstrap(entry: &str) -> Vec<String> {
    [
        svec![format!("// bootstrap: call {}", entry)],
        fragment::bootstrap(entry, &bootstrap_return_label(entry)),
    ]
    .concat()
}

/// Maps commands of one source file onto assembly.
///
/// Output depends only on the command and the file name: the file name
/// namespaces `static` cells, and file name plus source line make generated
/// labels unique across a whole program.
pub struct Translator<'a> {
    file: &'a str,
}

impl<'a> Translator<'a> {
    pub fn new(file: &'a str) -> Self {
        Translator { file }
    }

    fn call_site(&self, command: &Command) -> String {
        format!("{}.{}", self.file, command.line())
    }

    fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.file, index)
    }

    fn operand<'src>(command: &Command<'src>, n: usize) -> Result<&'src str, GenerationError> {
        command
            .operand(n)
            .ok_or_else(|| GenerationError::MissingOperand {
                keyword: command.keyword().to_string(),
                line: command.line(),
            })
    }

    fn count(command: &Command) -> Result<u16, GenerationError> {
        let text = Self::operand(command, 1)?;
        text.parse().map_err(|_| GenerationError::InvalidIndex {
            segment: "count",
            index: text.to_string(),
            line: command.line(),
        })
    }

    fn segment_ref(command: &Command) -> Result<(Segment, u16), GenerationError> {
        let name = Self::operand(command, 0)?;
        let segment = Segment::from_name(name).ok_or_else(|| GenerationError::UnknownSegment {
            segment: name.to_string(),
            line: command.line(),
        })?;
        let text = Self::operand(command, 1)?;
        let invalid = || GenerationError::InvalidIndex {
            segment: segment.name(),
            index: text.to_string(),
            line: command.line(),
        };
        let index: u16 = text.parse().map_err(|_| invalid())?;
        // constants and base-pointer offsets end up in an A-instruction
        let immediate = segment == Segment::Constant || Self::base_pointer(segment).is_some();
        if immediate && index > MAX_IMMEDIATE {
            return Err(invalid());
        }
        Ok((segment, index))
    }

    /// Registers addressed directly rather than through a base pointer.
    fn direct(&self, segment: Segment, index: u16, line: usize) -> Result<String, GenerationError> {
        let register = match segment {
            Segment::Static => return Ok(self.static_symbol(index)),
            Segment::Pointer => Register::pointer(index),
            Segment::Temp => Register::temp(index),
            _ => None,
        };
        register
            .map(|r| r.symbol())
            .ok_or_else(|| GenerationError::InvalidIndex {
                segment: segment.name(),
                index: index.to_string(),
                line,
            })
    }

    fn base_pointer(segment: Segment) -> Option<Register> {
        match segment {
            Segment::Local => Some(Register::Lcl),
            Segment::Argument => Some(Register::Arg),
            Segment::This => Some(Register::This),
            Segment::That => Some(Register::That),
            _ => None,
        }
    }

    fn push(&self, command: &Command) -> Result<Vec<String>, GenerationError> {
        let (segment, index) = Self::segment_ref(command)?;
        let load = if segment == Segment::Constant {
            fragment::load_constant(index)
        } else if let Some(base) = Self::base_pointer(segment) {
            fragment::read_segment(base, i32::from(index))
        } else {
            fragment::read_to_d(self.direct(segment, index, command.line())?)
        };
        Ok([load, fragment::push_d()].concat())
    }

    fn pop(&self, command: &Command) -> Result<Vec<String>, GenerationError> {
        let (segment, index) = Self::segment_ref(command)?;
        if segment == Segment::Constant {
            return Err(GenerationError::PopConstant {
                line: command.line(),
            });
        }
        Ok(match Self::base_pointer(segment) {
            Some(base) => fragment::pop_segment(base, i32::from(index)),
            None => fragment::pop_into(self.direct(segment, index, command.line())?),
        })
    }

    fn arithmetic(&self, command: &Command) -> Result<Vec<String>, GenerationError> {
        let mnemonic = command.keyword();
        let op = ArithmeticOp::from_mnemonic(mnemonic).ok_or_else(|| {
            GenerationError::UnknownArithmetic {
                mnemonic: mnemonic.to_string(),
                line: command.line(),
            }
        })?;
        Ok(match op {
            ArithmeticOp::Neg => fragment::unary_op("-M"),
            ArithmeticOp::Not => fragment::unary_op("!M"),
            ArithmeticOp::Add => fragment::binary_op("D+M"),
            ArithmeticOp::Sub => fragment::binary_op("M-D"),
            ArithmeticOp::And => fragment::binary_op("D&M"),
            ArithmeticOp::Or => fragment::binary_op("D|M"),
            ArithmeticOp::Eq => self.compare(command, "EQ"),
            ArithmeticOp::Gt => self.compare(command, "GT"),
            ArithmeticOp::Lt => self.compare(command, "LT"),
        })
    }

    fn compare(&self, command: &Command, op: &str) -> Vec<String> {
        let end_label = format!("{}_END.{}", op, self.call_site(command));
        fragment::compare(&format!("J{}", op), &end_label)
    }

    fn call(&self, command: &Command) -> Result<Vec<String>, GenerationError> {
        let callee = Self::operand(command, 0)?;
        let n_args = Self::count(command)?;
        if FRAME_SIZE + i32::from(n_args) > i32::from(MAX_IMMEDIATE) {
            return Err(GenerationError::InvalidIndex {
                segment: "count",
                index: n_args.to_string(),
                line: command.line(),
            });
        }
        let return_label = format!("{}$ret.{}", callee, self.call_site(command));
        Ok(fragment::call(callee, n_args, &return_label))
    }

    /// Translate one command, prefixed with a comment echoing the source.
    pub fn translate(&self, command: &Command) -> Result<Vec<String>, GenerationError> {
        let body = match command.kind() {
            CommandKind::Arithmetic => self.arithmetic(command)?,
            CommandKind::Push => self.push(command)?,
            CommandKind::Pop => self.pop(command)?,
            CommandKind::Label => fragment::label(Self::operand(command, 0)?),
            CommandKind::Goto => fragment::goto(Self::operand(command, 0)?),
            CommandKind::IfGoto => fragment::if_goto(Self::operand(command, 0)?),
            CommandKind::Function => {
                fragment::function(Self::operand(command, 0)?, Self::count(command)?)
            }
            CommandKind::Call => self.call(command)?,
            CommandKind::Return => fragment::ret(),
        };
        Ok([svec![format!("// {}", command)], body].concat())
    }

    pub fn translate_all(&self, commands: &[Command]) -> Result<Vec<String>, GenerationError> {
        let mut instructions = vec![];
        for command in commands {
            instructions.extend(self.translate(command)?);
        }
        Ok(instructions)
    }
}
