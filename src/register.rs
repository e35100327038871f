//! The fixed registers of the target machine.
//!
//! RAM[0..16] is a small closed address space shared by every translated
//! program. Generated code refers to these cells by symbol; the addresses are
//! kept here so the rest of the crate never spells them out.

use std::fmt;

/// First RAM cell the stack may occupy.
pub const STACK_BASE: u16 = 256;

/// First cell of the `temp` segment (`R5`).
pub const TEMP_BASE: u16 = 5;

/// Number of cells in the `temp` segment.
pub const TEMP_SIZE: u16 = 8;

/// Largest value an A-instruction can load; bit 15 selects C-instructions.
pub const MAX_IMMEDIATE: u16 = 0x7fff;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Register {
    /// Stack pointer, one past the top of stack.
    Sp,
    /// Base of the `local` segment.
    Lcl,
    /// Base of the `argument` segment.
    Arg,
    /// Base of the `this` segment, also `pointer 0`.
    This,
    /// Base of the `that` segment, also `pointer 1`.
    That,
    /// `temp i`, checked against [`TEMP_SIZE`] by [`Register::temp`].
    Temp(u16),
    /// Scratch: holds a value while its destination address is computed.
    CopyValue,
    /// Scratch: holds a computed destination address.
    CopyAddress,
    /// Scratch: return address captured during `return`.
    ReturnAddress,
}

impl Register {
    pub fn temp(index: u16) -> Option<Register> {
        (index < TEMP_SIZE).then_some(Register::Temp(index))
    }

    /// `pointer 0` and `pointer 1` alias the `this`/`that` base pointers.
    pub fn pointer(index: u16) -> Option<Register> {
        match index {
            0 => Some(Register::This),
            1 => Some(Register::That),
            _ => None,
        }
    }

    pub fn address(self) -> u16 {
        match self {
            Register::Sp => 0,
            Register::Lcl => 1,
            Register::Arg => 2,
            Register::This => 3,
            Register::That => 4,
            Register::Temp(i) => TEMP_BASE + i,
            Register::CopyValue => 13,
            Register::CopyAddress => 14,
            Register::ReturnAddress => 15,
        }
    }

    /// Symbol understood by the downstream assembler.
    pub fn symbol(self) -> String {
        match self {
            Register::Sp => "SP".to_string(),
            Register::Lcl => "LCL".to_string(),
            Register::Arg => "ARG".to_string(),
            Register::This => "THIS".to_string(),
            Register::That => "THAT".to_string(),
            other => format!("R{}", other.address()),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_block_bounds() {
        assert_eq!(Register::temp(0).map(Register::symbol).as_deref(), Some("R5"));
        assert_eq!(Register::temp(7).map(Register::symbol).as_deref(), Some("R12"));
        assert_eq!(Register::temp(8), None);
    }

    #[test]
    fn scratch_registers_follow_temp_block() {
        let scratch = [
            Register::CopyValue,
            Register::CopyAddress,
            Register::ReturnAddress,
        ];
        for r in scratch {
            assert!(r.address() >= TEMP_BASE + TEMP_SIZE);
            assert!(r.address() < 16);
        }
        assert_eq!(Register::ReturnAddress.symbol(), "R15");
    }

    #[test]
    fn pointer_aliases() {
        assert_eq!(Register::pointer(0), Some(Register::This));
        assert_eq!(Register::pointer(1), Some(Register::That));
        assert_eq!(Register::pointer(2), None);
    }
}
