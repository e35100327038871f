//! Canonical instruction sequences the code generator is assembled from.
//!
//! Every builder is a pure function returning assembly lines. Conventions
//! shared by all of them: `SP` points one past the top of stack, `D` is the
//! working register, and `R13`/`R14` may be clobbered freely.

use std::fmt::Display;

use crate::register::{Register, STACK_BASE};

/// Saved caller state: return address plus these four pointers, pushed in
/// this order by [`call`] and restored in reverse by [`ret`].
pub const SAVED_POINTERS: [Register; 4] = [
    Register::Lcl,
    Register::Arg,
    Register::This,
    Register::That,
];

/// Cells pushed by a call site on top of the arguments.
pub const FRAME_SIZE: i32 = 5;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Dest {
    A,
    D,
}

impl Dest {
    fn name(self) -> &'static str {
        match self {
            Dest::A => "A",
            Dest::D => "D",
        }
    }
}

fn at(symbol: impl Display) -> String {
    format!("@{}", symbol)
}

/// `D = value`
pub fn load_constant(value: u16) -> Vec<String> {
    svec![at(value), "D=A"]
}

/// `dest = RAM[base] + offset`
pub fn load_address(base: Register, offset: i32, dest: Dest) -> Vec<String> {
    let dest = dest.name();
    let sign = if offset < 0 { '-' } else { '+' };
    match offset.unsigned_abs() {
        0 => svec![at(base), format!("{}=M", dest)],
        1 => svec![at(base), format!("{}=M{}1", dest, sign)],
        n => svec![at(base), "D=M", at(n), format!("{}=D{}A", dest, sign)],
    }
}

/// SP++, leaving `A` on the new top slot.
pub fn inc_sp() -> Vec<String> {
    svec!["@SP", "AM=M+1", "A=A-1"]
}

/// SP--, leaving `A` on the slot just popped.
pub fn dec_sp() -> Vec<String> {
    svec!["@SP", "AM=M-1"]
}

pub fn push_d() -> Vec<String> {
    [inc_sp(), svec!["M=D"]].concat()
}

pub fn push_zero() -> Vec<String> {
    [inc_sp(), svec!["M=0"]].concat()
}

pub fn pop_d() -> Vec<String> {
    [dec_sp(), svec!["D=M"]].concat()
}

/// `D = RAM[symbol]`
pub fn read_to_d(symbol: impl Display) -> Vec<String> {
    svec![at(symbol), "D=M"]
}

/// `RAM[symbol] = D`
pub fn write_d(symbol: impl Display) -> Vec<String> {
    svec![at(symbol), "M=D"]
}

pub fn push_from(symbol: impl Display) -> Vec<String> {
    [read_to_d(symbol), push_d()].concat()
}

pub fn pop_into(symbol: impl Display) -> Vec<String> {
    [pop_d(), write_d(symbol)].concat()
}

/// `D = RAM[RAM[base] + offset]`
pub fn read_segment(base: Register, offset: i32) -> Vec<String> {
    [load_address(base, offset, Dest::A), svec!["D=M"]].concat()
}

/// `RAM[RAM[base] + offset] = D`. Computing the address needs `D`, so the
/// value is parked in `R13` and the address in `R14`.
pub fn write_segment(base: Register, offset: i32) -> Vec<String> {
    [
        write_d(Register::CopyValue),
        load_address(base, offset, Dest::D),
        write_d(Register::CopyAddress),
        read_to_d(Register::CopyValue),
        load_address(Register::CopyAddress, 0, Dest::A),
        svec!["M=D"],
    ]
    .concat()
}

/// Pop the top of stack into `RAM[RAM[base] + offset]`.
pub fn pop_segment(base: Register, offset: i32) -> Vec<String> {
    [
        load_address(base, offset, Dest::D),
        write_d(Register::CopyAddress),
        pop_d(),
        load_address(Register::CopyAddress, 0, Dest::A),
        svec!["M=D"],
    ]
    .concat()
}

/// Rewrite the top slot in place, `comp` being e.g. `-M`.
pub fn unary_op(comp: &str) -> Vec<String> {
    svec!["@SP", "A=M-1", format!("M={}", comp)]
}

/// Pop the right operand into `D` and combine it into the new top slot.
pub fn binary_op(comp: &str) -> Vec<String> {
    [pop_d(), svec!["A=A-1", format!("M={}", comp)]].concat()
}

/// Replace the two top slots with -1 if `left - right` satisfies `jump`,
/// else 0.
pub fn compare(jump: &str, end_label: &str) -> Vec<String> {
    [
        pop_d(),
        svec!["A=A-1", "D=M-D", "M=-1", at(end_label), format!("D;{}", jump)],
        svec!["@SP", "A=M-1", "M=0"],
        label(end_label),
    ]
    .concat()
}

pub fn label(name: &str) -> Vec<String> {
    svec![format!("({})", name)]
}

pub fn goto(name: &str) -> Vec<String> {
    svec![at(name), "0;JMP"]
}

/// Pop; jump when the value is non-zero.
pub fn if_goto(name: &str) -> Vec<String> {
    [pop_d(), svec![at(name), "D;JNE"]].concat()
}

pub fn function(name: &str, n_locals: u16) -> Vec<String> {
    let mut asm = label(name);
    for _ in 0..n_locals {
        asm.extend(push_zero());
    }
    asm
}

pub fn call(name: &str, n_args: u16, return_label: &str) -> Vec<String> {
    let mut asm = svec![at(return_label), "D=A"];
    asm.extend(push_d());
    for pointer in SAVED_POINTERS {
        asm.extend(push_from(pointer));
    }
    // ARG = SP - 5 - nArgs
    asm.extend(load_address(Register::Sp, -(FRAME_SIZE + i32::from(n_args)), Dest::D));
    asm.extend(write_d(Register::Arg));
    // LCL = SP
    asm.extend(read_to_d(Register::Sp));
    asm.extend(write_d(Register::Lcl));
    asm.extend(goto(name));
    asm.extend(label(return_label));
    asm
}

pub fn ret() -> Vec<String> {
    // The return address must be read before *ARG is overwritten: with no
    // arguments both occupy the same cell.
    let mut asm = read_segment(Register::Lcl, -FRAME_SIZE);
    asm.extend(write_d(Register::ReturnAddress));
    asm.extend(pop_d());
    asm.extend(write_segment(Register::Arg, 0));
    asm.extend(load_address(Register::Arg, 1, Dest::D));
    asm.extend(write_d(Register::Sp));
    // LCL is the frame base, so it is restored last.
    for (depth, pointer) in SAVED_POINTERS.iter().rev().enumerate() {
        asm.extend(read_segment(Register::Lcl, -(depth as i32 + 1)));
        asm.extend(write_d(pointer));
    }
    asm.extend(svec![at(Register::ReturnAddress), "A=M", "0;JMP"]);
    asm
}

pub fn bootstrap(entry: &str, return_label: &str) -> Vec<String> {
    [load_constant(STACK_BASE), write_d(Register::Sp), call(entry, 0, return_label)].concat()
}
