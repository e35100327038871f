//! A minimal Hack CPU for executing generated assembly in tests.
#![allow(dead_code)]

use std::collections::HashMap;

use vm_translator::driver::{translate_program, SourceFile};

pub const RAM_SIZE: usize = 0x8000;
const FIRST_VARIABLE: u16 = 16;

#[derive(Debug)]
enum Instr {
    Load(u16),
    Compute {
        comp: String,
        dest_a: bool,
        dest_d: bool,
        dest_m: bool,
        jump: String,
    },
}

pub struct Cpu {
    rom: Vec<Instr>,
    labels: HashMap<String, usize>,
    symbols: HashMap<String, u16>,
    pub ram: Vec<i16>,
    pub a: i16,
    pub d: i16,
    pub pc: usize,
}

fn predefined() -> HashMap<String, u16> {
    let mut symbols: HashMap<String, u16> = [
        ("SP", 0),
        ("LCL", 1),
        ("ARG", 2),
        ("THIS", 3),
        ("THAT", 4),
        ("SCREEN", 0x4000),
        ("KBD", 0x6000),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    for r in 0..16 {
        symbols.insert(format!("R{}", r), r);
    }
    symbols
}

impl Cpu {
    /// Assemble `asm`; panics on anything a real assembler would reject,
    /// including a label defined twice.
    pub fn new(asm: &str) -> Cpu {
        let mut labels = HashMap::new();
        let mut lines = vec![];
        for raw in asm.lines() {
            let line = raw.split("//").next().unwrap().trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                let previous = labels.insert(name.to_string(), lines.len());
                assert!(previous.is_none(), "label ({}) defined twice", name);
            } else {
                lines.push(line);
            }
        }

        let mut symbols = predefined();
        let mut next_variable = FIRST_VARIABLE;
        let mut rom = vec![];
        for line in lines {
            if let Some(operand) = line.strip_prefix('@') {
                let value = if let Ok(n) = operand.parse::<u16>() {
                    assert!(n < 0x8000, "immediate out of range: {}", line);
                    n
                } else if let Some(&addr) = labels.get(operand) {
                    addr as u16
                } else {
                    *symbols.entry(operand.to_string()).or_insert_with(|| {
                        next_variable += 1;
                        next_variable - 1
                    })
                };
                rom.push(Instr::Load(value));
            } else {
                let (left, jump) = line.split_once(';').unwrap_or((line, ""));
                let (dest, comp) = left.split_once('=').unwrap_or(("", left));
                rom.push(Instr::Compute {
                    comp: comp.to_string(),
                    dest_a: dest.contains('A'),
                    dest_d: dest.contains('D'),
                    dest_m: dest.contains('M'),
                    jump: jump.to_string(),
                });
            }
        }

        Cpu {
            rom,
            labels,
            symbols,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        }
    }

    pub fn label(&self, name: &str) -> usize {
        self.labels[name]
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn symbol(&self, name: &str) -> usize {
        self.symbols[name] as usize
    }

    fn compute(&self, comp: &str) -> i16 {
        let (a, d) = (self.a, self.d);
        let m = self.ram.get(a as u16 as usize).copied().unwrap_or(0);
        match comp {
            "0" => 0,
            "1" => 1,
            "-1" => -1,
            "D" => d,
            "A" => a,
            "M" => m,
            "!D" => !d,
            "!A" => !a,
            "!M" => !m,
            "-D" => d.wrapping_neg(),
            "-A" => a.wrapping_neg(),
            "-M" => m.wrapping_neg(),
            "D+1" => d.wrapping_add(1),
            "A+1" => a.wrapping_add(1),
            "M+1" => m.wrapping_add(1),
            "D-1" => d.wrapping_sub(1),
            "A-1" => a.wrapping_sub(1),
            "M-1" => m.wrapping_sub(1),
            "D+A" => d.wrapping_add(a),
            "D+M" => d.wrapping_add(m),
            "D-A" => d.wrapping_sub(a),
            "D-M" => d.wrapping_sub(m),
            "A-D" => a.wrapping_sub(d),
            "M-D" => m.wrapping_sub(d),
            "D&A" => d & a,
            "D&M" => d & m,
            "D|A" => d | a,
            "D|M" => d | m,
            other => panic!("not a Hack computation: {}", other),
        }
    }

    pub fn step(&mut self) {
        match &self.rom[self.pc] {
            Instr::Load(value) => {
                self.a = *value as i16;
                self.pc += 1;
            }
            Instr::Compute {
                comp,
                dest_a,
                dest_d,
                dest_m,
                jump,
            } => {
                let value = self.compute(comp);
                let target = self.a as u16 as usize;
                let taken = match jump.as_str() {
                    "" => false,
                    "JGT" => value > 0,
                    "JEQ" => value == 0,
                    "JGE" => value >= 0,
                    "JLT" => value < 0,
                    "JNE" => value != 0,
                    "JLE" => value <= 0,
                    "JMP" => true,
                    other => panic!("not a Hack jump: {}", other),
                };
                if *dest_m {
                    self.ram[target] = value;
                }
                if *dest_a {
                    self.a = value;
                }
                if *dest_d {
                    self.d = value;
                }
                self.pc = if taken { target } else { self.pc + 1 };
            }
        }
    }

    /// Run until execution falls off the end of the program.
    pub fn run_to_end(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                return;
            }
            self.step();
        }
        panic!("program did not finish within {} steps", max_steps);
    }

    /// Run until the program counter reaches `label`.
    pub fn run_to_label(&mut self, label: &str, max_steps: usize) {
        let stop = self.label(label);
        for _ in 0..max_steps {
            if self.pc == stop {
                return;
            }
            self.step();
        }
        panic!("({}) not reached within {} steps", label, max_steps);
    }

    pub fn sp(&self) -> usize {
        self.ram[0] as usize
    }

    /// Stack contents from the stack base up to SP.
    pub fn stack(&self) -> &[i16] {
        &self.ram[256..self.sp()]
    }
}

/// Translate `source` as file `Test` and run it from a fixed starting state:
/// SP=256, LCL=300, ARG=400, THIS=3000, THAT=3010.
pub fn run_commands(source: &str, setup: impl FnOnce(&mut Cpu)) -> Cpu {
    let asm = vm_translator::translate_source("Test", source)
        .unwrap()
        .join("\n");
    let mut cpu = Cpu::new(&asm);
    cpu.ram[0] = 256;
    cpu.ram[1] = 300;
    cpu.ram[2] = 400;
    cpu.ram[3] = 3000;
    cpu.ram[4] = 3010;
    setup(&mut cpu);
    cpu.run_to_end(100_000);
    cpu
}

/// Translate a whole program with bootstrap code, returning the assembly.
pub fn program_asm(files: &[(&str, &str)]) -> String {
    let files: Vec<_> = files
        .iter()
        .map(|(name, text)| SourceFile::new(*name, *text))
        .collect();
    let mut out = vec![];
    translate_program(&mut out, &files, true).unwrap();
    String::from_utf8(out).unwrap()
}

/// Boot a whole program with stack memory full of junk and run it until it
/// reaches `(HALT)`.
pub fn run_program(files: &[(&str, &str)]) -> Cpu {
    let mut cpu = Cpu::new(&program_asm(files));
    for cell in &mut cpu.ram[256..2048] {
        *cell = 0x5a5a;
    }
    cpu.ram[3] = 3000;
    cpu.ram[4] = 3010;
    cpu.run_to_label("HALT", 1_000_000);
    cpu
}
