use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A general-purpose register, written `rN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Register(pub u8);

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// The flexible second operand of most instructions: a register or a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operand {
    Register { reg: Register },
    Literal { value: i64 },
}

impl Operand {
    pub fn reg(n: u8) -> Self {
        Self::Register { reg: Register(n) }
    }

    pub fn lit(value: i64) -> Self {
        Self::Literal { value }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { reg } => write!(f, "{reg}"),
            Self::Literal { value } => write!(f, "{value}"),
        }
    }
}

/// A memory address, written `[r1]` or `[16]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub Operand);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// Branch condition, written as the suffix of `b` (`beq`, `bne`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Al,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Hi,
    Lo,
    Hs,
    Ls,
    Pl,
    Mi,
    Vs,
    Vc,
}

impl Condition {
    const ALL: [Condition; 15] = [
        Self::Al,
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Hi,
        Self::Lo,
        Self::Hs,
        Self::Ls,
        Self::Pl,
        Self::Mi,
        Self::Vs,
        Self::Vc,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Al => "al",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Ge => "ge",
            Self::Le => "le",
            Self::Hi => "hi",
            Self::Lo => "lo",
            Self::Hs => "hs",
            Self::Ls => "ls",
            Self::Pl => "pl",
            Self::Mi => "mi",
            Self::Vs => "vs",
            Self::Vc => "vc",
        }
    }

    /// Parse a branch suffix. The empty suffix means "always".
    pub fn from_suffix(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::Al);
        }
        Self::ALL.into_iter().find(|c| c.suffix() == s)
    }
}

/// Arithmetic, logic, and shift operations sharing the `op rDest, rA, value` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Lsl,
    Lsr,
    Asr,
    Rol,
    Ror,
}

impl AluOp {
    const ALL: [AluOp; 10] = [
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Lsl,
        Self::Lsr,
        Self::Asr,
        Self::Rol,
        Self::Ror,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Rol => "rol",
            Self::Ror => "ror",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == s)
    }
}

/// A single instruction.
///
/// Instructions are plain values: two instructions are "the same" exactly
/// when they are structurally equal, which is what the diff engine relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instruction {
    Alu {
        op: AluOp,
        dest: Register,
        a: Register,
        b: Operand,
    },
    Cmp {
        a: Register,
        b: Operand,
    },
    Mov {
        dest: Register,
        value: Operand,
    },
    B {
        cond: Condition,
        label: String,
    },
    Call {
        label: String,
    },
    Ret,
    Ldr {
        dest: Register,
        addr: Address,
    },
    Str {
        addr: Address,
        src: Register,
    },
    Hlt,
    Nop,
}

impl Instruction {
    /// Shorthand for the two-operand ALU form `op rA, value`.
    pub fn alu(op: AluOp, a: u8, b: Operand) -> Self {
        Self::Alu {
            op,
            dest: Register(a),
            a: Register(a),
            b,
        }
    }

    /// The label this instruction transfers control to, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::B { label, .. } | Self::Call { label } => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alu { op, dest, a, b } if dest == a => write!(f, "{} {a}, {b}", op.mnemonic()),
            Self::Alu { op, dest, a, b } => write!(f, "{} {dest}, {a}, {b}", op.mnemonic()),
            Self::Cmp { a, b } => write!(f, "cmp {a}, {b}"),
            Self::Mov { dest, value } => write!(f, "mov {dest}, {value}"),
            Self::B {
                cond: Condition::Al,
                label,
            } => write!(f, "b {label}"),
            Self::B { cond, label } => write!(f, "b{} {label}", cond.suffix()),
            Self::Call { label } => write!(f, "call {label}"),
            Self::Ret => f.write_str("ret"),
            Self::Ldr { dest, addr } => write!(f, "ldr {dest}, {addr}"),
            Self::Str { addr, src } => write!(f, "str {addr}, {src}"),
            Self::Hlt => f.write_str("hlt"),
            Self::Nop => f.write_str("nop"),
        }
    }
}

impl FromStr for Instruction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (mnemonic, rest) = match s.split_once(char::is_whitespace) {
            Some((m, r)) => (m, r.trim()),
            None => (s, ""),
        };
        let mnemonic = mnemonic.to_ascii_lowercase();
        let args: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };

        if let Some(op) = AluOp::from_mnemonic(&mnemonic) {
            return match args.as_slice() {
                [a, b] => {
                    let a = parse_register(a)?;
                    Ok(Self::Alu {
                        op,
                        dest: a,
                        a,
                        b: parse_operand(b)?,
                    })
                }
                [dest, a, b] => Ok(Self::Alu {
                    op,
                    dest: parse_register(dest)?,
                    a: parse_register(a)?,
                    b: parse_operand(b)?,
                }),
                _ => Err(format!("'{mnemonic}' takes 2 or 3 operands, got {}", args.len())),
            };
        }

        match (mnemonic.as_str(), args.as_slice()) {
            ("cmp", [a, b]) => Ok(Self::Cmp {
                a: parse_register(a)?,
                b: parse_operand(b)?,
            }),
            ("mov", [dest, value]) => Ok(Self::Mov {
                dest: parse_register(dest)?,
                value: parse_operand(value)?,
            }),
            ("call", [label]) => Ok(Self::Call {
                label: parse_label(label)?,
            }),
            ("ret", []) => Ok(Self::Ret),
            ("hlt", []) => Ok(Self::Hlt),
            ("nop", []) => Ok(Self::Nop),
            ("ldr", [dest, addr]) => Ok(Self::Ldr {
                dest: parse_register(dest)?,
                addr: parse_address(addr)?,
            }),
            ("str", [addr, src]) => Ok(Self::Str {
                addr: parse_address(addr)?,
                src: parse_register(src)?,
            }),
            (m, [label]) if m.starts_with('b') => {
                let cond = Condition::from_suffix(&m[1..])
                    .ok_or_else(|| format!("unknown branch condition in '{m}'"))?;
                Ok(Self::B {
                    cond,
                    label: parse_label(label)?,
                })
            }
            _ => Err(format!("unrecognised instruction '{s}'")),
        }
    }
}

fn parse_register(s: &str) -> Result<Register, String> {
    s.strip_prefix('r')
        .and_then(|n| n.parse::<u8>().ok())
        .map(Register)
        .ok_or_else(|| format!("expected a register, got '{s}'"))
}

fn parse_literal(s: &str) -> Result<i64, String> {
    let invalid = || format!("expected a literal, got '{s}'");
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (radix, digits) = match unsigned.strip_prefix("0x") {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };
    // `from_str_radix` would accept a second sign here.
    if !digits.starts_with(|c: char| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix).map_err(|_| invalid())
}

fn parse_operand(s: &str) -> Result<Operand, String> {
    if s.starts_with('r') {
        parse_register(s).map(|reg| Operand::Register { reg })
    } else {
        parse_literal(s).map(|value| Operand::Literal { value })
    }
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("expected an address in brackets, got '{s}'"))
        .and_then(|inner| parse_operand(inner.trim()))
        .map(Address)
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_label(s: &str) -> Result<String, String> {
    if is_identifier(s) {
        Ok(s.to_string())
    } else {
        Err(format!("invalid label name '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Instruction {
        s.parse().unwrap()
    }

    #[test]
    fn two_operand_alu_sets_dest_to_first_register() {
        assert_eq!(
            parse("add r1, r1"),
            Instruction::Alu {
                op: AluOp::Add,
                dest: Register(1),
                a: Register(1),
                b: Operand::reg(1),
            }
        );
    }

    #[test]
    fn three_operand_alu_with_literal() {
        assert_eq!(
            parse("lsl r0, r2, 0x10"),
            Instruction::Alu {
                op: AluOp::Lsl,
                dest: Register(0),
                a: Register(2),
                b: Operand::lit(16),
            }
        );
    }

    #[test]
    fn branch_conditions() {
        assert_eq!(
            parse("b loop"),
            Instruction::B {
                cond: Condition::Al,
                label: "loop".into(),
            }
        );
        assert_eq!(
            parse("bne done"),
            Instruction::B {
                cond: Condition::Ne,
                label: "done".into(),
            }
        );
        assert!("bxx done".parse::<Instruction>().is_err());
    }

    #[test]
    fn memory_instructions() {
        assert_eq!(
            parse("ldr r0, [r3]"),
            Instruction::Ldr {
                dest: Register(0),
                addr: Address(Operand::reg(3)),
            }
        );
        assert_eq!(
            parse("str [-4], r1"),
            Instruction::Str {
                addr: Address(Operand::lit(-4)),
                src: Register(1),
            }
        );
    }

    #[test]
    fn label_accessor_only_for_control_transfer() {
        assert_eq!(parse("call f").label(), Some("f"));
        assert_eq!(parse("bgt x").label(), Some("x"));
        assert_eq!(parse("ret").label(), None);
        assert_eq!(parse("mov r0, 1").label(), None);
    }

    #[test]
    fn display_parses_back_to_same_instruction() {
        for text in [
            "add r0, r1",
            "sub r2, r0, 7",
            "cmp r0, r1",
            "mov r4, -3",
            "b top",
            "ble top",
            "call f",
            "ret",
            "ldr r0, [12]",
            "str [r1], r2",
            "hlt",
            "nop",
        ] {
            let instruction = parse(text);
            assert_eq!(instruction.to_string(), text);
        }
    }

    #[test]
    fn rejects_malformed_operands() {
        assert!("add r0".parse::<Instruction>().is_err());
        assert!("mov x, 1".parse::<Instruction>().is_err());
        assert!("ldr r0, 12".parse::<Instruction>().is_err());
        assert!("call 9lives".parse::<Instruction>().is_err());
        assert!("jmp x".parse::<Instruction>().is_err());
        assert!("mov r0, --5".parse::<Instruction>().is_err());
        assert!("mov r0, -+5".parse::<Instruction>().is_err());
        assert!("mov r0, +5".parse::<Instruction>().is_err());
        assert!("mov r0, 0x-5".parse::<Instruction>().is_err());
        assert!("mov r0, 0x".parse::<Instruction>().is_err());
        assert!("mov r0, -".parse::<Instruction>().is_err());
    }

    #[test]
    fn literal_extremes() {
        assert_eq!(
            parse("mov r0, -9223372036854775808"),
            Instruction::Mov {
                dest: Register(0),
                value: Operand::lit(i64::MIN),
            }
        );
        assert_eq!(
            parse("mov r0, -0x10"),
            Instruction::Mov {
                dest: Register(0),
                value: Operand::lit(-16),
            }
        );
        assert!("mov r0, 9223372036854775808".parse::<Instruction>().is_err());
    }

    #[test]
    fn serde_tags_by_kind() {
        let json = serde_json::to_value(parse("add r1, r1")).unwrap();
        assert_eq!(json["kind"], "alu");
        assert_eq!(json["op"], "add");
        assert_eq!(json["b"]["type"], "register");
        assert_eq!(json["b"]["reg"], 1);
    }
}
