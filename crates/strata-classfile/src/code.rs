use crate::constant_pool::{ConstantPool, MemberRef};
use crate::error::{Error, Result};
use crate::reader::Reader;

const GETSTATIC: u8 = 0xb2;
const PUTSTATIC: u8 = 0xb3;
const GETFIELD: u8 = 0xb4;
const PUTFIELD: u8 = 0xb5;
const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const INVOKEINTERFACE: u8 = 0xb9;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const WIDE: u8 = 0xc4;
const IINC: u8 = 0x84;

/// The instruction that produced a [`MemberAccess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessInstruction {
    GetField,
    PutField,
    GetStatic,
    PutStatic,
    InvokeVirtual,
    InvokeSpecial,
    InvokeStatic,
    InvokeInterface,
}

impl AccessInstruction {
    fn from_opcode(opcode: u8) -> Option<Self> {
        Some(match opcode {
            GETSTATIC => Self::GetStatic,
            PUTSTATIC => Self::PutStatic,
            GETFIELD => Self::GetField,
            PUTFIELD => Self::PutField,
            INVOKEVIRTUAL => Self::InvokeVirtual,
            INVOKESPECIAL => Self::InvokeSpecial,
            INVOKESTATIC => Self::InvokeStatic,
            INVOKEINTERFACE => Self::InvokeInterface,
            _ => return None,
        })
    }

    pub fn is_field_access(self) -> bool {
        matches!(
            self,
            Self::GetField | Self::PutField | Self::GetStatic | Self::PutStatic
        )
    }

    pub fn is_write(self) -> bool {
        matches!(self, Self::PutField | Self::PutStatic)
    }
}

/// A field access or method invocation found in a method body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberAccess {
    pub instruction: AccessInstruction,
    pub target: MemberRef,
    /// Bytecode offset of the instruction.
    pub offset: u32,
    /// Source line from the `LineNumberTable`, if the method has one.
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineNumber {
    pub(crate) start_pc: u16,
    pub(crate) line: u16,
}

/// Parses a `Code` attribute body and returns the member accesses of its
/// instructions, in bytecode order.
pub(crate) fn parse_code_attribute(info: &[u8], cp: &ConstantPool) -> Result<Vec<MemberAccess>> {
    let mut reader = Reader::new(info);
    let _max_stack = reader.read_u2()?;
    let _max_locals = reader.read_u2()?;
    let code_length = reader.read_u4()? as usize;
    let code = reader.read_bytes(code_length)?;

    let exception_table_length = reader.read_u2()? as usize;
    reader.skip(exception_table_length * 8)?;

    let mut lines = Vec::new();
    let attributes_count = reader.read_u2()? as usize;
    for _ in 0..attributes_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let attr = reader.read_bytes(length)?;
        if cp.get_utf8(name_index)? == "LineNumberTable" {
            let mut sub = Reader::new(attr);
            let count = sub.read_u2()? as usize;
            for _ in 0..count {
                lines.push(LineNumber {
                    start_pc: sub.read_u2()?,
                    line: sub.read_u2()?,
                });
            }
            sub.ensure_empty()
                .map_err(|_| Error::MalformedAttribute("LineNumberTable"))?;
        }
    }
    reader
        .ensure_empty()
        .map_err(|_| Error::MalformedAttribute("Code"))?;

    lines.sort_by_key(|entry| entry.start_pc);
    scan_member_accesses(code, cp, &lines)
}

pub(crate) fn scan_member_accesses(
    code: &[u8],
    cp: &ConstantPool,
    lines: &[LineNumber],
) -> Result<Vec<MemberAccess>> {
    let mut out = Vec::new();
    let mut pc = 0usize;
    while pc < code.len() {
        let opcode = code[pc];
        let len = instruction_length(code, pc)?;
        if pc + len > code.len() {
            return Err(Error::MalformedAttribute("Code"));
        }

        if let Some(instruction) = AccessInstruction::from_opcode(opcode) {
            let index = u16::from_be_bytes([code[pc + 1], code[pc + 2]]);
            out.push(MemberAccess {
                instruction,
                target: cp.get_member_ref(index)?,
                offset: pc as u32,
                line: line_for(lines, pc),
            });
        }

        pc += len;
    }
    Ok(out)
}

fn line_for(lines: &[LineNumber], pc: usize) -> Option<u32> {
    let idx = lines.partition_point(|entry| entry.start_pc as usize <= pc);
    idx.checked_sub(1).map(|idx| lines[idx].line as u32)
}

fn read_i32_at(code: &[u8], at: usize) -> Result<i32> {
    let bytes = code
        .get(at..at + 4)
        .ok_or(Error::MalformedAttribute("Code"))?;
    Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Length in bytes of the instruction starting at `pc`, operands included.
fn instruction_length(code: &[u8], pc: usize) -> Result<usize> {
    let opcode = code[pc];
    let len = match opcode {
        0x00..=0x0f => 1,
        0x10 => 2,
        0x11 => 3,
        0x12 => 2,
        0x13 | 0x14 => 3,
        0x15..=0x19 => 2,
        0x1a..=0x35 => 1,
        0x36..=0x3a => 2,
        0x3b..=0x83 => 1,
        IINC => 3,
        0x85..=0x98 => 1,
        0x99..=0xa8 => 3,
        0xa9 => 2,
        TABLESWITCH => {
            let base = pc + 1 + switch_padding(pc);
            let low = read_i32_at(code, base + 4)?;
            let high = read_i32_at(code, base + 8)?;
            let count = (high as i64) - (low as i64) + 1;
            if count < 0 {
                return Err(Error::MalformedAttribute("Code"));
            }
            (base - pc) + 12 + (count as usize) * 4
        }
        LOOKUPSWITCH => {
            let base = pc + 1 + switch_padding(pc);
            let pairs = read_i32_at(code, base + 4)?;
            if pairs < 0 {
                return Err(Error::MalformedAttribute("Code"));
            }
            (base - pc) + 8 + (pairs as usize) * 8
        }
        0xac..=0xb1 => 1,
        GETSTATIC..=INVOKESTATIC => 3,
        INVOKEINTERFACE | 0xba => 5,
        0xbb => 3,
        0xbc => 2,
        0xbd => 3,
        0xbe | 0xbf => 1,
        0xc0 | 0xc1 => 3,
        0xc2 | 0xc3 => 1,
        WIDE => match code.get(pc + 1) {
            Some(&IINC) => 6,
            Some(_) => 4,
            None => return Err(Error::MalformedAttribute("Code")),
        },
        0xc5 => 4,
        0xc6 | 0xc7 => 3,
        0xc8 | 0xc9 => 5,
        0xca | 0xfe | 0xff => 1,
        other => {
            return Err(Error::InvalidOpcode {
                opcode: other,
                offset: pc,
            })
        }
    };
    Ok(len)
}

/// Switch operands are 4-byte aligned relative to the start of the code array.
fn switch_padding(pc: usize) -> usize {
    (4 - (pc + 1) % 4) % 4
}
