//! Writes one dispatch-table line per (instruction, addressing mode) pair.
//!
//! Full form:
//! ```text
//! 0x69=>Instruction::ADC(opcode, self.resolve_immediate(memory), OperandSize::Single, OperandType::Immediate)
//! ```
//! Placeholder form, for filling in the operand columns by hand:
//! ```text
//! 0x69=>{Instruction::ADC(opcode, ADDRESSING_METHOD, OPERAND_SINGLE_TYPE)}
//! ```
use super::*;
use extract::{AddressingRow, Instruction, UNDEFINED};
use std::io::Write;

#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Variant {
    /// opcode, mnemonic, operand access, operand size and operand type
    Full,
    /// opcode and mnemonic only, with fixed placeholders for the operand columns
    Placeholder,
}

/// Which lookup table came up empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Table {
    OperandAccess,
    OperandSize,
    OperandType,
}
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Table::OperandAccess => "operand access",
            Table::OperandSize => "operand size",
            Table::OperandType => "operand type",
        };
        write!(f, "{}", s)
    }
}

/// A key that one of the lookup tables doesn't know, and the first line it turned up on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unmapped {
    pub mnemonic: String,
    pub opcode: String,
    pub table: Table,
    pub key: String,
}
impl fmt::Display for Unmapped {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "no {} mapping for \"{}\" ({} {})",
            self.table, self.key, self.mnemonic, self.opcode
        )
    }
}

#[derive(Debug, Default)]
pub struct EmitSummary {
    pub lines: usize,
    pub unmapped: Vec<Unmapped>,
}

#[derive(Clone, Copy, Debug)]
pub struct EmitOptions {
    pub variant: Variant,
    pub opcode: Option<u8>,
    pub strict: bool,
}
impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            variant: Variant::Full,
            opcode: None,
            strict: false,
        }
    }
}

pub struct Emitter {
    opts: EmitOptions,
}
impl Emitter {
    pub fn new(opts: EmitOptions) -> Self { Emitter { opts } }

    /// Writes the lines for every instruction in order. Unmapped keys are written as
    /// `undefined` and listed in the summary, or abort the run in strict mode.
    pub fn emit(&self, insts: &[Instruction], out: &mut dyn Write) -> Result<EmitSummary, Error> {
        let mut summary = EmitSummary::default();
        for inst in insts {
            for row in &inst.rows {
                if let Some(op) = self.opts.opcode {
                    if row.opcode_byte() != Some(op) {
                        continue;
                    }
                }
                let line = self.format_line(&inst.name, row, &mut summary.unmapped)?;
                writeln!(out, "{}", line)?;
                summary.lines += 1;
            }
        }
        Ok(summary)
    }

    pub fn format_line(
        &self, mnemonic: &str, row: &AddressingRow, unmapped: &mut Vec<Unmapped>,
    ) -> Result<String, Error> {
        match self.opts.variant {
            Variant::Placeholder => Ok(format!(
                "{}=>{{Instruction::{}(opcode, ADDRESSING_METHOD, OPERAND_SINGLE_TYPE)}}",
                row.opcode, mnemonic
            )),
            Variant::Full => {
                let access = tables::operand_access(&row.mode);
                let access = self.lookup(access, Table::OperandAccess, &row.mode, mnemonic, row, unmapped)?;
                let size = tables::operand_size(&row.bytes);
                let size = self.lookup(size, Table::OperandSize, &row.bytes, mnemonic, row, unmapped)?;
                let otype = tables::operand_type(&row.mode);
                let otype = self.lookup(otype, Table::OperandType, &row.mode, mnemonic, row, unmapped)?;
                Ok(format!(
                    "{}=>Instruction::{}(opcode, {}, {}, {})",
                    row.opcode, mnemonic, access, size, otype
                ))
            }
        }
    }

    fn lookup(
        &self, found: Option<&'static str>, table: Table, key: &str, mnemonic: &str, row: &AddressingRow,
        unmapped: &mut Vec<Unmapped>,
    ) -> Result<&'static str, Error> {
        if let Some(fragment) = found {
            return Ok(fragment);
        }
        let miss = Unmapped {
            mnemonic: mnemonic.to_string(),
            opcode: row.opcode.clone(),
            table,
            key: key.to_string(),
        };
        if self.opts.strict {
            return Err(lookup_err!(Some(format!("{} {}", mnemonic, row)), "{}", miss));
        }
        // report each distinct key once per table
        if !unmapped.iter().any(|u| u.table == table && u.key == miss.key) {
            unmapped.push(miss);
        }
        Ok(UNDEFINED)
    }
}
