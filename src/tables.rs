//! Static lookup tables that turn the reference page's vocabulary into fragments of the
//! emulator's dispatch table.
//!
//! | page text | operand access | operand type |
//! | --- | --- | --- |
//! | `Immediate` | `self.resolve_immediate(memory)` | `OperandType::Immediate` |
//! | `Zero Page,X` | `self.resolve_zero_page_x(memory)` | `OperandType::ZeroPageX` |
//! | `(Indirect),Y` | `self.resolve_indirect_y(memory)` | `OperandType::IndirectY` |
//! | `Implied`, `Accumulator` | `self.resolve_implied(memory)`, ... | `OperandType::NoOperands` |
//! | ... | ... | ... |
//!
//! `OperandType::ZeroPageY`, `OperandType::Indirect` and `OperandType::Relative` have no
//! counterpart in the emulator's `OperandType` yet; lines using them (LDX/STX, JMP and the
//! branches) need those variants added before they compile.
//!
//! The instruction length column maps separately: `1` -> `OperandSize::Zero`,
//! `2` -> `OperandSize::Single`, `3` -> `OperandSize::Double`.
use super::*;
use lazy_static::lazy_static;
use std::str::FromStr;

/// The addressing modes named on the reference page.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
    Indirect,
    Implied,
    Accumulator,
    Relative,
}
impl AddressingMode {
    pub const ALL: [AddressingMode; 13] = [
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::Absolute,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
        AddressingMode::Indirect,
        AddressingMode::Implied,
        AddressingMode::Accumulator,
        AddressingMode::Relative,
    ];
    /// The mode's name as the reference page spells it.
    pub fn name(&self) -> &'static str {
        match self {
            AddressingMode::Immediate => "Immediate",
            AddressingMode::ZeroPage => "Zero Page",
            AddressingMode::ZeroPageX => "Zero Page,X",
            AddressingMode::ZeroPageY => "Zero Page,Y",
            AddressingMode::Absolute => "Absolute",
            AddressingMode::AbsoluteX => "Absolute,X",
            AddressingMode::AbsoluteY => "Absolute,Y",
            AddressingMode::IndirectX => "(Indirect,X)",
            AddressingMode::IndirectY => "(Indirect),Y",
            AddressingMode::Indirect => "Indirect",
            AddressingMode::Implied => "Implied",
            AddressingMode::Accumulator => "Accumulator",
            AddressingMode::Relative => "Relative",
        }
    }
}
impl FromStr for AddressingMode {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AddressingMode::ALL.iter().copied().find(|m| m.name() == s).ok_or(())
    }
}
impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.name()) }
}

lazy_static! {
    static ref OPERAND_ACCESS: HashMap<AddressingMode, &'static str> = HashMap::from([
        (AddressingMode::Immediate, "self.resolve_immediate(memory)"),
        (AddressingMode::ZeroPage, "self.resolve_zero_page(memory)"),
        (AddressingMode::ZeroPageX, "self.resolve_zero_page_x(memory)"),
        (AddressingMode::ZeroPageY, "self.resolve_zero_page_y(memory)"),
        (AddressingMode::Absolute, "self.resolve_absolute(memory)"),
        (AddressingMode::AbsoluteX, "self.resolve_absolute_x(memory)"),
        (AddressingMode::AbsoluteY, "self.resolve_absolute_y(memory)"),
        (AddressingMode::IndirectX, "self.resolve_indirect_x(memory)"),
        (AddressingMode::IndirectY, "self.resolve_indirect_y(memory)"),
        (AddressingMode::Indirect, "self.resolve_indirect(memory)"),
        (AddressingMode::Implied, "self.resolve_implied(memory)"),
        (AddressingMode::Accumulator, "self.resolve_accumulator(memory)"),
        (AddressingMode::Relative, "self.resolve_relative(memory)"),
    ]);
    static ref OPERAND_TYPE: HashMap<AddressingMode, &'static str> = HashMap::from([
        (AddressingMode::Immediate, "OperandType::Immediate"),
        (AddressingMode::ZeroPage, "OperandType::ZeroPage"),
        (AddressingMode::ZeroPageX, "OperandType::ZeroPageX"),
        (AddressingMode::ZeroPageY, "OperandType::ZeroPageY"),
        (AddressingMode::Absolute, "OperandType::Absolute"),
        (AddressingMode::AbsoluteX, "OperandType::AbsoluteX"),
        (AddressingMode::AbsoluteY, "OperandType::AbsoluteY"),
        (AddressingMode::IndirectX, "OperandType::IndirectX"),
        (AddressingMode::IndirectY, "OperandType::IndirectY"),
        (AddressingMode::Indirect, "OperandType::Indirect"),
        (AddressingMode::Implied, "OperandType::NoOperands"),
        (AddressingMode::Accumulator, "OperandType::NoOperands"),
        (AddressingMode::Relative, "OperandType::Relative"),
    ]);
    // keyed by the text of the page's "Bytes" column
    static ref OPERAND_SIZE: HashMap<&'static str, &'static str> = HashMap::from([
        ("1", "OperandSize::Zero"),
        ("2", "OperandSize::Single"),
        ("3", "OperandSize::Double"),
    ]);
}

/// Operand-resolution call expression for an addressing mode name.
pub fn operand_access(mode_name: &str) -> Option<&'static str> {
    let mode = AddressingMode::from_str(mode_name).ok()?;
    OPERAND_ACCESS.get(&mode).copied()
}
/// Operand type tag for an addressing mode name.
pub fn operand_type(mode_name: &str) -> Option<&'static str> {
    let mode = AddressingMode::from_str(mode_name).ok()?;
    OPERAND_TYPE.get(&mode).copied()
}
/// Operand encoding tag for an instruction length.
pub fn operand_size(byte_len: &str) -> Option<&'static str> { OPERAND_SIZE.get(byte_len.trim()).copied() }

/// Addressing modes that lack an access expression or a type tag.
pub fn missing_keys() -> Vec<AddressingMode> {
    AddressingMode::ALL
        .iter()
        .copied()
        .filter(|m| !OPERAND_ACCESS.contains_key(m) || !OPERAND_TYPE.contains_key(m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    const PAGE_VOCABULARY: &[&str] = &[
        "Immediate",
        "Zero Page",
        "Zero Page,X",
        "Zero Page,Y",
        "Absolute",
        "Absolute,X",
        "Absolute,Y",
        "(Indirect,X)",
        "(Indirect),Y",
        "Indirect",
        "Implied",
        "Accumulator",
        "Relative",
    ];
    #[test]
    fn every_page_mode_is_mapped() {
        for name in PAGE_VOCABULARY {
            assert!(operand_access(name).is_some(), "no access expression for {}", name);
            assert!(operand_type(name).is_some(), "no operand type for {}", name);
        }
        assert!(missing_keys().is_empty());
    }
    #[test]
    fn names_round_trip() {
        for mode in AddressingMode::ALL {
            assert_eq!(AddressingMode::from_str(mode.name()), Ok(mode));
            assert_eq!(mode.to_string(), mode.name());
        }
        assert!(AddressingMode::from_str("Zero page,x").is_err());
        assert_eq!(AddressingMode::from_str(" Absolute,X "), Ok(AddressingMode::AbsoluteX));
    }
    #[test]
    fn indexed_modes() {
        assert_eq!(operand_access("Absolute,X"), Some("self.resolve_absolute_x(memory)"));
        assert_eq!(operand_type("Absolute,X"), Some("OperandType::AbsoluteX"));
        assert_eq!(operand_access("(Indirect),Y"), Some("self.resolve_indirect_y(memory)"));
        assert_eq!(operand_type("(Indirect,X)"), Some("OperandType::IndirectX"));
    }
    #[test]
    fn modes_without_operands() {
        assert_eq!(operand_type("Implied"), Some("OperandType::NoOperands"));
        assert_eq!(operand_type("Accumulator"), Some("OperandType::NoOperands"));
        assert_eq!(operand_access("Accumulator"), Some("self.resolve_accumulator(memory)"));
    }
    #[test]
    fn sizes() {
        assert_eq!(operand_size("1"), Some("OperandSize::Zero"));
        assert_eq!(operand_size("2"), Some("OperandSize::Single"));
        assert_eq!(operand_size("3"), Some("OperandSize::Double"));
        assert_eq!(operand_size("4"), None);
        assert_eq!(operand_size(""), None);
    }
    #[test]
    fn unknown_modes() {
        assert_eq!(operand_access("Absolute Long"), None);
        assert_eq!(operand_type("Stack"), None);
    }
}
