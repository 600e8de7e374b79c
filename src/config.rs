use crate::emit::{EmitOptions, Variant};
use crate::extract::{ExtractOptions, Pairing};
use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// Saved copy of the Obelisk 6502 reference page (.html), or '-' to read stdin
    pub file: String,

    /// Output form: full operand mapping, or the ADDRESSING_METHOD placeholder form
    #[arg(short, long, value_enum, default_value_t = Variant::Full)]
    pub format: Variant,

    /// How instruction headings are matched with their addressing-mode tables
    #[arg(short, long, value_enum, default_value_t = Pairing::Stride)]
    pub pairing: Pairing,

    /// Index of the first table body holding addressing-mode rows (stride pairing)
    #[arg(long, default_value_t = 2)]
    pub first_table: usize,

    /// Distance between consecutive addressing-mode table bodies (stride pairing)
    #[arg(long, default_value_t = 2)]
    pub stride: usize,

    /// Tag of the elements naming each instruction
    #[arg(long, default_value = "h3")]
    pub heading: String,

    /// Write generated lines to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Only emit the line for this opcode (hex ok with '0x')
    #[arg(long,value_parser=maybe_hex::<u8>)]
    pub opcode: Option<u8>,

    /// Treat heading/table mismatches and unmapped addressing modes as errors
    #[arg(short, long)]
    pub strict: bool,

    /// Dump the collected mnemonics and parsed rows
    #[arg(short, long)]
    pub verbose: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test", "test"])
    } else {
        Args::parse()
    };
}

pub fn extract_options() -> ExtractOptions {
    ExtractOptions {
        heading: ARGS.heading.to_ascii_lowercase(),
        pairing: ARGS.pairing,
        first_table: ARGS.first_table,
        stride: ARGS.stride,
        strict: ARGS.strict,
    }
}
pub fn emit_options() -> EmitOptions {
    EmitOptions {
        variant: ARGS.format,
        opcode: ARGS.opcode,
        strict: ARGS.strict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_match_the_reference_page_layout() {
        let args = Args::parse_from(["obelisk-extract", "reference.html"]);
        assert_eq!(args.format, Variant::Full);
        assert_eq!(args.pairing, Pairing::Stride);
        assert_eq!(args.first_table, 2);
        assert_eq!(args.stride, 2);
        assert_eq!(args.heading, "h3");
        assert!(!args.strict);
    }
    #[test]
    fn opcode_filter_accepts_hex() {
        let args = Args::parse_from(["obelisk-extract", "-", "--opcode", "0x69", "-f", "placeholder"]);
        assert_eq!(args.opcode, Some(0x69));
        assert_eq!(args.format, Variant::Placeholder);
        let args = Args::parse_from(["obelisk-extract", "-", "--opcode", "105", "--pairing", "adjacent"]);
        assert_eq!(args.opcode, Some(0x69));
        assert_eq!(args.pairing, Pairing::Adjacent);
    }
}
