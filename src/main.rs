//! # Instruction table extractor for the Obelisk 6502 reference page.
//!
//! Reads a saved copy of the page and prints one line per opcode, ready to paste into the
//! emulator's instruction-decode `match`.
//!
//! ## Getting Started
//! ```
//! cargo run -- /path/to/reference.html > decode_table.txt
//! ```
//! ...or if you've already built the binary then just...
//! ```
//! obelisk-extract /path/to/reference.html
//! ```
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod config;
mod dom;
mod emit;
mod error;
mod extract;
mod tables;
use emit::{EmitOptions, EmitSummary, Emitter};
use extract::ExtractOptions;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::result::Result;
pub(crate) use crate::error::*;

fn main() -> ExitCode {
    // errors are reported here exactly once; the exit status tells scripts what kind it was
    match run() {
        Ok(summary) => {
            info!("Generated {} lines", summary.lines);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.kind.exit_status())
        }
    }
}
fn run() -> Result<EmitSummary, Error> {
    let html = read_input(config::ARGS.file.as_str())?;
    match config::ARGS.output.as_ref() {
        Some(path) => {
            let mut f = File::create(path)?;
            process_page(&html, &config::extract_options(), &config::emit_options(), &mut f)
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            process_page(&html, &config::extract_options(), &config::emit_options(), &mut lock)
        }
    }
}
fn read_input(filename: &str) -> Result<String, Error> {
    if filename == "-" {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        Ok(html)
    } else {
        info!("Reading {}", filename);
        Ok(fs::read_to_string(filename)?)
    }
}
/// process_page drives the whole pipeline: parse, collect, pair, look up, print
fn process_page(
    html: &str, extract_opts: &ExtractOptions, emit_opts: &EmitOptions, out: &mut dyn Write,
) -> Result<EmitSummary, Error> {
    let missing = tables::missing_keys();
    if !missing.is_empty() {
        warn!("addressing modes without a complete mapping: {:?}", missing);
    }
    let doc = dom::Document::parse(html)?;
    verbose_println!("Parsed {} nodes", doc.len());
    let insts = extract::extract(&doc, extract_opts)?;
    for inst in &insts {
        verbose_println!("{}", inst.name);
        for row in &inst.rows {
            verbose_println!("    {}", row);
        }
    }
    let emitter = Emitter::new(*emit_opts);
    let summary = emitter.emit(&insts, out)?;
    out.flush()?;
    for miss in &summary.unmapped {
        warn!("{}", miss);
    }
    if summary.unmapped.is_empty() && emit_opts.variant == emit::Variant::Full {
        verbose_println!("{}", green!("All addressing modes mapped"));
    }
    Ok(summary)
}
#[cfg(test)]
mod tests {
    use super::*;
    use extract::Pairing;
    const SAMPLE_PAGE: &str = "test/obelisk_sample.html";
    fn run(path: &str, extract_opts: &ExtractOptions, emit_opts: &EmitOptions) -> Result<(String, EmitSummary), Error> {
        let html = fs::read_to_string(path)?;
        let mut buf: Vec<u8> = Vec::new();
        let summary = process_page(&html, extract_opts, emit_opts, &mut buf)?;
        Ok((String::from_utf8_lossy(&buf).into_owned(), summary))
    }
    fn html_files(dir: &str) -> Result<Vec<std::path::PathBuf>, Error> {
        let mut entries = fs::read_dir(dir)?
            .map(|res| res.map(|e| e.path()))
            .collect::<Result<Vec<_>, io::Error>>()?;
        entries.retain(|p| p.is_file() && p.extension().map_or(false, |e| e.eq_ignore_ascii_case("html")));
        entries.sort();
        Ok(entries)
    }
    #[test]
    fn sample_page_full_output() -> Result<(), Error> {
        let (text, summary) = run(SAMPLE_PAGE, &ExtractOptions::default(), &EmitOptions::default())?;
        let expected = fs::read_to_string("test/obelisk_sample.expected")?;
        assert_eq!(text, expected);
        assert_eq!(summary.lines, expected.lines().count());
        assert!(summary.unmapped.is_empty());
        Ok(())
    }
    #[test]
    fn sample_page_placeholder_output() -> Result<(), Error> {
        let opts = EmitOptions {
            variant: emit::Variant::Placeholder,
            ..Default::default()
        };
        let (text, _) = run(SAMPLE_PAGE, &ExtractOptions::default(), &opts)?;
        let first = text.lines().next().unwrap_or_default();
        assert_eq!(first, "0x69=>{Instruction::ADC(opcode, ADDRESSING_METHOD, OPERAND_SINGLE_TYPE)}");
        assert!(text.lines().all(|l| l.ends_with("(opcode, ADDRESSING_METHOD, OPERAND_SINGLE_TYPE)}")));
        Ok(())
    }
    #[test]
    fn sample_page_pairings_agree() -> Result<(), Error> {
        let adjacent = ExtractOptions {
            pairing: Pairing::Adjacent,
            strict: true,
            ..Default::default()
        };
        let (by_stride, _) = run(SAMPLE_PAGE, &ExtractOptions::default(), &EmitOptions::default())?;
        let (by_adjacency, _) = run(SAMPLE_PAGE, &adjacent, &EmitOptions::default())?;
        assert_eq!(by_stride, by_adjacency);
        Ok(())
    }
    #[test]
    fn various_pages() -> Result<(), Error> {
        // every page in ./test should extract cleanly in strict mode
        let extract_opts = ExtractOptions {
            strict: true,
            ..Default::default()
        };
        let emit_opts = EmitOptions {
            strict: true,
            ..Default::default()
        };
        for p in html_files("test")? {
            let path = p.to_string_lossy().into_owned();
            let (_, summary) = run(&path, &extract_opts, &emit_opts)?;
            assert!(summary.lines > 0, "{} produced no lines", path);
        }
        Ok(())
    }
    #[test]
    fn broken_pages() -> Result<(), Error> {
        // every page in ./test/errors must fail with a Layout, Markup or Lookup error in strict mode
        let extract_opts = ExtractOptions {
            strict: true,
            ..Default::default()
        };
        let emit_opts = EmitOptions {
            strict: true,
            ..Default::default()
        };
        for p in html_files("test/errors")? {
            let path = p.to_string_lossy().into_owned();
            match run(&path, &extract_opts, &emit_opts) {
                Err(e) if matches!(e.kind, ErrorKind::Layout | ErrorKind::Markup | ErrorKind::Lookup) => {}
                Err(e) => panic!("unexpected error kind {:?} for {}: {}", e.kind, path, e),
                Ok((_, s)) => panic!("expected {} to fail but it produced {} lines", path, s.lines),
            }
        }
        Ok(())
    }
    #[test]
    fn unknown_mode_degrades_when_lenient() -> Result<(), Error> {
        let (text, summary) = run(
            "test/errors/unknown_mode.html",
            &ExtractOptions::default(),
            &EmitOptions::default(),
        )?;
        assert!(text.contains("undefined"));
        assert_eq!(summary.unmapped.len(), 2);
        Ok(())
    }
}
