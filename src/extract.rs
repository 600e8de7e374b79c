//! Pulls instruction names and addressing-mode rows out of a parsed reference page.
//!
//! The page lists each instruction under a heading (`ADC - Add with Carry`) followed by a
//! processor-status table and an addressing-mode table:
//! ```text
//! Addressing Mode | Opcode | Bytes | Cycles
//! Immediate       | $69    | 2     | 2
//! Zero Page       | $65    | 2     | 3
//! ```
//! By default, headings are paired with table bodies by position. See [`Pairing`].
use super::*;
use dom::{Document, NodeId};

pub const IDX_ADDR_METHOD: usize = 0;
pub const IDX_OPCODE: usize = 1;
pub const IDX_BYTES: usize = 2;
pub const IDX_CYCLES: usize = 3;

/// Stands in for a value that doesn't exist, just like the text a browser console prints for it.
pub const UNDEFINED: &str = "undefined";

/// How instruction headings are matched with their addressing-mode tables.
#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Pairing {
    /// Nth heading goes with the Nth selected table body (every `stride`th, starting at `first_table`)
    Stride,
    /// Each heading goes with the first following table whose header reads "Addressing Mode"
    Adjacent,
}

#[derive(Debug)]
pub struct ExtractOptions {
    pub heading: String,
    pub pairing: Pairing,
    pub first_table: usize,
    pub stride: usize,
    pub strict: bool,
}
impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            heading: "h3".to_string(),
            pairing: Pairing::Stride,
            first_table: 2,
            stride: 2,
            strict: false,
        }
    }
}

/// One row of an addressing-mode table, with the opcode already in `0x` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressingRow {
    pub mode: String,
    pub opcode: String,
    pub bytes: String,
    pub cycles: String,
}
impl AddressingRow {
    /// The opcode as a byte, if the literal is well formed.
    pub fn opcode_byte(&self) -> Option<u8> {
        let hex = self.opcode.strip_prefix("0x")?;
        u8::from_str_radix(hex, 16).ok()
    }
}
impl fmt::Display for AddressingRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:14} {:6} {:2} {}", self.mode, self.opcode, self.bytes, self.cycles)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: String,
    pub rows: Vec<AddressingRow>,
}

/// Mnemonics from the page headings, in document order: the text up to the first space.
pub fn collect_mnemonics(doc: &Document, heading_tag: &str) -> Vec<String> {
    collect_headings(doc, heading_tag).into_iter().map(|(_, name)| name).collect()
}
fn collect_headings(doc: &Document, heading_tag: &str) -> Vec<(NodeId, String)> {
    doc.elements_by_tag_name(heading_tag)
        .into_iter()
        .map(|h| {
            let text = doc.inner_text(h);
            let name = text.split(' ').next().unwrap_or_default().to_string();
            (h, name)
        })
        .collect()
}

/// Every `stride`th table body starting at index `first`.
pub fn collect_table_bodies(doc: &Document, first: usize, stride: usize) -> Result<Vec<NodeId>, Error> {
    if stride == 0 {
        return Err(config_err!("table stride must be at least 1"));
    }
    Ok(doc
        .elements_by_tag_name("tbody")
        .into_iter()
        .skip(first)
        .step_by(stride)
        .collect())
}

/// Parses every row of a table body except the header row.
pub fn parse_rows(doc: &Document, tbody: NodeId) -> Result<Vec<AddressingRow>, Error> {
    let mut rows = Vec::new();
    for (n, tr) in doc.descendants_by_tag_name(tbody, "tr").into_iter().enumerate().skip(1) {
        let cells = doc.descendants_by_tag_name(tr, "td");
        if cells.len() <= IDX_CYCLES {
            return Err(layout_err!(
                Some(format!("table body node {}, row {}", tbody, n)),
                "expected at least {} cells in an addressing mode row but found {}",
                IDX_CYCLES + 1,
                cells.len()
            ));
        }
        rows.push(AddressingRow {
            mode: doc.inner_text(cells[IDX_ADDR_METHOD]),
            opcode: doc.inner_text(cells[IDX_OPCODE]).replacen('$', "0x", 1),
            bytes: doc.inner_text(cells[IDX_BYTES]),
            cycles: doc.inner_text(cells[IDX_CYCLES]),
        });
    }
    Ok(rows)
}

/// Collects names and tables, pairs them up and parses each instruction's rows.
pub fn extract(doc: &Document, opts: &ExtractOptions) -> Result<Vec<Instruction>, Error> {
    let pairs = match opts.pairing {
        Pairing::Stride => pair_by_stride(doc, opts)?,
        Pairing::Adjacent => pair_by_adjacency(doc, opts)?,
    };
    let mut insts = Vec::with_capacity(pairs.len());
    for (name, tbody) in pairs {
        let rows = parse_rows(doc, tbody)?;
        insts.push(Instruction { name, rows });
    }
    Ok(insts)
}

fn pair_by_stride(doc: &Document, opts: &ExtractOptions) -> Result<Vec<(String, NodeId)>, Error> {
    let names = collect_mnemonics(doc, &opts.heading);
    let tables = collect_table_bodies(doc, opts.first_table, opts.stride)?;
    verbose_println!("{:?}", names);
    if names.len() != tables.len() {
        let msg = format!(
            "found {} <{}> headings but {} addressing mode tables",
            names.len(),
            opts.heading,
            tables.len()
        );
        if opts.strict {
            return Err(layout_err!(None, "{}", msg));
        }
        warn!("{}", msg);
    }
    // one instruction per selected table; a table past the last heading gets no name
    Ok(tables
        .into_iter()
        .enumerate()
        .map(|(i, t)| (names.get(i).cloned().unwrap_or_else(|| UNDEFINED.to_string()), t))
        .collect())
}

fn pair_by_adjacency(doc: &Document, opts: &ExtractOptions) -> Result<Vec<(String, NodeId)>, Error> {
    let headings = collect_headings(doc, &opts.heading);
    let tables = doc.elements_by_tag_name("tbody");
    verbose_println!("{:?}", headings.iter().map(|(_, n)| n).collect::<Vec<_>>());
    let mut pairs = Vec::new();
    for (i, (h, name)) in headings.iter().enumerate() {
        // node ids follow document order, so the section is the id range up to the next heading
        let end = headings.get(i + 1).map_or(usize::MAX, |(next, _)| *next);
        let found = tables
            .iter()
            .copied()
            .filter(|&t| t > *h && t < end)
            .find(|&t| is_addressing_mode_table(doc, t));
        match found {
            Some(t) => pairs.push((name.clone(), t)),
            None if opts.strict => {
                return Err(layout_err!(
                    Some(format!("heading \"{}\"", doc.inner_text(*h))),
                    "no addressing mode table follows the heading"
                ))
            }
            None => warn!("skipping {}: no addressing mode table follows its heading", name),
        }
    }
    Ok(pairs)
}
fn is_addressing_mode_table(doc: &Document, tbody: NodeId) -> bool {
    doc.descendants_by_tag_name(tbody, "tr")
        .first()
        .and_then(|&tr| {
            let mut cells = doc.descendants_by_tag_name(tr, "td");
            cells.extend(doc.descendants_by_tag_name(tr, "th"));
            cells.sort_unstable();
            cells.first().copied()
        })
        .map(|cell| doc.inner_text(cell).eq_ignore_ascii_case("addressing mode"))
        .unwrap_or(false)
}
