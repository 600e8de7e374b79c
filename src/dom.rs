//! A small HTML tree for saved copies of the reference page.
//!
//! This is not a general purpose HTML5 parser. It understands enough of the tree construction
//! rules that a browser applies to table-heavy reference pages that `getElementsByTagName`-style
//! queries give the same answers here as they would in the browser:
//!
//! - void elements (`<br>`, `<img>`, ...) never take children
//! - `<td>`/`<th>` close an open cell, `<tr>` closes an open row, `<p>` and `<li>` close an open sibling
//! - a `<tr>` placed directly in a `<table>` gets an implicit `<tbody>` (and a stray cell an implicit `<tr>`)
//! - end tags without a matching open element are ignored
//!
//! Nodes live in an arena and are allocated in document order, so a node's id is also its
//! position in a pre-order walk of the tree.
use super::*;
use lazy_static::lazy_static;
use regex::Regex;

pub type NodeId = usize;
/// id of the synthetic document node that owns everything else
pub const ROOT: NodeId = 0;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];
/// elements whose start tag closes an open <p>
const CLOSES_P: &[&str] = &[
    "p", "div", "table", "ul", "ol", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "hr",
];
const TABLE_SECTIONS: &[&str] = &["tbody", "thead", "tfoot"];

lazy_static! {
    static ref RE_START_TAG: Regex =
        Regex::new(r#"^<([A-Za-z][A-Za-z0-9]*)((?:\s+[^\s/>"'=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#)
            .unwrap();
    static ref RE_END_TAG: Regex = Regex::new(r"^</([A-Za-z][A-Za-z0-9]*)\s*>").unwrap();
    static ref RE_CHAR_REF: Regex = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").unwrap();
    // ASCII whitespace only: a no-break space survives, as it does in a browser's innerText
    static ref RE_WHITESPACE: Regex = Regex::new(r"[ \t\n\r\x0C]+").unwrap();
}

#[derive(Debug, PartialEq)]
enum Token {
    StartTag { name: String },
    EndTag { name: String },
    Text(String),
}

#[derive(Debug)]
pub enum NodeKind {
    Document,
    Element { name: String },
    Text(String),
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

/// A parsed page. Built once with [`Document::parse`] and only read afterwards.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(html: &str) -> Result<Document, Error> {
        let tokens = tokenize(html)?;
        let mut builder = TreeBuilder::new();
        for token in tokens {
            builder.process(token);
        }
        Ok(builder.doc)
    }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn children(&self, id: NodeId) -> &[NodeId] { &self.nodes[id].children }
    /// Tag name of an element (lowercase), None for text and the document node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { name } => Some(name.as_str()),
            _ => None,
        }
    }
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool { self.name(id) == Some(tag) }
    /// Every element with the given tag, in document order.
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        (0..self.nodes.len()).filter(|&id| self.is_element(id, tag)).collect()
    }
    /// Elements with the given tag inside `node` (not including `node` itself), in document order.
    pub fn descendants_by_tag_name(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.is_element(id, tag) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        found
    }
    /// Element children of `node` with the given tag.
    #[cfg(test)]
    pub fn children_by_tag_name(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&id| self.is_element(id, tag))
            .collect()
    }
    /// Rendered-ish text of a node: all descendant text with runs of ASCII whitespace collapsed
    /// and trimmed. `&nbsp;` stays U+00A0, so it never separates a mnemonic from its description.
    pub fn inner_text(&self, node: NodeId) -> String {
        let mut raw = String::new();
        self.collect_text(node, &mut raw);
        let trimmed = raw.trim_matches(|ch: char| matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C'));
        RE_WHITESPACE.replace_all(trimmed, " ").into_owned()
    }
    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { name, .. } if name == "br" => out.push('\n'),
            NodeKind::Element { name, .. } if name == "script" || name == "style" => {}
            _ => {
                for &child in &self.nodes[node].children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

/// Splits markup into tags and text. Comments, doctypes and processing instructions are dropped.
fn tokenize(html: &str) -> Result<Vec<Token>, Error> {
    let mut output = Vec::new();
    let mut text = String::new();
    let mut pos = 0;
    // a '<' at or past the last '>' can never be closed
    let last_gt = html.rfind('>');
    while pos < html.len() {
        let rest = &html[pos..];
        if !rest.starts_with('<') {
            // plain text runs up to the next '<'
            let end = rest.find('<').unwrap_or(rest.len());
            text.push_str(&rest[..end]);
            pos += end;
            continue;
        }
        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .ok_or_else(|| markup_err!(pos, "unterminated comment"))?;
            pos += 4 + end + 3;
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').ok_or_else(|| markup_err!(pos, "unterminated declaration"))?;
            pos += end + 1;
            continue;
        }
        if let Some(c) = RE_START_TAG.captures(rest) {
            flush_text(&mut text, &mut output);
            let name = c[1].to_ascii_lowercase();
            pos += c[0].len();
            let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
            output.push(Token::StartTag { name: name.clone() });
            if raw {
                // everything up to the matching end tag is text
                let body = &html[pos..];
                let end = find_end_tag(body, &name).ok_or_else(|| markup_err!(pos, format!("unterminated <{}> element", name)))?;
                let content = &body[..end];
                if !content.is_empty() {
                    output.push(Token::Text(if name == "script" || name == "style" {
                        content.to_string()
                    } else {
                        decode_entities(content)
                    }));
                }
                pos += end;
            }
            continue;
        }
        if let Some(c) = RE_END_TAG.captures(rest) {
            flush_text(&mut text, &mut output);
            output.push(Token::EndTag {
                name: c[1].to_ascii_lowercase(),
            });
            pos += c[0].len();
            continue;
        }
        // a '<' that doesn't start a tag; a tag that never closes is an error, anything else is text
        let looks_like_tag = rest[1..].starts_with(|ch: char| ch.is_ascii_alphabetic() || ch == '/');
        if looks_like_tag && last_gt.map_or(true, |gt| gt < pos) {
            return Err(markup_err!(pos, "unterminated tag"));
        }
        text.push('<');
        pos += 1;
    }
    flush_text(&mut text, &mut output);
    Ok(output)
}
fn flush_text(text: &mut String, output: &mut Vec<Token>) {
    if !text.is_empty() {
        output.push(Token::Text(decode_entities(text)));
        text.clear();
    }
}
/// Offset of the first `</name` (any case) in `body`.
fn find_end_tag(body: &str, name: &str) -> Option<usize> {
    body.match_indices("</").map(|(i, _)| i).find(|&i| {
        body.as_bytes()
            .get(i + 2..i + 2 + name.len())
            .map_or(false, |tag| tag.eq_ignore_ascii_case(name.as_bytes()))
    })
}
/// Replaces the character references this page uses. Unknown named references stay verbatim.
pub fn decode_entities(s: &str) -> String {
    RE_CHAR_REF
        .replace_all(s, |c: &regex::Captures| {
            let r = &c[1];
            let decoded = if let Some(hex) = r.strip_prefix("#x").or_else(|| r.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = r.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match r {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| c[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}

struct TreeBuilder {
    doc: Document,
    /// open elements, innermost last; always starts with ROOT
    open: Vec<NodeId>,
}
impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            doc: Document {
                nodes: vec![Node {
                    kind: NodeKind::Document,
                    children: Vec::new(),
                }],
            },
            open: vec![ROOT],
        }
    }
    fn current(&self) -> NodeId { *self.open.last().unwrap_or(&ROOT) }
    fn current_is(&self, tag: &str) -> bool { self.doc.is_element(self.current(), tag) }
    fn append(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let id = self.doc.nodes.len();
        self.doc.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        self.doc.nodes[parent].children.push(id);
        id
    }
    fn open_element(&mut self, name: &str) {
        let id = self.append(NodeKind::Element { name: name.to_string() });
        if !VOID_ELEMENTS.contains(&name) {
            self.open.push(id);
        }
    }
    /// Pops open elements through the innermost one named in `targets`, but only if it is
    /// found before any element named in `boundary`. Returns true if something was closed.
    fn close_through(&mut self, targets: &[&str], boundary: &[&str]) -> bool {
        for depth in (1..self.open.len()).rev() {
            let name = self.doc.name(self.open[depth]).unwrap_or("");
            if targets.contains(&name) {
                self.open.truncate(depth);
                return true;
            }
            if boundary.contains(&name) {
                return false;
            }
        }
        false
    }
    fn process(&mut self, token: Token) {
        match token {
            Token::Text(t) => {
                self.append(NodeKind::Text(t));
            }
            Token::EndTag { name } => {
                self.close_through(&[name.as_str()], &[]);
            }
            Token::StartTag { name } => {
                self.implied_end_tags(name.as_str());
                self.open_element(name.as_str());
            }
        }
    }
    fn implied_end_tags(&mut self, name: &str) {
        if CLOSES_P.contains(&name) {
            self.close_through(&["p"], &["td", "th", "table", "li", "div", "body", "html"]);
        }
        match name {
            "li" => {
                self.close_through(&["li"], &["ul", "ol"]);
            }
            "tbody" | "thead" | "tfoot" => {
                self.close_through(TABLE_SECTIONS, &["table"]);
            }
            "tr" => {
                self.close_through(&["tr"], &["table", "tbody", "thead", "tfoot"]);
                if self.current_is("table") {
                    self.open_element("tbody");
                }
            }
            "td" | "th" => {
                self.close_through(&["td", "th"], &["tr", "table"]);
                if self.current_is("table") {
                    self.open_element("tbody");
                }
                if TABLE_SECTIONS.iter().any(|s| self.current_is(s)) {
                    self.open_element("tr");
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn texts(doc: &Document, ids: &[NodeId]) -> Vec<String> { ids.iter().map(|&id| doc.inner_text(id)).collect() }
    #[test]
    fn elements_in_document_order() -> Result<(), Error> {
        let doc = Document::parse("<div><h3>ADC - Add</h3><p>x<h3>AND - And</h3></div><h3>ASL</h3>")?;
        let h3 = doc.elements_by_tag_name("h3");
        assert_eq!(texts(&doc, &h3), vec!["ADC - Add", "AND - And", "ASL"]);
        assert!(h3.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }
    #[test]
    fn implicit_tbody_and_unclosed_cells() -> Result<(), Error> {
        let html = "<TABLE border=1><TR><TD>Immediate<TD>$69<td>2<td>2\n<tr><td>Zero Page<td>$65<td>2<td>3</table>";
        let doc = Document::parse(html)?;
        let tbody = doc.elements_by_tag_name("tbody");
        assert_eq!(tbody.len(), 1);
        let rows = doc.children_by_tag_name(tbody[0], "tr");
        assert_eq!(rows.len(), 2);
        let cells = doc.children_by_tag_name(rows[1], "td");
        assert_eq!(texts(&doc, &cells), vec!["Zero Page", "$65", "2", "3"]);
        Ok(())
    }
    #[test]
    fn explicit_tbody_is_not_duplicated() -> Result<(), Error> {
        let doc = Document::parse("<table><tbody><tr><td>a</td></tr></tbody></table><table><tr><td>b</table>")?;
        assert_eq!(doc.elements_by_tag_name("tbody").len(), 2);
        assert_eq!(doc.elements_by_tag_name("tr").len(), 2);
        Ok(())
    }
    #[test]
    fn stray_end_tags_are_ignored() -> Result<(), Error> {
        let doc = Document::parse("<p>one</span></b>two</p></p><p>three")?;
        assert_eq!(texts(&doc, &doc.elements_by_tag_name("p")), vec!["onetwo", "three"]);
        Ok(())
    }
    #[test]
    fn paragraphs_close_before_headings() -> Result<(), Error> {
        let doc = Document::parse("<p>intro<h3>LDA - Load</h3>")?;
        let h3 = doc.elements_by_tag_name("h3")[0];
        assert!(doc.children(ROOT).contains(&h3));
        Ok(())
    }
    #[test]
    fn inner_text_collapses_whitespace() -> Result<(), Error> {
        let doc = Document::parse("<h3>\n  <a name=\"ADC\"></a>ADC  -\tAdd<br>with&nbsp;Carry </h3>")?;
        let h3 = doc.elements_by_tag_name("h3")[0];
        assert_eq!(doc.inner_text(h3), "ADC - Add with\u{a0}Carry");
        Ok(())
    }
    #[test]
    fn comments_scripts_and_doctype_are_skipped() -> Result<(), Error> {
        let html = "<!DOCTYPE html><html><head><script>if (a<b) { x('<td>') }</script></head>\
                    <body><!-- <h3>NOP</h3> --><h3>BRK</h3></body></html>";
        let doc = Document::parse(html)?;
        assert_eq!(texts(&doc, &doc.elements_by_tag_name("h3")), vec!["BRK"]);
        assert!(doc.elements_by_tag_name("td").is_empty());
        Ok(())
    }
    #[test]
    fn raw_text_end_tag_in_any_case() -> Result<(), Error> {
        let doc = Document::parse("<TITLE>6502 &amp; you</tItLe><SCRIPT>x = '</scr' + 'ipt>';</ScRiPt><h3>LDA</h3>")?;
        assert_eq!(texts(&doc, &doc.elements_by_tag_name("title")), vec!["6502 & you"]);
        assert_eq!(texts(&doc, &doc.elements_by_tag_name("h3")), vec!["LDA"]);
        Ok(())
    }
    #[test]
    fn entities() {
        assert_eq!(decode_entities("A &amp; B &lt;&#36;10&gt; &#x41; &bogus;"), "A & B <$10> A &bogus;");
    }
    #[test]
    fn lone_angle_bracket_is_text() -> Result<(), Error> {
        let doc = Document::parse("<p>1 < 2</p>")?;
        assert_eq!(doc.inner_text(doc.elements_by_tag_name("p")[0]), "1 < 2");
        Ok(())
    }
    #[test]
    fn unterminated_markup_is_an_error() {
        for html in ["<p>text<!-- never closed", "<table><tr><td", "<script>var x = 1;"] {
            match Document::parse(html) {
                Err(e) => assert_eq!(e.kind, ErrorKind::Markup, "{}", html),
                Ok(_) => panic!("expected a markup error for {:?}", html),
            }
        }
    }
}
