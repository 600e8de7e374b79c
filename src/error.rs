use std::{convert::From, fmt};

/// Simple custom Error for the extractor
pub struct Error {
    pub kind: ErrorKind,
    pub ctx: Option<String>,
    pub msg: String,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// malformed HTML that the tokenizer can't recover from
    Markup,
    /// the page doesn't have the structure the collectors expect (e.g. a short row)
    Layout,
    /// addressing mode or byte length missing from a mapping table (strict mode only)
    Lookup,
    /// invalid combination of command line options
    Config,
    /// underlying io error
    IO,
}

impl ErrorKind {
    /// Process exit status for a run that ended with this kind of error.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorKind::Markup | ErrorKind::Layout => 2,
            ErrorKind::Lookup => 3,
            ErrorKind::Config => 4,
            ErrorKind::IO => 5,
        }
    }
}

impl Error {
    pub fn new(kind: ErrorKind, ctx: Option<String>, message: &str) -> Error {
        Error {
            kind,
            ctx,
            msg: String::from(message),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, None, e.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}: {}", red!("extract::Error"), self.msg) }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)?;
        if let Some(ctx) = self.ctx.as_ref() {
            write!(f, "\nContext: {}", ctx)?;
        }
        Ok(())
    }
}
impl std::error::Error for Error {}
