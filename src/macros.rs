#![allow(unused_macros, dead_code)]
// All diagnostics go to stderr; stdout carries only the generated table lines.
macro_rules! verbose_println {
    ($($p:expr),+) => {
        if (config::ARGS.verbose) {
            eprintln!($($p),+);
        }
    }
}
macro_rules! info {
    ($($p:expr),+) => {
        eprintln!(concat!(blue!("INFO"),": {}"),format_args!($($p),+))
    }
}

macro_rules! warn {
    ($($p:expr),+) => {
        eprintln!(concat!(red!("WARNING"),": {}"),format_args!($($p),+))
    }
}
macro_rules! config_err {
    ($msg:expr) => {
        Error::new(
            crate::ErrorKind::Config,
            None,
            format!("{} {}", red!("Config Error"), $msg).as_str(),
        )
    };
}
macro_rules! markup_err {
    ($offset:expr, $msg:expr) => {
        Error::new(
            crate::ErrorKind::Markup,
            Some(format!("byte offset {}", $offset)),
            format!("{} {}", red!("Markup Error"), $msg).as_str(),
        )
    };
}
macro_rules! layout_err {
    ($ctx:expr, $($msg:expr),*) => {
        Error::new(
            crate::ErrorKind::Layout,
            $ctx,
            format!("{} {}", red!("Layout Error"), format!($($msg),*)).as_str(),
        )
    };
}
macro_rules! lookup_err {
    ($ctx:expr, $($msg:expr),*) => {
        Error::new(
            crate::ErrorKind::Lookup,
            $ctx,
            format!("{} {}", red!("Lookup Error"), format!($($msg),*)).as_str(),
        )
    };
}
macro_rules! color {
    ($color: literal, $msg: expr) => {
        concat!("\x1b[", $color, "m", $msg, "\x1b[0m")
    };
}
macro_rules! red {
    ($msg:expr) => {
        color!(91, $msg)
    };
}
macro_rules! green {
    ($msg:expr) => {
        color!(92, $msg)
    };
}
macro_rules! blue {
    ($msg:expr) => {
        color!(94, $msg)
    };
}
