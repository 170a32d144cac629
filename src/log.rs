//! Progress logging: one line per generation phase, with a colored
//! `[module]` prefix.
//!
//! ```ignore
//! crate::log!("posts"; "rendered {} posts", count);
//! ```

use colored::{ColoredString, Colorize};

/// Log a message with a colored `[module]` prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::log::log($module, &format!($($arg)*))
    }};
}

pub fn log(module: &str, message: &str) {
    println!("{} {}", prefix(module), message);
}

fn prefix(module: &str) -> ColoredString {
    let text = format!("[{}]", module);
    match module {
        "pages" => text.as_str().blue().bold(),
        "posts" => text.as_str().green().bold(),
        "index" => text.as_str().cyan().bold(),
        "css" => text.as_str().magenta().bold(),
        "rss" => text.as_str().yellow().bold(),
        _ => text.as_str().normal(),
    }
}
