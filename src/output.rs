//! Console output helpers.
//! Prefixed, colored messages on a TTY; plain text when piped so scripts
//! can parse the lines.

use owo_colors::OwoColorize;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {msg}");
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {msg}");
    }
}

/// Plain line with no prefix. Used for primary output such as per-item
/// progress, which users may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// One progress line per processed item: "[3/10] executed: a -> b".
pub fn print_progress(done: usize, total: usize, msg: &str) {
    if is_tty() {
        println!("{} {}", format!("[{done}/{total}]").dimmed(), msg);
    } else {
        println!("[{done}/{total}] {msg}");
    }
}
