use std::time::Duration;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Ok,
    Error,
}

impl Level {
    fn tag(self) -> ColoredString {
        match self {
            Level::Info => "INF".bold().blue(),
            Level::Ok => "OK".bold().green(),
            Level::Error => "ERR".bold().red(),
        }
    }
}

pub fn status_line(level: Level, message: &str) -> String {
    format!(
        "{}{}{} {}",
        "[".bold().white(),
        level.tag(),
        "]".bold().white(),
        message
    )
}

pub fn print_status(level: Level, message: &str) {
    match level {
        Level::Error => eprintln!("{}", status_line(level, message)),
        _ => println!("{}", status_line(level, message)),
    }
}

pub fn format_kv_line(label: &str, value: &str) -> String {
    format!(":: {:<12}: {}", label, value)
}

pub fn format_opt_value<'a>(v: Option<&'a str>, default: &'a str) -> &'a str {
    match v {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

/// Spinner on stderr for a single in-flight request.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) =
        ProgressStyle::with_template(":: {spinner} {msg} :: Duration: [{elapsed_precise}]")
    {
        pb.set_style(style.tick_chars(r#"-\|/ "#));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
