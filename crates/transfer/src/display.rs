//! Operator-facing terminal output.

use std::{
    fmt::Display,
    io::{self, IsTerminal},
    net::SocketAddr,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red = 31,
    Green = 32,
    Blue = 34,
}

fn styled(code: u8, text: impl Display) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

pub fn bold(text: impl Display) -> String {
    styled(1, text)
}

pub fn colored(text: impl Display, color: Color) -> String {
    styled(color as u8, text)
}

/// `"3.50 MiB"`
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / MIB)
}

/// Throughput in MiB/s. A zero duration is clamped so instant writes don't
/// divide by zero.
pub fn mib_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    bytes as f64 / MIB / elapsed.as_secs_f64().max(1e-6)
}

pub fn print_listening(addr: impl Display) {
    println!("\n🔎 {} {}", bold("Listening on:"), colored(addr, Color::Green));
}

pub fn print_incoming(file_name: &str, file_size: u64, sender: &str) {
    println!("{} {}", bold("Incoming File:"), colored(file_name, Color::Blue));
    println!("{} {}", bold("Size:"), colored(format_mib(file_size), Color::Blue));
    println!("{} {}", bold("From:"), colored(sender, Color::Blue));
}

pub fn print_download_stats(bytes: u64, elapsed: Duration) {
    println!(
        "{} {:.2} seconds",
        bold("Download time:"),
        elapsed.as_secs_f64()
    );
    println!(
        "{} {:.2} MiB/s",
        bold("Download speed:"),
        mib_per_sec(bytes, elapsed)
    );
}

pub fn print_outgoing(file_name: &str, file_size: u64, target: SocketAddr) {
    println!("{} {}", bold("Sharing:"), colored(file_name, Color::Blue));
    println!("{} {}", bold("Size:"), colored(format_mib(file_size), Color::Blue));
    println!("{} {}", bold("Sending to:"), colored(target, Color::Green));
}

pub fn print_error(message: impl Display) {
    println!("{} {}", bold("Error:"), colored(message, Color::Red));
}

/// Chunk counter shown while a received body is written out. Hidden when
/// stderr is not a terminal.
pub fn chunk_progress(total_chunks: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len} chunks")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉-");

    ProgressBar::new(total_chunks)
        .with_style(style)
        .with_message(bold("Downloading"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mib_formatting() {
        assert_eq!(format_mib(0), "0.00 MiB");
        assert_eq!(format_mib(1024 * 1024), "1.00 MiB");
        assert_eq!(format_mib(3 * 1024 * 1024 / 2), "1.50 MiB");
    }

    #[test]
    fn throughput() {
        let rate = mib_per_sec(4 * 1024 * 1024, Duration::from_secs(2));
        assert!((rate - 2.0).abs() < 1e-9);
        assert!(mib_per_sec(1, Duration::ZERO).is_finite());
    }
}
