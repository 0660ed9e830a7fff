//! Terminal output for the buddybot shell

use buddy_core::Emotion;
use colored::*;
use crossterm::terminal::size;

use crate::panel::StatusPanel;
use crate::reminder::Notification;

fn terminal_width() -> usize {
    size().map(|(w, _)| w as usize).unwrap_or(80)
}

/// Display startup banner
pub fn display_banner() {
    let banner_width = std::cmp::min(60, terminal_width().saturating_sub(4)).max(40);
    let border = "─".repeat(banner_width - 2);

    println!();
    println!("{}", format!("┌{border}┐").blue());
    let title = "buddybot - your coding buddy";
    println!(
        "{}{}{}",
        "│  ".blue(),
        format!("{title:<width$}", width = banner_width - 4).bold(),
        "│".blue()
    );
    println!("{}", format!("└{border}┘").blue());
    println!(
        "{}",
        "💡 Tip: edit your Python file and watch your buddy react, or type 'help'".dimmed()
    );
    println!();
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Start watching and show the buddy", "start".green());
    println!("  {} - Stop watching and hide the buddy", "stop".green());
    println!("  {} - Show the active file's latest analysis", "status".green());
    println!("  {} - Print every tracked file's analysis as JSON", "status all".green());
    println!("  {} - Switch the active file", "open <path>".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
}

/// Draw the panel at the current terminal width
pub fn print_panel(panel: &StatusPanel) {
    let width = std::cmp::min(72, terminal_width());

    for line in panel.render_lines(width) {
        let painted = match panel.state().emotion {
            Emotion::Idle => line.blue(),
            Emotion::Happy => line.green(),
            Emotion::Concerned => line.yellow(),
            Emotion::Frustrated => line.red(),
        };
        println!("{painted}");
    }

    if let Some(at) = panel.updated_at() {
        println!("{}", format!("  updated {}", at.format("%H:%M:%S")).dimmed());
    }
}

/// Show a reminder notice
pub fn print_notification(notification: &Notification) {
    println!(
        "{} {} {}",
        "💧".cyan(),
        notification.at.format("%H:%M").to_string().dimmed(),
        notification.message.cyan()
    );
}
