use crate::core::catalog::{Category, ModelCatalog, Tier};
use crate::core::connectors::ConnectorRegistry;
use crate::core::dispatch::DispatchController;
use crate::core::session::Turn;
use crate::core::usage::Capability;
use crate::utils::text::{display_width, wrap_text};
use console::{Style, style};
use std::collections::BTreeMap;

/// Responsive bubble width for the current terminal
pub fn bubble_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 100).max(40)
}

fn text_style(dark_mode: bool) -> Style {
    if dark_mode {
        Style::new().bold().white()
    } else {
        Style::new().bold().black()
    }
}

/// Header line shown above a turn's bubble
fn turn_header(turn: &Turn, model_name: &str) -> String {
    let time = turn.created_at.format("%H:%M:%S");
    if turn.is_user() {
        format!(
            "{} {}",
            style(format!("🧑 YOU #{}", turn.id)).bold().cyan(),
            style(format!("→ {} · {}", model_name, time)).dim()
        )
    } else if turn.failed {
        format!(
            "{} {}",
            style(format!("⚠️  ERROR #{}", turn.id)).bold().red(),
            style(format!("reply to #{} · {}", turn.correlation_id, time)).dim()
        )
    } else {
        format!(
            "{} {}",
            style(format!("🤖 {} #{}", model_name, turn.id)).bold().magenta(),
            style(format!("reply to #{} · {}", turn.correlation_id, time)).dim()
        )
    }
}

/// Renders a turn as a boxed chat bubble. Failed replies get a red box in
/// the place the answer would have taken.
pub fn render_turn(turn: &Turn, model_name: &str, dark_mode: bool, max_width: usize) -> String {
    let inner = max_width.saturating_sub(4).max(1);
    let lines = wrap_text(&turn.text, inner);
    let content_width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let box_width = content_width + 4;

    let border = if turn.failed {
        Style::new().red()
    } else if turn.is_user() {
        Style::new().dim().cyan()
    } else {
        Style::new().dim().blue()
    };
    let body = if turn.failed {
        Style::new().bold().red()
    } else {
        text_style(dark_mode)
    };

    let mut out = Vec::with_capacity(lines.len() + 3);
    out.push(turn_header(turn, model_name));
    out.push(
        border
            .apply_to(format!("┌{}┐", "─".repeat(box_width - 2)))
            .to_string(),
    );
    for line in &lines {
        let padding = content_width - display_width(line);
        out.push(format!(
            "{} {}{} {}",
            border.apply_to("│"),
            body.apply_to(line),
            " ".repeat(padding),
            border.apply_to("│")
        ));
    }
    out.push(
        border
            .apply_to(format!("└{}┘", "─".repeat(box_width - 2)))
            .to_string(),
    );
    out.join("\n")
}

fn looks_like_markdown(text: &str) -> bool {
    text.contains("```") || text.contains('*') || text.contains('`') || text.contains('#')
}

/// Print a turn to stdout
pub fn display_turn(turn: &Turn, model_name: &str, dark_mode: bool) {
    if turn.is_assistant() && !turn.failed && looks_like_markdown(&turn.text) {
        println!("\n{}", turn_header(turn, model_name));
        termimad::print_text(&turn.text);
    } else {
        println!("\n{}", render_turn(turn, model_name, dark_mode, bubble_width()));
    }
}

pub fn format_models(catalog: &ModelCatalog, selected: &str) -> String {
    let mut out = vec![style("Models").bold().underlined().to_string()];
    for category in Category::ALL {
        let models = catalog.list_by_category(category);
        if models.is_empty() {
            continue;
        }
        out.push(style(category.label().to_uppercase()).dim().to_string());
        for model in models {
            let marker = if model.id == selected { "▶" } else { " " };
            let tier = match model.tier {
                Tier::Premium => style("Premium").yellow(),
                Tier::Standard => style("Standard").dim(),
            };
            out.push(format!(
                " {} {:<26} {:<26} {}",
                style(marker).bold().green(),
                model.display_name,
                style(&model.id).dim(),
                tier
            ));
        }
    }
    out.join("\n")
}

pub fn format_connectors(registry: &ConnectorRegistry) -> String {
    let mut out = vec![style("Connectors").bold().underlined().to_string()];
    for connector in registry.list() {
        let status = if connector.active {
            style("[on] ").bold().green()
        } else {
            style("[off]").dim()
        };
        out.push(format!(
            " {} {} {}",
            status,
            connector.display_name,
            style(format!("({})", connector.id)).dim()
        ));
    }
    out.join("\n")
}

pub fn format_usage(snapshot: &BTreeMap<Capability, u64>) -> String {
    let mut out = vec![style("Usage").bold().underlined().to_string()];
    for (capability, count) in snapshot {
        out.push(format!(
            " {:<14} {}",
            capability.label(),
            style(count).bold().cyan()
        ));
    }
    out.join("\n")
}

/// One line per turn, oldest first
pub fn format_transcript(controller: &DispatchController) -> String {
    let turns = controller.session().snapshot();
    if turns.is_empty() {
        return "No messages yet.".to_string();
    }
    turns
        .iter()
        .map(|turn| {
            let who = if turn.is_user() {
                style("you".to_string()).cyan()
            } else if turn.failed {
                style(format!("error → #{}", turn.correlation_id)).red()
            } else {
                style(format!(
                    "{} → #{}",
                    controller.display_name(&turn.model_id),
                    turn.correlation_id
                ))
                .magenta()
            };
            format!("#{:<3} {}: {}", turn.id, who, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display a status line from the client itself
pub fn display_notice(message: &str) {
    println!("{} {}", style("ℹ").bold().blue(), style(message).dim());
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").bold().yellow(), style(message).yellow());
}
