use {
    crate::{
        analysis::Describe,
        pipeline::EventLevel,
        state::{DashboardState, View},
        ui::renderer::{format_flag, format_stat, format_usd, short_address},
    },
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
        Frame,
    },
};

/// Render the main UI layout
pub fn render_layout(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(8), // Run events
            Constraint::Length(3), // Footer/Status
        ])
        .split(area);

    render_header(f, chunks[0]);

    // The analysis stays on screen; a blacklist view adds a pane above it
    let blacklist = match state.view() {
        View::Analysis => None,
        View::BlacklistedTokens => Some(("Blacklisted Tokens", state.blacklisted_tokens())),
        View::BlacklistedDevs => Some(("Blacklisted Developers", state.blacklisted_devs())),
    };

    match blacklist {
        Some((title, entries)) => {
            let body = RatLayout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(8), Constraint::Min(0)])
                .split(chunks[1]);
            render_list(f, body[0], title, entries);
            render_analysis(f, body[1], state);
        }
        None => render_analysis(f, chunks[1], state),
    }

    render_events(f, chunks[2], state);
    render_footer(f, chunks[3], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Block::default()
        .borders(Borders::ALL)
        .title("Tokenwatch - Trading Bot Dashboard");

    let text = vec![Line::from(vec![
        Span::styled(
            "[r]",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Run bot  "),
        Span::styled("[t]", Style::default().fg(Color::Cyan)),
        Span::raw(" Blacklisted tokens  "),
        Span::styled("[d]", Style::default().fg(Color::Cyan)),
        Span::raw(" Blacklisted devs  "),
        Span::styled("[a]", Style::default().fg(Color::Cyan)),
        Span::raw(" Analysis  "),
        Span::styled("[q]", Style::default().fg(Color::Cyan)),
        Span::raw(" Quit"),
    ])];

    f.render_widget(Paragraph::new(text).block(header), area);
}

fn render_analysis(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Token table
            Constraint::Percentage(25), // Rugged stats
            Constraint::Percentage(25), // Bundled stats
        ])
        .split(area);

    let Some(analysis) = state.analysis() else {
        let placeholder = Paragraph::new("No analysis loaded yet")
            .block(Block::default().borders(Borders::ALL).title("Token Analysis"));
        f.render_widget(placeholder, area);
        return;
    };

    let header = Row::new(vec![
        "Id", "Symbol", "Name", "Price", "Liquidity", "MCap", "CEX", "Rugged", "Pumped",
        "Bundled", "Dev", "Audit", "Time",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = analysis
        .observations
        .iter()
        .rev() // Show newest first
        .map(|obs| {
            let color = if obs.is_rugged {
                Color::Red
            } else if obs.is_bundled_supply {
                Color::Magenta
            } else {
                Color::Green
            };

            Row::new(vec![
                obs.id.map(|id| id.to_string()).unwrap_or_default(),
                obs.symbol.clone(),
                obs.name.clone(),
                format_usd(obs.price),
                format_usd(obs.liquidity),
                format_usd(obs.market_cap),
                format_flag(obs.is_cex_listed).to_string(),
                format_flag(obs.is_rugged).to_string(),
                format_flag(obs.is_pumped).to_string(),
                format_flag(obs.is_bundled_supply).to_string(),
                short_address(&obs.dev_address),
                obs.audit_status.clone(),
                obs.timestamp.clone().unwrap_or_default(),
            ])
            .style(Style::default().fg(color))
        })
        .collect();

    let widths = [
        Constraint::Length(5),  // Id
        Constraint::Length(8),  // Symbol
        Constraint::Length(14), // Name
        Constraint::Length(12), // Price
        Constraint::Length(10), // Liquidity
        Constraint::Length(10), // MCap
        Constraint::Length(4),  // CEX
        Constraint::Length(7),  // Rugged
        Constraint::Length(7),  // Pumped
        Constraint::Length(8),  // Bundled
        Constraint::Length(10), // Dev
        Constraint::Length(8),  // Audit
        Constraint::Length(19), // Time
    ];

    let title = format!("Token Analysis ({} rows)", analysis.observations.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, chunks[0]);

    render_describe(f, chunks[1], "Rugged Tokens Analysis", &analysis.rugged);
    render_describe(f, chunks[2], "Bundled Supply Tokens Analysis", &analysis.bundled);
}

fn render_describe(f: &mut Frame, area: Rect, title: &str, describe: &Describe) {
    let header = Row::new(vec![
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = describe
        .columns
        .iter()
        .map(|(name, stats)| {
            Row::new(vec![
                name.to_string(),
                stats.count.to_string(),
                format_stat(stats.mean),
                format_stat(stats.std),
                format_stat(stats.min),
                format_stat(stats.p25),
                format_stat(stats.p50),
                format_stat(stats.p75),
                format_stat(stats.max),
            ])
        })
        .collect();

    let mut widths = vec![Constraint::Length(11), Constraint::Length(6)];
    widths.extend(std::iter::repeat(Constraint::Length(13)).take(7));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(table, area);
}

fn render_list(f: &mut Frame, area: Rect, title: &str, entries: &[String]) {
    let items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new("(none)")]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ListItem::new(format!("{:>3}  {}", i, entry)))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", title, entries.len())),
    );
    f.render_widget(list, area);
}

fn render_events(f: &mut Frame, area: Rect, state: &DashboardState) {
    let lines: Vec<Line> = state
        .events()
        .iter()
        .rev()
        .map(|event| {
            let color = match event.level {
                EventLevel::Info => Color::Gray,
                EventLevel::Success => Color::Green,
                EventLevel::Warn => Color::Yellow,
                EventLevel::Error => Color::Red,
            };
            Line::from(Span::styled(event.message.clone(), Style::default().fg(color)))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Last Run");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let text = vec![Line::from(vec![
        Span::styled("Status: ", Style::default().fg(Color::Green)),
        Span::raw(state.status().to_string()),
        Span::raw(" | "),
        Span::styled("Runs: ", Style::default().fg(Color::Cyan)),
        Span::raw(state.run_count().to_string()),
        Span::raw(" | "),
        Span::styled("Last run: ", Style::default().fg(Color::Cyan)),
        Span::raw(
            state
                .last_run_at()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string()),
        ),
        Span::raw(" | "),
        Span::styled("Blacklisted: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "{} tokens / {} devs",
            state.blacklisted_tokens().len(),
            state.blacklisted_devs().len()
        )),
    ])];

    let footer = Block::default().borders(Borders::ALL).title("Status");
    f.render_widget(Paragraph::new(text).block(footer), area);
}
