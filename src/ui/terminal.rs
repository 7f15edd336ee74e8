use {
    crate::{
        blacklist::BlacklistStore,
        error::Result,
        pipeline::Pipeline,
        state::{Command, DashboardState},
    },
    crossterm::event::{self, Event, KeyEventKind},
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{io::Stdout, time::Duration},
};

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the dashboard event loop until the operator quits
///
/// Pipeline runs happen inline: the screen shows "Running bot..." and input
/// is not read until the run completes.
pub async fn run_dashboard(
    pipeline: &Pipeline,
    blacklist: &mut BlacklistStore,
    monitored: &[String],
) -> Result<()> {
    let mut state = DashboardState::new(blacklist);
    match pipeline.analysis().await {
        Ok(analysis) => state.set_analysis(analysis),
        Err(e) => {
            log::error!("Initial analysis failed: {}", e);
            state.set_status(format!("Analysis unavailable: {}", e));
        }
    }

    // Setup terminal
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;
    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen keeps stderr logs off the dashboard buffer
    if let Err(e) = crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    ) {
        crossterm::terminal::disable_raw_mode().ok();
        return Err(e.into());
    }

    let result = match terminal.clear() {
        Ok(()) => event_loop(&mut terminal, &mut state, pipeline, blacklist, monitored).await,
        Err(e) => Err(e.into()),
    };

    // Cleanup - restore terminal state even when the loop failed
    let left = crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    );
    let raw_off = crossterm::terminal::disable_raw_mode();

    result?;
    left?;
    raw_off?;
    Ok(())
}

async fn event_loop(
    terminal: &mut DashboardTerminal,
    state: &mut DashboardState,
    pipeline: &Pipeline,
    blacklist: &mut BlacklistStore,
    monitored: &[String],
) -> Result<()> {
    loop {
        draw(terminal, state)?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match Command::from_key(key.code) {
            Some(Command::Quit) => break,
            Some(Command::Show(view)) => state.set_view(view),
            Some(Command::RunPipeline) => {
                state.set_status("Running bot...");
                draw(terminal, state)?;

                let report = pipeline.run_once(monitored, blacklist).await;
                state.apply_run(report);
                state.sync_blacklist(blacklist);
            }
            None => {}
        }
    }

    Ok(())
}

fn draw(terminal: &mut DashboardTerminal, state: &DashboardState) -> Result<()> {
    terminal.draw(|f| {
        let area = f.size();
        crate::ui::layout::render_layout(f, area, state);
    })?;
    Ok(())
}
