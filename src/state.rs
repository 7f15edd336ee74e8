use {
    crate::{
        analysis::AnalysisReport,
        blacklist::BlacklistStore,
        pipeline::{RunEvent, RunReport},
    },
    chrono::{DateTime, Local},
    crossterm::event::KeyCode,
};

/// Which panel the dashboard body shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Analysis,
    BlacklistedTokens,
    BlacklistedDevs,
}

/// Operator commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RunPipeline,
    Show(View),
    Quit,
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('r') => Some(Command::RunPipeline),
            KeyCode::Char('a') => Some(Command::Show(View::Analysis)),
            KeyCode::Char('t') => Some(Command::Show(View::BlacklistedTokens)),
            KeyCode::Char('d') => Some(Command::Show(View::BlacklistedDevs)),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Everything the dashboard renders
pub struct DashboardState {
    view: View,
    analysis: Option<AnalysisReport>,
    events: Vec<RunEvent>,
    status: String,
    run_count: usize,
    last_run_at: Option<DateTime<Local>>,
    blacklisted_tokens: Vec<String>,
    blacklisted_devs: Vec<String>,
}

impl DashboardState {
    pub fn new(blacklist: &BlacklistStore) -> Self {
        let mut state = Self {
            view: View::Analysis,
            analysis: None,
            events: Vec::new(),
            status: "Idle".to_string(),
            run_count: 0,
            last_run_at: None,
            blacklisted_tokens: Vec::new(),
            blacklisted_devs: Vec::new(),
        };
        state.sync_blacklist(blacklist);
        state
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn analysis(&self) -> Option<&AnalysisReport> {
        self.analysis.as_ref()
    }

    pub fn set_analysis(&mut self, analysis: AnalysisReport) {
        self.analysis = Some(analysis);
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn last_run_at(&self) -> Option<DateTime<Local>> {
        self.last_run_at
    }

    pub fn blacklisted_tokens(&self) -> &[String] {
        &self.blacklisted_tokens
    }

    pub fn blacklisted_devs(&self) -> &[String] {
        &self.blacklisted_devs
    }

    /// Copy the current blacklists for display
    pub fn sync_blacklist(&mut self, blacklist: &BlacklistStore) {
        self.blacklisted_tokens = blacklist.tokens().to_vec();
        self.blacklisted_devs = blacklist.devs().to_vec();
    }

    /// Record a run, including one that aborted part way
    ///
    /// Events always come from the run; the analysis is only replaced when
    /// the run produced one.
    pub fn apply_run(&mut self, report: RunReport) {
        self.run_count += 1;
        self.last_run_at = Some(Local::now());
        self.status = match &report.aborted {
            Some(reason) => format!(
                "Run #{} aborted after {} processed, {} inserted: {}",
                self.run_count,
                report.tokens.len(),
                report.inserted_count(),
                reason
            ),
            None => format!(
                "Run #{} finished: {} processed, {} inserted",
                self.run_count,
                report.tokens.len(),
                report.inserted_count()
            ),
        };
        self.events = report.events;
        if let Some(analysis) = report.analysis {
            self.analysis = Some(analysis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{EventLevel, RunEvent, TokenOutcome, TokenReport, TradeResult};

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::Char('r')), Some(Command::RunPipeline));
        assert_eq!(
            Command::from_key(KeyCode::Char('t')),
            Some(Command::Show(View::BlacklistedTokens))
        );
        assert_eq!(
            Command::from_key(KeyCode::Char('d')),
            Some(Command::Show(View::BlacklistedDevs))
        );
        assert_eq!(Command::from_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_aborted_run_keeps_partial_events_and_previous_analysis() {
        let document = serde_json::from_str(
            r#"{"rugcheck_api_url": "http://localhost/check",
                "filters": {"min_liquidity": 0, "min_market_cap": 0},
                "blacklisted_coins": ["T1"]}"#,
        )
        .unwrap();
        let store = BlacklistStore::from_document("unused.json", document);
        let mut state = DashboardState::new(&store);
        assert_eq!(state.blacklisted_tokens().to_vec(), vec!["T1".to_string()]);
        state.set_analysis(crate::analysis::analyze(Vec::new()));

        let bought = RunEvent {
            level: EventLevel::Success,
            message: "Buy executed for token: TokA".to_string(),
        };
        let abort = RunEvent {
            level: EventLevel::Error,
            message: "Run aborted at TokB: database is locked".to_string(),
        };
        state.apply_run(RunReport {
            tokens: vec![TokenReport {
                address: "TokA".to_string(),
                outcome: TokenOutcome::Inserted {
                    id: 1,
                    trade: TradeResult::Executed,
                },
            }],
            events: vec![bought.clone(), abort.clone()],
            analysis: None,
            aborted: Some(abort.message.clone()),
        });

        assert_eq!(state.run_count(), 1);
        assert!(state.last_run_at().is_some());
        assert!(state.analysis().is_some());
        assert_eq!(state.events().to_vec(), vec![bought, abort]);
        assert!(state.status().contains("aborted after 1 processed, 1 inserted"));
    }
}
