use ratatui::Frame;

use crate::{
    ui::{LeaderboardOverlay, NamePromptOverlay},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Training screen - target, live stats and round log
pub struct TrainingScreen;

impl Screen for TrainingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Name prompt drawn over the finished session
pub struct NamePromptScreen;

impl Screen for NamePromptScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        f.render_widget(NamePromptOverlay(app), f.area());
    }
}

/// Leaderboard drawn over the training screen
pub struct LeaderboardScreen;

impl Screen for LeaderboardScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
        f.render_widget(LeaderboardOverlay(app), f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Training => Box::new(TrainingScreen),
        AppState::NamePrompt => Box::new(NamePromptScreen),
        AppState::Leaderboard => Box::new(LeaderboardScreen),
    }
}
