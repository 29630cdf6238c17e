use crate::{
    chart::render_history_chart,
    config::Config,
    error::WeatherError,
    model::{CurrentConditions, capitalize},
    provider::Providers,
};

/// Where a session currently is in the ask-then-answer sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    AwaitingCityForCurrent,
    AwaitingCityForHistory,
}

/// The two report types offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Current,
    History,
}

/// One unit of user input: a menu selection or free text.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Select(Report),
    Text(&'a str),
}

/// Current-conditions result plus the city it was asked for.
#[derive(Debug, Clone)]
pub struct CurrentReport {
    pub city: String,
    pub conditions: CurrentConditions,
}

impl CurrentReport {
    /// Chat-ready summary text.
    pub fn message(&self) -> String {
        format!(
            "Current weather in {}:\n🌡 Temperature: {:.1} °C\n⛅ Description: {}",
            capitalize(&self.city),
            self.conditions.temperature_c,
            capitalize(&self.conditions.description),
        )
    }
}

/// What the surface should show next.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Show the report menu.
    Menu,
    /// Ask for a city name.
    AskCity,
    /// Current-conditions summary.
    Current(CurrentReport),
    /// Rendered history chart.
    Chart { png: Vec<u8>, caption: String },
    /// User-visible failure text.
    Error(String),
}

/// UI-agnostic interaction sequencer shared by the bot and the desktop app.
#[derive(Debug, Clone)]
pub struct Flow {
    providers: Providers,
}

impl Flow {
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Providers::from_config(config)?))
    }

    /// Advance the state machine by one unit of input.
    ///
    /// Every request branch ends back in `Idle`, success or failure. The only
    /// transition that stays put is the re-prompt for a blank city name.
    pub async fn step(
        &self,
        state: InteractionState,
        input: Input<'_>,
    ) -> (InteractionState, Reply) {
        match (state, input) {
            // Menu selections take effect in any state, matching the chat
            // surface where the menu buttons are always visible.
            (_, Input::Select(Report::Current)) => {
                (InteractionState::AwaitingCityForCurrent, Reply::AskCity)
            }
            (_, Input::Select(Report::History)) => {
                (InteractionState::AwaitingCityForHistory, Reply::AskCity)
            }
            (InteractionState::Idle, Input::Text(_)) => (InteractionState::Idle, Reply::Menu),
            (InteractionState::AwaitingCityForCurrent, Input::Text(text)) => {
                let city = text.trim();
                if city.is_empty() {
                    return (InteractionState::AwaitingCityForCurrent, Reply::AskCity);
                }
                (InteractionState::Idle, self.current_report(city).await)
            }
            (InteractionState::AwaitingCityForHistory, Input::Text(text)) => {
                let city = text.trim();
                if city.is_empty() {
                    return (InteractionState::AwaitingCityForHistory, Reply::AskCity);
                }
                (InteractionState::Idle, self.history_report(city).await)
            }
        }
    }

    async fn current_report(&self, city: &str) -> Reply {
        match self.providers.current.fetch_current(city).await {
            Ok(conditions) => Reply::Current(CurrentReport {
                city: city.to_string(),
                conditions,
            }),
            Err(err) => Reply::Error(format!("Error: {err}")),
        }
    }

    async fn history_report(&self, city: &str) -> Reply {
        let coords = match self.providers.geocoder.resolve(city).await {
            Ok(coords) => coords,
            Err(WeatherError::NotFound) => {
                return Reply::Error("Could not get coordinates for this city".to_string());
            }
            Err(err) => return Reply::Error(format!("Error: {err}")),
        };

        let series = match self.providers.history.fetch_history(coords).await {
            Ok(series) => series,
            Err(err) => return Reply::Error(format!("Error: {err}")),
        };

        match render_history_chart(&series, city) {
            Ok(png) => Reply::Chart {
                png,
                caption: "Temperature graph".to_string(),
            },
            Err(err) => Reply::Error(format!("Error: {err}")),
        }
    }
}
