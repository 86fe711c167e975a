use crate::driver::Ticker;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shared::{ParamName, MAX_WORLD_SIZE};
use sim::{SimError, Simulation};

const PARAM_COUNT: usize = ParamName::ALL.len();

/// Interactive state behind the terminal UI
pub struct App {
    sim: Simulation,
    ticker: Ticker,
    selected: usize,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(sim: Simulation) -> Self {
        let ticker = Ticker::new(sim.tick_interval());
        Self {
            sim,
            ticker,
            selected: 0,
            status: String::from("Stopped"),
            should_quit: false,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected(&self) -> ParamName {
        ParamName::ALL[self.selected]
    }

    /// Whether a parameter can be edited in the current state
    pub fn is_editable(&self, name: ParamName) -> bool {
        !self.is_running() || name == ParamName::SimulationSpeed
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let fine = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.toggle_running(),
            KeyCode::Char('s') | KeyCode::Enter => self.step_once(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Up => self.selected = (self.selected + PARAM_COUNT - 1) % PARAM_COUNT,
            KeyCode::Down => self.selected = (self.selected + 1) % PARAM_COUNT,
            KeyCode::Left => self.adjust(-1, fine),
            KeyCode::Right => self.adjust(1, fine),
            _ => {}
        }
    }

    /// Advance one tick on behalf of the ticker
    pub fn on_tick(&mut self) {
        if let Err(err) = self.sim.step() {
            self.ticker.stop();
            self.status = format!("Stopped: {err}");
        }
    }

    fn toggle_running(&mut self) {
        if self.is_running() {
            self.ticker.stop();
            self.status = String::from("Stopped");
        } else {
            self.ticker.set_period(self.sim.tick_interval());
            self.ticker.start();
            self.status = String::from("Running");
        }
    }

    fn step_once(&mut self) {
        if self.is_running() {
            self.status = String::from("Stop the simulation to step");
            return;
        }
        match self.sim.step() {
            Ok(summary) => self.status = format!("Stepped to tick {}", summary.tick),
            Err(err) => self.status = format!("Step failed: {err}"),
        }
    }

    fn reset(&mut self) {
        if self.is_running() {
            self.status = String::from("Stop the simulation to reset");
            return;
        }
        match self.sim.reset() {
            Ok(()) => self.status = String::from("Reset"),
            Err(err) => self.status = format!("Reset failed: {err}"),
        }
    }

    /// Move the selected parameter one notch in `direction`
    fn adjust(&mut self, direction: i64, fine: bool) {
        let name = self.selected();
        if !self.is_editable(name) {
            self.status = format!("{} is locked while running", name.label());
            return;
        }

        let current = self.sim.params().get(name);
        let result = match name {
            ParamName::InitialPrey | ParamName::InitialPredator => {
                let value = (current as i64 + direction).clamp(0, 99);
                self.sim.set_initial_density(name, value as u32)
            }
            ParamName::WorldSize => {
                let tens = (current as i64 / 10 + direction).clamp(1, MAX_WORLD_SIZE as i64 / 10);
                self.sim.set_parameter(name, (tens * 10) as f64)
            }
            _ => {
                let value = next_value(name, current, direction, fine);
                self.sim.set_parameter(name, value)
            }
        };

        self.report(name, result);
        if name == ParamName::SimulationSpeed {
            self.ticker.set_period(self.sim.tick_interval());
        }
    }

    fn report(&mut self, name: ParamName, result: Result<(), SimError>) {
        self.status = match result {
            Ok(()) => format!("{} = {}", name.label(), self.sim.params().get(name)),
            Err(err) => err.to_string(),
        };
    }
}

/// Notch sizes: probabilities move by 0.01 (0.001 fine), speed by 0.1
fn next_value(name: ParamName, current: f64, direction: i64, fine: bool) -> f64 {
    let (min, max) = name.range();
    let (step, scale) = match name {
        ParamName::SimulationSpeed => (0.1, 10.0),
        _ if fine => (0.001, 1000.0),
        _ => (0.01, 1000.0),
    };

    // Round to the slider resolution so repeated steps do not drift
    let value = ((current + step * direction as f64) * scale).round() / scale;
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SimParams;

    fn test_app() -> App {
        let params = SimParams {
            world_size: 20,
            ..Default::default()
        };
        App::new(Simulation::with_seed(params, 42).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn select(app: &mut App, name: ParamName) {
        while app.selected() != name {
            press(app, KeyCode::Down);
        }
    }

    #[test]
    fn test_step_and_reset_while_stopped() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.sim().tick(), 2);
        assert_eq!(app.status(), "Stepped to tick 2");

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.sim().tick(), 0);
        assert!(app.sim().time_series().is_empty());
    }

    #[tokio::test]
    async fn test_running_locks_controls() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_running());

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.sim().tick(), 0);

        select(&mut app, ParamName::BreedingPrey);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.sim().params().breeding_prey, 0.1);
        assert!(app.status().contains("locked"));

        app.on_tick();
        assert_eq!(app.sim().tick(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn test_speed_editable_while_running() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(' '));
        select(&mut app, ParamName::SimulationSpeed);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.sim().params().simulation_speed, 0.8);
        let period = app.ticker_mut().period();
        assert_eq!(period, app.sim().tick_interval());
        assert!(app.is_running());
    }

    #[test]
    fn test_probability_notches() {
        let mut app = test_app();
        select(&mut app, ParamName::MortalityPredator);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.sim().params().mortality_predator, 0.06);

        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT));
        assert_eq!(app.sim().params().mortality_predator, 0.059);

        for _ in 0..20 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.sim().params().mortality_predator, 0.0);
    }

    #[test]
    fn test_world_size_moves_in_tens() {
        let mut app = test_app();
        select(&mut app, ParamName::WorldSize);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.sim().grid_snapshot().size, 30);

        for _ in 0..5 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.sim().params().world_size, 10);
    }

    #[test]
    fn test_density_keys_are_coupled() {
        let mut app = test_app();
        select(&mut app, ParamName::InitialPrey);
        for _ in 0..70 {
            press(&mut app, KeyCode::Right);
        }

        let params = app.sim().params();
        assert_eq!(params.initial_prey, 99);
        assert_eq!(params.initial_predator, 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = test_app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), ParamName::SimulationSpeed);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), ParamName::WorldSize);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_next_value_rounding() {
        let speed = next_value(ParamName::SimulationSpeed, 0.9, 1, false);
        assert_eq!(speed, 1.0);
        let capped = next_value(ParamName::BreedingPrey, 0.995, 1, false);
        assert_eq!(capped, 1.0);
    }
}
