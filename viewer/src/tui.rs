use crate::app::App;
use crate::ui;
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tokio::sync::mpsc;

type Backend = CrosstermBackend<Stdout>;

/// Runs its closure when dropped, including while unwinding from a panic
struct OnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

fn restore_terminal() {
    // Best effort: there is nowhere left to report a failure
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Run the interactive front end until the user quits
pub async fn run(app: &mut App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let _restore = OnDrop(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    event_loop(&mut terminal, app).await
}

async fn event_loop(terminal: &mut Terminal<Backend>, app: &mut App) -> Result<()> {
    let mut events = spawn_event_reader();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit() {
            tracing::info!("Quitting after tick {}", app.sim().tick());
            return Ok(());
        }

        tokio::select! {
            _ = app.ticker_mut().tick() => app.on_tick(),
            event = events.recv() => match event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                // Resizes and other events only need a redraw
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                None => return Ok(()),
            },
        }
    }
}

/// Terminal reads block, so they happen on a dedicated thread
fn spawn_event_reader() -> mpsc::UnboundedReceiver<io::Result<Event>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        let event = event::read();
        let failed = event.is_err();
        if tx.send(event).is_err() || failed {
            break;
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_restore_runs_on_panic() {
        static RESTORED: AtomicBool = AtomicBool::new(false);

        let result = panic::catch_unwind(|| {
            let _restore = OnDrop(|| RESTORED.store(true, Ordering::SeqCst));
            panic!("draw failed");
        });

        assert!(result.is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }

    #[test]
    fn test_restore_runs_on_normal_exit() {
        let mut restored = false;
        {
            let _restore = OnDrop(|| restored = true);
        }
        assert!(restored);
    }
}
