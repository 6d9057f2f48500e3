//! Event loop driving [`App`] against the live service.

use anyhow::Result;
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedSender};
use tracing::{debug, info, warn};

use super::app::{App, AppEvent, Effect};
use super::{read_event, TuiTerminal};
use crate::config::Config;
use crate::search::{Debouncer, FetchTicket};
use crate::service::{MutationOutcome, PoliticianService};

/// Run the dashboard until the user quits.
pub async fn run(config: &Config, service: Arc<PoliticianService>, initial_url: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let search_tx = tx.clone();
    let mut debouncer = Debouncer::new(
        Duration::from_millis(config.search.debounce_ms),
        move |term: String| {
            let _ = search_tx.send(AppEvent::SearchFired(term));
        },
    );

    let mut app = App::new(
        initial_url,
        config.search.default_per_page,
        &config.endpoint,
    );
    let mut terminal = TuiTerminal::new()?;
    info!("dashboard started at {}", app.current_url());

    let mut pending = app.start();
    'main: loop {
        for effect in pending.drain(..) {
            if effect == Effect::Quit {
                break 'main;
            }
            perform(effect, &service, &mut debouncer, &tx);
        }

        loop {
            match rx.try_recv() {
                Ok(event) => pending.extend(app.handle_event(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("event channel disconnected");
                    break;
                }
            }
        }
        if !pending.is_empty() {
            continue;
        }

        terminal.terminal().draw(|frame| app.render(frame))?;

        if let Some(Event::Key(key)) = read_event(config.ui.tick_ms)? {
            pending.extend(app.handle_key(key));
        }
    }

    debouncer.cancel();
    terminal.restore()?;
    info!("dashboard closed");
    Ok(())
}

/// Start the work an effect asks for. Results come back through `tx`.
fn perform(
    effect: Effect,
    service: &Arc<PoliticianService>,
    debouncer: &mut Debouncer<String>,
    tx: &UnboundedSender<AppEvent>,
) {
    match effect {
        Effect::ScheduleSearch(text) => debouncer.call(text),
        Effect::FlushSearch => {
            if !debouncer.flush() {
                debug!("no search pending");
            }
        }
        Effect::FetchList(ticket) => spawn_list(service, tx, ticket, false),
        Effect::RefreshList(ticket) => spawn_list(service, tx, ticket, true),
        Effect::FetchStatistics => spawn_statistics(service, tx, false),
        Effect::RefreshStatistics => spawn_statistics(service, tx, true),
        Effect::Update { dialog, id, update } => {
            let service = Arc::clone(service);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = service.update(&id, &update).await.into();
                let _ = tx.send(AppEvent::MutationDone { dialog, outcome });
            });
        }
        Effect::Delete { dialog, id } => {
            let service = Arc::clone(service);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = service.delete(&id).await.into();
                let _ = tx.send(AppEvent::MutationDone { dialog, outcome });
            });
        }
        Effect::Import { dialog, path } => {
            let service = Arc::clone(service);
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = match service.import_file(&path).await {
                    Ok(ack) => MutationOutcome::Done(ack.message),
                    Err(e) => MutationOutcome::Failed(e.to_string()),
                };
                let _ = tx.send(AppEvent::MutationDone { dialog, outcome });
            });
        }
        Effect::Quit => {}
    }
}

fn spawn_list(
    service: &Arc<PoliticianService>,
    tx: &UnboundedSender<AppEvent>,
    ticket: FetchTicket,
    refresh: bool,
) {
    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let params = ticket.descriptor.to_list_params();
        let result = if refresh {
            service.refresh_list(&params).await
        } else {
            service.list(&params).await
        };
        let _ = tx.send(AppEvent::ListLoaded(ticket, result));
    });
}

fn spawn_statistics(service: &Arc<PoliticianService>, tx: &UnboundedSender<AppEvent>, refresh: bool) {
    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = if refresh {
            service.refresh_statistics().await
        } else {
            service.statistics().await
        };
        let _ = tx.send(AppEvent::StatisticsLoaded(result));
    });
}
