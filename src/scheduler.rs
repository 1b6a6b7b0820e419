//! Background loops: the matchmaking pass and the tournament scheduler pass.
//!
//! Each iteration runs as its own task, so a panic inside one pass is logged and
//! the loop carries on after the backoff interval instead of taking the process
//! down. Both loops stop when [`BackgroundTasks::shutdown`] is called.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use rocket::tokio;
use rocket::tokio::sync::watch;
use rocket::tokio::task::JoinHandle;

use crate::engine::GameEngine;

#[derive(Debug)]
pub struct BackgroundTasks {
    stop: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Signal both loops to stop and wait for them to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// Run `pass` every `interval`, waiting `backoff` instead after a failed pass.
pub async fn run_periodic<F, Fut>(
    name: &'static str,
    interval: Duration,
    backoff: Duration,
    mut stop: watch::Receiver<bool>,
    mut pass: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    info!("{} loop started", name);
    loop {
        if *stop.borrow() {
            break;
        }
        let delay = match tokio::spawn(pass()).await {
            Ok(()) => interval,
            Err(e) => {
                error!("{} error: {}", name, e);
                backoff
            }
        };
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            changed = stop.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    info!("{} loop stopped", name);
}

/// Spawn the matchmaking and tournament scheduler loops for `engine`.
pub fn spawn_background_tasks(engine: &GameEngine) -> BackgroundTasks {
    let (stop, stop_rx) = watch::channel(false);
    let config = &engine.config;

    let matchmaking_engine = engine.clone();
    let matchmaking = tokio::spawn(run_periodic(
        "Matchmaking",
        config.matchmaking_interval(),
        config.matchmaking_backoff(),
        stop_rx.clone(),
        move || {
            let engine = matchmaking_engine.clone();
            async move {
                engine.matchmaking_pass().await;
            }
        },
    ));

    let scheduler_engine = engine.clone();
    let scheduler = tokio::spawn(run_periodic(
        "Tournament scheduler",
        config.scheduler_interval(),
        config.scheduler_backoff(),
        stop_rx,
        move || {
            let engine = scheduler_engine.clone();
            async move {
                engine.scheduler_pass(Utc::now()).await;
            }
        },
    ));

    BackgroundTasks {
        stop,
        handles: vec![matchmaking, scheduler],
    }
}
