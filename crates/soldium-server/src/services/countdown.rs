// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use soldium_api::convert::countdown_response;
use soldium_api::CountdownResponseDto;
use soldium_core::Clock;
use soldium_model::CountdownSettings;
use soldium_store::{DocumentStore, SettingKey, SettingRecord, StoreError, Subscription};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Countdown display fed by the settings document and a fixed-cadence ticker.
///
/// Settings edits reach every viewer through the store subscription; the
/// ticker recomputes the projection from scratch on each tick.
pub struct CountdownBoard {
    settings: watch::Receiver<CountdownSettings>,
    projection: watch::Receiver<CountdownResponseDto>,
    ticker: JoinHandle<()>,
    _subscription: Subscription,
}

fn settings_from(record: Option<&SettingRecord>) -> CountdownSettings {
    record.map_or_else(CountdownSettings::default, |r| {
        CountdownSettings::from_document(&r.value, Some(r.updated_at))
    })
}

impl CountdownBoard {
    /// Subscribes to the countdown setting and spawns the ticker on the
    /// current Tokio runtime.
    pub fn start(
        store: &dyn DocumentStore,
        clock: Arc<dyn Clock>,
        tick: Duration,
    ) -> Result<Self, StoreError> {
        let (settings_tx, settings_rx) = watch::channel(CountdownSettings::default());
        let subscription = store.subscribe_setting(
            SettingKey::countdown(),
            Arc::new(move |record: Option<&SettingRecord>| {
                settings_tx.send_replace(settings_from(record));
            }),
        )?;

        let initial = countdown_response(&settings_rx.borrow(), clock.now());
        let (projection_tx, projection_rx) = watch::channel(initial);
        let mut settings_changes = settings_rx.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    changed = settings_changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        debug!("countdown settings changed");
                    }
                }
                let next = countdown_response(&settings_changes.borrow(), clock.now());
                projection_tx.send_replace(next);
            }
        });

        Ok(Self {
            settings: settings_rx,
            projection: projection_rx,
            ticker,
            _subscription: subscription,
        })
    }

    #[must_use]
    pub fn settings(&self) -> CountdownSettings {
        self.settings.borrow().clone()
    }

    #[must_use]
    pub fn current(&self) -> CountdownResponseDto {
        self.projection.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CountdownResponseDto> {
        self.projection.clone()
    }
}

impl Drop for CountdownBoard {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}
