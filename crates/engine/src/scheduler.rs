use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::pipeline::Pipeline;

impl Pipeline {
    pub async fn hourly(&self) -> Result<Option<usize>> {
        let _guard = self.run_lock.lock().await;

        let mut options = self.options.load_options().await?;
        options.api_call_counter = 0;
        self.options.save_options(&options).await?;
        self.hooks.on_counter_reset();

        if options.manual_cron {
            info!("Manual mode enabled, skipping scheduled sweep");
            return Ok(None);
        }

        self.run_sweep().await.map(Some)
    }
}

pub struct Scheduler {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Scheduler {
    // 首次触发在注册一个周期之后
    pub fn register(pipeline: Arc<Pipeline>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "Mention check scheduled");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // 进行中的扫描不会被中断
                        match pipeline.hourly().await {
                            Ok(Some(n)) => info!(inserted = n, "Scheduled sweep done"),
                            Ok(None) => {}
                            Err(e) => error!("Scheduled mention check failed: {:#}", e),
                        }
                    }
                }
            }
            info!("Mention check unscheduled");
        });

        Self { cancel, handle }
    }

    /// Cancels future ticks and waits for a running one to finish.
    pub async fn deactivate(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!("Scheduler task ended abnormally: {:?}", e);
        }
    }
}
