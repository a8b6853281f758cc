//! Ticker Strip: scrolls live quotes across a strip of the terminal.
//!
//! Keys: `p` pause, `space` resume, `h` hide, `t`/`b` dock top/bottom,
//! `u` undock, `d` or double-click toggle dock, arrows or drag to move,
//! `r` reload config, `q` quit.
//!
//! Pass `--offline` to quote from a local random walk instead of the
//! network. Logs go to `tickertape.log` (filter with `RUST_LOG`).

use std::fs::File;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tickertape::{Engine, EngineConfig, PriceSource, TickerConfig, YahooChartSource};
use tracing_subscriber::EnvFilter;

/// Deterministic pseudo-random walk around a per-symbol base price.
struct RandomWalk {
    step: AtomicU64,
}

impl PriceSource for RandomWalk {
    fn fetch_price(&self, symbol: &str) -> f64 {
        let step = self.step.fetch_add(1, Ordering::Relaxed);
        let base = symbol.bytes().map(f64::from).sum::<f64>();
        let wobble = ((step.wrapping_mul(2_654_435_761) % 1000) as f64 - 500.0) / 100.0;
        (base + wobble).max(0.01)
    }
}

fn main() -> tickertape::Result<()> {
    let log = File::create("tickertape.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let offline = std::env::args().any(|a| a == "--offline");
    let engine_config = EngineConfig::default();
    let config = TickerConfig::load(&engine_config.config_path)?;

    let source: Arc<dyn PriceSource> = if offline {
        Arc::new(RandomWalk {
            step: AtomicU64::new(0),
        })
    } else {
        Arc::new(YahooChartSource::new()?)
    };

    Engine::new(engine_config, config, source).run()
}
