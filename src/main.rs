//! HydroBed Firmware — Main Entry Point
//!
//! Wires the adapters to the control loop and ticks it forever.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  Esp32Clock     HalI2cBus      NvsAdapter    LogEventSink    │
//! │  (Clock)        (BusChannel)   (ConfigPort)  (EventSink)     │
//! │                                                              │
//! │  ─────────────── Port / trait boundary ───────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │           ControlLoop (pure logic)                 │      │
//! │  │  Aht21 acquisition · actuator scheduling           │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use hydrobed::adapters::i2c;
use hydrobed::adapters::log_sink::LogEventSink;
use hydrobed::adapters::nvs::NvsAdapter;
use hydrobed::adapters::time::Esp32Clock;
use hydrobed::app::ports::ConfigPort;
use hydrobed::app::service::ControlLoop;
use hydrobed::config::SystemConfig;
use hydrobed::drivers::actuator::ActuatorController;
use hydrobed::drivers::hw_init;
use hydrobed::pins;
use hydrobed::sensors::Aht21;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HydroBed v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Relay pin config failure is critical — better to halt than run
        // with floating actuator pins; the watchdog resets after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new() {
        Ok(nvs) => match nvs.load() {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            SystemConfig::default()
        }
    };
    if let Err(msg) = config.validate() {
        anyhow::bail!("invalid configuration: {msg}");
    }

    // ── 4. Construct collaborators ────────────────────────────
    let bus = i2c::init_bus()?;
    let clock = Esp32Clock::new();
    let sensor = Aht21::new(
        pins::AHT21_I2C_ADDR,
        config.sensor_cycle_interval_ms,
        config.sensor_retry_cooldown_ms,
    );

    let mut control = ControlLoop::new(
        clock,
        bus,
        sensor,
        ActuatorController::new("supply-pump", pins::SUPPLY_PUMP_GPIO),
        ActuatorController::new("nutrient-pump", pins::NUTRIENT_PUMP_GPIO),
        ActuatorController::new("light", pins::LIGHT_GPIO),
        config.clone(),
    );
    let mut sink = LogEventSink::new();
    control.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 5. Tick loop ──────────────────────────────────────────
    // thread::sleep yields to FreeRTOS between ticks; everything inside
    // tick() is non-blocking, so the cadence holds.
    let tick = std::time::Duration::from_millis(u64::from(config.control_loop_interval_ms));
    loop {
        std::thread::sleep(tick);
        control.tick(&mut sink);
    }
}
