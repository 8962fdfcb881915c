//! Vigil - Potentiometer and Temperature Monitor Firmware
//!
//! Samples a potentiometer and an LM35 every cycle, shows the readings on a
//! 20x4 character LCD and streams one JSON record per cycle over UART.
//!
//! The monitor loop is blocking: it owns the only executor thread and waits
//! with busy delays between cycles.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::uart::UartTx;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use vigil_core::config::MonitorConfig;
use vigil_core::{CycleReport, LoopController};
use vigil_drivers::display::Hd44780;
use vigil_drivers::sensor::SettlingSampler;
use vigil_hal_rp2040::{uart, EmbassyClock, Rp2040Analog};
use vigil_protocol::TELEMETRY_CAPACITY;

use crate::board::{LCD_ADDRESS, LCD_I2C, LM35_GPIO, POT_GPIO, TELEMETRY_UART};

mod board;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Vigil firmware starting...");

    let p = embassy_rp::init(Default::default());
    let config = MonitorConfig::DEFAULT;

    // Analog inputs, in logical channel order (A0, A1)
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let pot = Channel::new_pin(p.PIN_26, Pull::None);
    let lm35 = Channel::new_pin(p.PIN_27, Pull::None);
    let analog = Rp2040Analog::new(adc, [pot, lm35]);
    let sampler = SettlingSampler::with_settle_ms(analog, Delay, config.settle_ms);

    info!(
        "ADC initialized: pot on GPIO{}, LM35 on GPIO{}, settle {} ms",
        POT_GPIO,
        LM35_GPIO,
        config.settle_ms
    );

    // LCD on I2C0 (SCL GPIO5, SDA GPIO4)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = LCD_I2C.frequency;
    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let lcd = Hd44780::with_address(bus, Delay, LCD_ADDRESS);

    info!("I2C initialized: LCD at {=u8:#x}", LCD_ADDRESS);

    // Telemetry on UART0 TX (GPIO0)
    let uart_config = unwrap!(uart::driver_config(&TELEMETRY_UART));
    let serial = UartTx::new_blocking(p.UART0, p.PIN_0, uart_config);

    info!(
        "UART initialized: {} baud, full record takes {} us",
        TELEMETRY_UART.baudrate,
        TELEMETRY_UART.transmit_time_us(TELEMETRY_CAPACITY)
    );

    let mut monitor = LoopController::new(sampler, lcd, serial, EmbassyClock, Delay, config);

    if let Err(e) = monitor.init() {
        // The loop keeps running; telemetry does not depend on the LCD
        warn!("LCD init failed: {}", e);
    }

    info!(
        "Monitor running, nominal period {} ms",
        config.nominal_period_ms()
    );

    monitor.run(log_report)
}

/// Log the outcome of one cycle
fn log_report(report: &CycleReport) {
    if report.is_clean() {
        debug!(
            "Cycle {}: {} bytes sent at {} ms",
            report.reading_count, report.telemetry_bytes, report.reading_time_ms
        );
        return;
    }

    for fault in &report.faults {
        warn!("Cycle {}: {}", report.reading_count, fault);
    }
}
