//! MRF49XA Dongle Main Application
//!
//! Entry point for the STM32G474-based packet dongle firmware.
//! Brings the radio up, then runs the byte-ready handler on a
//! high-priority interrupt executor and the foreground loop on the
//! thread executor.

#![no_std]
#![no_main]

use defmt::{info, trace, unwrap, warn};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mrf49xa_dongle::prelude::*;

/// Bit-banged register bus on the board's GPIO lines
type RadioBus = BitBangBus<Output<'static>, Output<'static>, Output<'static>, Input<'static>, Delay>;

/// Link shared by the byte-ready handler and the foreground
type RadioLink = Link<&'static SharedBus<RadioBus>>;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static BUS: StaticCell<SharedBus<RadioBus>> = StaticCell::new();
static LINK: StaticCell<RadioLink> = StaticCell::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt();
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("MRF49XA Dongle Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // FSEL high selects the internal FIFO; held for the life of main
    let _fsel = Output::new(p.PB11, Level::High, Speed::Low);

    let bus = BitBangBus::new(
        Output::new(p.PB12, Level::High, Speed::VeryHigh), // CS
        Output::new(p.PB13, Level::Low, Speed::VeryHigh),  // SCK
        Output::new(p.PB15, Level::Low, Speed::VeryHigh),  // SDI
        Input::new(p.PB14, Pull::None),                    // SDO
        Delay,
    );
    let bus: &'static SharedBus<RadioBus> = BUS.init(SharedBus::new(bus));

    let mut link = Link::new(bus, RadioConfig::DEFAULT);
    let status = link.init(&mut Delay);
    info!("MRF49XA initialized, {}", status);
    let link: &'static RadioLink = LINK.init(link);

    // nIRO falls once per byte moved through the FIFO
    let irq = ExtiInput::new(p.PC7, p.EXTI7, Pull::Up);

    interrupt::UART4.set_priority(Priority::P6);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::UART4);
    unwrap!(high_spawner.spawn(byte_ready_task(link, irq)));
    unwrap!(spawner.spawn(heartbeat_task(link, led)));

    info!("Tasks spawned, entering main loop");

    let mut delay = Delay;
    loop {
        if let Some(packet) = link.poll_received() {
            info!("received {}: {:02X}", packet, packet.payload());
            if REFLECT_RECEIVED {
                link.submit(&packet, &mut delay);
            }
        }
        Timer::after(Duration::from_micros(u64::from(BYTE_PERIOD_US))).await;
    }
}

/// Byte-ready task - one state machine step per nIRO falling edge
#[embassy_executor::task]
async fn byte_ready_task(link: &'static RadioLink, mut irq: ExtiInput<'static>) {
    loop {
        irq.wait_for_falling_edge().await;
        if let Some(event) = link.on_interrupt() {
            trace!("link event {}", event);
        }
    }
}

/// Heartbeat task - toggles the LED while the link is healthy
#[embassy_executor::task]
async fn heartbeat_task(link: &'static RadioLink, mut led: Output<'static>) {
    loop {
        Timer::after(Duration::from_millis(HEARTBEAT_MS)).await;
        if link.liveness() {
            led.toggle();
        } else {
            warn!("no byte-ready trigger while {}", link.state());
            led.set_low();
        }
    }
}
