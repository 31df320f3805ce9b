#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::cdc_acm::{Receiver, Sender, State};
use embassy_usb::{Builder, Config as UsbConfig};
use slider_rp2040::usb_serial::{run_receiver, run_sender};
use slider_rp2040::{
    configure_usb_serial, new_session, FirmwareSession, GpioPads, LogLeds, SliderDevice, BOARD,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Slider loop period. Auto scan reports go out once per tick.
const TICK: Duration = Duration::from_millis(1);

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// CDC-ACM state.
static CDC_STATE: StaticCell<State> = StaticCell::new();

type UsbDriver = Driver<'static, USB>;
type Device = SliderDevice<GpioPads<'static>, LogLeds>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Slider firmware starting ({})", BOARD);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Touch pads ---
    let pads = [
        Input::new(p.PIN_0, Pull::Up),
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
        Input::new(p.PIN_14, Pull::Up),
        Input::new(p.PIN_15, Pull::Up),
    ];
    let def = BOARD.def();
    let device = SliderDevice::new(def, GpioPads::new(pads, def), LogLeds::new());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Slider");
    usb_config.product = Some("Touch Slider Controller");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let cdc_state = CDC_STATE.init(State::new());
    let (sender, receiver) = configure_usb_serial(&mut builder, cdc_state).split();

    let usb_device = builder.build();

    // On-board LED mirrors auto scan
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(receiver_task(receiver).unwrap());
    spawner.spawn(sender_task(sender).unwrap());
    spawner.spawn(slider_task(device, new_session(), led).unwrap());

    info!("Slider firmware initialized, waiting for host...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, UsbDriver>) {
    device.run().await;
}

/// Receiver task - host to [`RX_PIPE`](slider_rp2040::usb_serial::RX_PIPE).
#[embassy_executor::task]
async fn receiver_task(mut receiver: Receiver<'static, UsbDriver>) {
    run_receiver(&mut receiver).await
}

/// Sender task - [`TX_PIPE`](slider_rp2040::usb_serial::TX_PIPE) to host.
#[embassy_executor::task]
async fn sender_task(mut sender: Sender<'static, UsbDriver>) {
    run_sender(&mut sender).await
}

/// Slider task - answers host commands and streams scan reports.
#[embassy_executor::task]
async fn slider_task(mut device: Device, mut session: FirmwareSession, mut led: Output<'static>) {
    let mut ticker = Ticker::every(TICK);
    let mut failures: u32 = 0;

    loop {
        match device.poll(&mut session) {
            Ok(_) => failures = 0,
            Err(e) => {
                failures = failures.wrapping_add(1);
                if failures == 1 {
                    warn!("Slider send error: {}", e);
                }
            }
        }
        led.set_level(Level::from(device.auto_scan()));
        ticker.next().await;
    }
}
