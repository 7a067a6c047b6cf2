#![no_std]
#![no_main]

// https://github.com/embassy-rs/embassy/blob/main/examples/stm32f3/src/bin/multiprio.rs

use core::convert::Infallible;

use cascade_clock::{
    ClockConfig, ClockContext, ClockError, Console, Gate, HOUR_BATCH, MINUTE_BATCH, Mailbox,
    OutputLock, run_display, run_hours, run_minutes, run_seconds,
};
use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::usart::{Config, Uart};
use embassy_stm32::{bind_interrupts, peripherals, usart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use panic_halt as _;

mod io;
use io::{EmbassyTimebase, UartConsole};

// Tasks run on different interrupt priorities, so every primitive they share
// has to be interrupt safe.
type Raw = CriticalSectionRawMutex;
type Context = ClockContext<'static, Raw, UartConsole>;

static MAILBOX: Mailbox<Raw> = Mailbox::new();
static MINUTE_GATE: Gate<Raw> = Gate::new("minute", MINUTE_BATCH);
static HOUR_GATE: Gate<Raw> = Gate::new("hour", HOUR_BATCH);
static OUTPUT: OutputLock<Raw, UartConsole> = OutputLock::new(UartConsole::detached());
static CONTEXT: Context = ClockContext::new(
    &MAILBOX,
    &MINUTE_GATE,
    &HOUR_GATE,
    &OUTPUT,
    ClockConfig::DEFAULT,
);

// Seconds are the most urgent, then the display, then minutes. Hours run in
// thread mode underneath all of them.
static EXECUTOR_SECONDS: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_DISPLAY: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MINUTES: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn UART4() {
    unsafe { EXECUTOR_SECONDS.on_interrupt() }
}

#[interrupt]
unsafe fn UART5() {
    unsafe { EXECUTOR_DISPLAY.on_interrupt() }
}

#[interrupt]
unsafe fn SPI3() {
    unsafe { EXECUTOR_MINUTES.on_interrupt() }
}

fn report(task: &str, outcome: Result<Infallible, ClockError>) {
    if let Err(e) = outcome {
        error!("{}: stopped: {}", task, e);
    }
}

#[embassy_executor::task]
async fn seconds_task(ctx: &'static Context) {
    report("seconds", run_seconds(ctx, &EmbassyTimebase).await);
}

#[embassy_executor::task]
async fn minutes_task(ctx: &'static Context) {
    report("minutes", run_minutes(ctx, &EmbassyTimebase).await);
}

#[embassy_executor::task]
async fn hours_task(ctx: &'static Context) {
    report("hours", run_hours(ctx, &EmbassyTimebase).await);
}

#[embassy_executor::task]
async fn display_task(ctx: &'static Context) {
    report("display", run_display(ctx, &EmbassyTimebase).await);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    bind_interrupts!(struct Irqs {
        USART1 => usart::InterruptHandler<peripherals::USART1>;
    });
    let usart = Uart::new(
        peripherals.USART1,
        peripherals.PA10,
        peripherals.PA9,
        Irqs,
        peripherals.DMA1_CH4,
        peripherals.DMA1_CH5,
        Config::default(), // 115200 baud
    )
    .unwrap();
    let (tx, _rx) = usart.split();

    {
        let mut console = OUTPUT.lock().await;
        console.attach(tx);
        console.write_line("cascade clock").await;
    }
    info!(
        "starting: batches {}/{}, config {}",
        MINUTE_GATE.batch(),
        HOUR_GATE.batch(),
        CONTEXT.config
    );

    interrupt::UART4.set_priority(Priority::P5);
    let seconds = EXECUTOR_SECONDS.start(interrupt::UART4);
    seconds.spawn(seconds_task(&CONTEXT)).unwrap();

    interrupt::UART5.set_priority(Priority::P6);
    let display = EXECUTOR_DISPLAY.start(interrupt::UART5);
    display.spawn(display_task(&CONTEXT)).unwrap();

    interrupt::SPI3.set_priority(Priority::P7);
    let minutes = EXECUTOR_MINUTES.start(interrupt::SPI3);
    minutes.spawn(minutes_task(&CONTEXT)).unwrap();

    spawner.spawn(hours_task(&CONTEXT)).unwrap();
}
