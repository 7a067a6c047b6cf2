/*
 * The I/O module for the clock.
 *
 * This is the only part of the firmware that knows about the device: the
 * console is the transmit half of USART1 and time comes from the embassy time
 * driver. Everything else talks to these through the `Console` and `Timebase`
 * traits of the library.
 */

use cascade_clock::{Console, Timebase};
use defmt::warn;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartTx;
use embassy_time::{Instant, Timer};

/*
 * The console has to exist before the UART does, because it lives in a static
 * together with its output lock. Until `attach` is called, lines are dropped.
 */
pub struct UartConsole {
    tx: Option<UartTx<'static, Async>>,
}

impl UartConsole {
    pub const fn detached() -> Self {
        UartConsole { tx: None }
    }

    pub fn attach(&mut self, tx: UartTx<'static, Async>) {
        self.tx = Some(tx);
    }
}

impl Console for UartConsole {
    async fn write_line(&mut self, line: &str) {
        let Some(tx) = self.tx.as_mut() else {
            return;
        };

        if let Err(e) = tx.write(line.as_bytes()).await {
            warn!("console: write failed: {}", e);
            return;
        }
        if let Err(e) = tx.write(b"\r\n").await {
            warn!("console: write failed: {}", e);
        }
    }
}

pub struct EmbassyTimebase;

impl Timebase for EmbassyTimebase {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn delay_ms(&self, millis: u64) {
        Timer::after_millis(millis).await
    }

    async fn delay_until_ms(&self, deadline_ms: u64) {
        Timer::at(Instant::from_millis(deadline_ms)).await
    }
}
