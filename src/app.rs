//! Cooperative scheduler.
//!
//! One [`App::tick`] per loop iteration, all decisions made against the
//! single `now` passed in. Polling, rendering and the LED pulse are
//! independent interval timers; the button is sampled every pass so
//! input stays responsive between polls.
//!
//! Suspend is a terminal step: `tick` returns [`Step::Suspend`] and the
//! runner awaits [`App::sleep_until_wake`] (grace delay, [`App::suspend`],
//! wait for the wake gesture, [`App::resume`]) before ticking again.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::clock::{EpochClock, Uptime};
use crate::config::Timings;
use crate::error::Error;
use crate::indicator::{Indicator, IndicatorState, StatusLed};
use crate::power::{PowerController, PowerMode};
use crate::sensor::{PollOutcome, Sensor, SensorCache};
use crate::ui::buttons::Button;
use crate::ui::render::{self, Canvas};
use crate::ui::{ButtonEvent, DisplayMode, ModeSelector};

/// What the runner should do after a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Call `tick` again.
    Continue,
    /// Run the suspend sequence, then `resume`.
    Suspend,
}

/// Everything the scheduler mutates, in one place.
#[derive(Clone, Copy, Debug)]
pub struct AppState {
    pub cache: SensorCache,
    pub modes: ModeSelector,
    pub button: Button,
    pub power: PowerController,
    pub uptime: Uptime,
    /// `None` = due on the next active pass.
    pub last_poll: Option<u64>,
    pub last_render: Option<u64>,
}

impl AppState {
    pub fn mode(&self) -> DisplayMode {
        self.modes.mode()
    }

    pub fn power_mode(&self) -> PowerMode {
        self.power.mode()
    }
}

/// Scheduler plus its collaborators.
pub struct App<S, C, P, E> {
    sensor: S,
    canvas: C,
    indicator: Indicator<P>,
    clock: E,
    timings: Timings,
    state: AppState,
}

fn due(last: Option<u64>, now: u64, interval: u64) -> bool {
    last.map_or(true, |t| now.saturating_sub(t) >= interval)
}

fn ms_u32(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}

impl<S, C, P, E> App<S, C, P, E>
where
    S: Sensor,
    C: Canvas,
    P: OutputPin,
    E: EpochClock,
{
    /// Records the uptime start; the first `tick` polls and renders.
    pub fn new(
        sensor: S,
        canvas: C,
        led: StatusLed<P>,
        clock: E,
        sea_level_hpa: f32,
        timings: Timings,
    ) -> Result<Self, Error> {
        timings.validate()?;
        let state = AppState {
            cache: SensorCache::new(sea_level_hpa),
            modes: ModeSelector::new(),
            button: Button::new(timings.debounce_ms, timings.hold_ms),
            power: PowerController::new(),
            uptime: Uptime::start(&clock),
            last_poll: None,
            last_render: None,
        };
        Ok(Self {
            sensor,
            canvas,
            indicator: Indicator::new(led, timings.pulse_ms),
            clock,
            timings,
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.indicator.state()
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// One scheduler pass.
    pub fn tick(&mut self, now: u64, raw_pressed: bool) -> Step {
        if !self.state.power.is_active() {
            return Step::Suspend;
        }

        match self.state.button.update(raw_pressed, now) {
            Some(ButtonEvent::Hold) => {
                self.begin_suspend();
                return Step::Suspend;
            }
            Some(ButtonEvent::ShortPress) => {
                self.state.modes.advance();
                self.render(now);
            }
            None => {}
        }

        if due(self.state.last_poll, now, self.timings.poll_interval_ms) {
            self.poll(now);
        }

        self.indicator.update(now);

        if due(self.state.last_render, now, self.timings.render_interval_ms) {
            self.render(now);
        }

        Step::Continue
    }

    /// Second half of the suspend sequence, after the grace delay: dark
    /// panel, dark LED.
    pub fn suspend(&mut self) {
        if let Err(e) = render::render_blank(&mut self.canvas) {
            warn!("suspend: blank failed: {}", e);
        }
        if let Err(e) = self.canvas.set_sleep(true) {
            warn!("suspend: panel sleep failed: {}", e);
        }
        self.indicator.force_off();
    }

    /// Wake edge fired. The next `tick` polls and renders immediately and
    /// the button starts from the level it has now.
    pub fn resume(&mut self, now: u64, raw_pressed: bool) {
        if let Err(e) = self.canvas.set_sleep(false) {
            warn!("resume: panel wake failed: {}", e);
        }
        self.state.power.wake();
        self.state.last_poll = None;
        self.state.last_render = None;
        self.state.button.resync(raw_pressed, now);
    }

    /// Full suspend sequence after a [`Step::Suspend`]: grace delay,
    /// [`App::suspend`], park until a press-release on `button` (active
    /// low), then [`App::resume`] at `now()`.
    ///
    /// If the suspend hold is still down it has to be released first, so
    /// the same gesture never wakes the device.
    pub async fn sleep_until_wake<B, D>(
        &mut self,
        button: &mut B,
        delay: &mut D,
        now: impl Fn() -> u64,
    ) where
        B: InputPin + Wait,
        D: DelayNs,
    {
        let debounce = ms_u32(self.timings.debounce_ms);

        delay.delay_ms(ms_u32(self.timings.suspend_grace_ms)).await;
        self.suspend();

        if button.is_low().unwrap_or(false) {
            if button.wait_for_high().await.is_err() {
                warn!("suspend: wait for release failed");
            }
            delay.delay_ms(debounce).await;
        }
        info!("suspended");

        if button.wait_for_low().await.is_err() {
            warn!("suspend: wait for press failed");
        }
        delay.delay_ms(debounce).await;
        if button.wait_for_high().await.is_err() {
            warn!("suspend: wait for release failed");
        }

        let raw = button.is_low().unwrap_or(false);
        self.resume(now(), raw);
    }

    fn begin_suspend(&mut self) {
        if let Err(e) = render::render_goodbye(&mut self.canvas) {
            warn!("suspend: message failed: {}", e);
        }
        self.state.power.suspend();
    }

    fn poll(&mut self, now: u64) {
        match self.state.cache.record(self.sensor.poll()) {
            PollOutcome::Updated => self.indicator.pulse(now),
            PollOutcome::Failed(_) => self.indicator.error_hold(),
        }
        self.state.last_poll = Some(now);
    }

    fn render(&mut self, now: u64) {
        let uptime = self.state.uptime.elapsed_secs(&self.clock);
        if let Err(e) =
            render::render_readings(&mut self.canvas, &self.state.cache, self.state.mode(), uptime)
        {
            warn!("render failed: {}", e);
        }
        self.state.last_render = Some(now);
    }
}
