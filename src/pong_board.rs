//! Blue Pill wiring: five charlieplex lines on PA0-PA4, button one on PB0,
//! button two on PB1, TIM2 refreshing the LEDs and TIM3 pacing the game.

use core::cell::RefCell;

use critical_section::Mutex;
use stm32f1xx_hal::gpio::gpiob::{PB0, PB1};
use stm32f1xx_hal::gpio::{Edge, ExtiPin, Input, PullUp};
use stm32f1xx_hal::pac::{Peripherals, GPIOA, NVIC, TIM2, TIM3};
use stm32f1xx_hal::prelude::*;
use stm32f1xx_hal::stm32::{interrupt, Interrupt};
use stm32f1xx_hal::timer::{CountDownTimer, Event, Timer};

use pong_firmware::pong_clock::{auto_reload, timer_prescaler};
use pong_firmware::{
    on_clock_interrupt, PlexPair, PlexPins, PongButton, PongClock, PongConfig, PongInput,
    PongPlex, PongStatus, LED_COUNT,
};

// Multiplexer firings per second. A full sweep of the LEDs takes
// LED_COUNT firings.
const PLEX_FREQUENCY_HZ: u32 = 2_000;
// TIM3 counts at this rate, so a game period is a TIM3 auto-reload
const GAME_CLOCK_TICK_HZ: u32 = 125_000;

// CRL nibbles: floating input, and push-pull output at 2 MHz
const CRL_FLOATING_INPUT: u32 = 0b0100;
const CRL_PUSH_PULL_OUTPUT: u32 = 0b0010;

// Anode, cathode on PA0-PA4, in LED order along the strip
const PLEX_PINS: [PlexPair; LED_COUNT] = [
    PlexPair::new(4, 3),
    PlexPair::new(3, 4),
    PlexPair::new(3, 2),
    PlexPair::new(2, 3),
    PlexPair::new(4, 2),
    PlexPair::new(2, 4),
    PlexPair::new(1, 2),
    PlexPair::new(2, 1),
    PlexPair::new(1, 3),
    PlexPair::new(3, 1),
    PlexPair::new(1, 4),
    PlexPair::new(4, 1),
    PlexPair::new(0, 1),
    PlexPair::new(1, 0),
    PlexPair::new(0, 2),
    PlexPair::new(2, 0),
    PlexPair::new(0, 3),
    PlexPair::new(3, 0),
    PlexPair::new(0, 4),
    PlexPair::new(4, 0),
];

const _: () = {
    let mut i = 0;
    while i < LED_COUNT {
        // PlexPort only rewrites CRL
        assert!(PLEX_PINS[i].anode < 8 && PLEX_PINS[i].cathode < 8);
        assert!(PLEX_PINS[i].anode != PLEX_PINS[i].cathode);
        i += 1;
    }
};

pub static STATUS: PongStatus<LED_COUNT> = PongStatus::new();
static INPUT: PongInput = PongInput::new(PongConfig::DEFAULT.debounce_window);

struct Refresh {
    timer: CountDownTimer<TIM2>,
    plex: PongPlex<PlexPort, LED_COUNT>,
}

static REFRESH: Mutex<RefCell<Option<Refresh>>> = Mutex::new(RefCell::new(None));
static GAME_TIMER: Mutex<RefCell<Option<TIM3>>> = Mutex::new(RefCell::new(None));
static BUTTON_ONE: Mutex<RefCell<Option<PB0<Input<PullUp>>>>> = Mutex::new(RefCell::new(None));
static BUTTON_TWO: Mutex<RefCell<Option<PB1<Input<PullUp>>>>> = Mutex::new(RefCell::new(None));

/// The charlieplex lines, driven through the GPIOA registers so a pin can
/// switch between input and output at run time.
pub struct PlexPort {
    gpioa: GPIOA,
}

impl PlexPort {
    fn set_modes(&mut self, pair: PlexPair, mode: u32) {
        self.gpioa.crl.modify(|r, w| unsafe {
            let bits = with_mode(r.bits(), pair.anode, mode);
            w.bits(with_mode(bits, pair.cathode, mode))
        });
    }
}

impl PlexPins for PlexPort {
    fn release(&mut self, pair: PlexPair) {
        self.set_modes(pair, CRL_FLOATING_INPUT);
        self.gpioa.brr.write(|w| unsafe { w.bits(1 << pair.anode) });
    }

    fn drive(&mut self, pair: PlexPair) {
        // Levels first, so the pins come up as outputs already correct
        self.gpioa
            .bsrr
            .write(|w| unsafe { w.bits(1 << pair.anode | 1 << (pair.cathode + 16)) });
        self.set_modes(pair, CRL_PUSH_PULL_OUTPUT);
    }
}

const fn with_mode(crl: u32, pin: u8, mode: u32) -> u32 {
    let shift = pin as u32 * 4;
    (crl & !(0xf << shift)) | (mode << shift)
}

/// Handle on TIM3 for the game.
pub struct GameTimer;

impl PongClock for GameTimer {
    fn set_period(&mut self, period: u16) {
        let reload = u32::from(auto_reload(period));

        // Preloaded, so the running interval finishes at the old length
        critical_section::with(|cs| {
            if let Some(tim3) = GAME_TIMER.borrow_ref_mut(cs).as_ref() {
                tim3.arr.write(|w| unsafe { w.bits(reload) });
            }
        });
    }
}

fn start_game_timer(tim3: &TIM3, timer_clock_hz: u32, period: u16) {
    unsafe {
        tim3.cr1.modify(|_r, w| w.cen().disabled());
        let prescaler = timer_prescaler(timer_clock_hz, GAME_CLOCK_TICK_HZ);
        tim3.psc.write(|w| w.bits(u32::from(prescaler)));
        tim3.arr.write(|w| w.bits(u32::from(auto_reload(period))));
        tim3.cr1.modify(|_r, w| w.arpe().enabled());
    }

    // Latch the prescaler now instead of after the first overflow
    tim3.egr.write(|w| w.ug().update());
    tim3.sr.modify(|_r, w| w.uif().clear());
    tim3.dier.modify(|_r, w| w.uie().enabled());
    tim3.cr1.modify(|_r, w| w.cen().enabled());
}

/// Brings up clocks, pins, timers and interrupts. The multiplexer starts
/// firing before this returns.
pub fn init(dp: Peripherals) -> GameTimer {
    // PlexPort drives GPIOA by register, so the HAL never splits it
    dp.RCC.apb2enr.modify(|_r, w| w.iopaen().enabled());
    // TIM3 is programmed by register as well
    dp.RCC.apb1enr.modify(|_r, w| w.tim3en().enabled());

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();

    let clocks = rcc
        .cfgr
        .use_hse(8.mhz())
        .sysclk(72.mhz())
        .hclk(72.mhz())
        .pclk1(36.mhz())
        .pclk2(72.mhz())
        .freeze(&mut flash.acr);

    let mut afio = dp.AFIO.constrain(&mut rcc.apb2);
    let mut gpiob = dp.GPIOB.split(&mut rcc.apb2);

    let mut button_one = gpiob.pb0.into_pull_up_input(&mut gpiob.crl);
    button_one.make_interrupt_source(&mut afio);
    button_one.trigger_on_edge(&dp.EXTI, Edge::FALLING);
    button_one.enable_interrupt(&dp.EXTI);

    let mut button_two = gpiob.pb1.into_pull_up_input(&mut gpiob.crl);
    button_two.make_interrupt_source(&mut afio);
    button_two.trigger_on_edge(&dp.EXTI, Edge::FALLING);
    button_two.enable_interrupt(&dp.EXTI);

    let plex = PongPlex::new(PlexPort { gpioa: dp.GPIOA }, &PLEX_PINS);

    let mut refresh_timer =
        Timer::tim2(dp.TIM2, &clocks, &mut rcc.apb1).start_count_down(PLEX_FREQUENCY_HZ.hz());
    refresh_timer.listen(Event::Update);

    start_game_timer(&dp.TIM3, clocks.pclk1_tim().0, PongConfig::DEFAULT.start_speed);

    critical_section::with(|cs| {
        REFRESH.borrow(cs).replace(Some(Refresh {
            timer: refresh_timer,
            plex,
        }));
        GAME_TIMER.borrow(cs).replace(Some(dp.TIM3));
        BUTTON_ONE.borrow(cs).replace(Some(button_one));
        BUTTON_TWO.borrow(cs).replace(Some(button_two));
    });

    unsafe {
        // All at the same priority, so handlers never nest
        NVIC::unmask(Interrupt::TIM2);
        NVIC::unmask(Interrupt::TIM3);
        NVIC::unmask(Interrupt::EXTI0);
        NVIC::unmask(Interrupt::EXTI1);
    }

    GameTimer
}

#[interrupt]
fn TIM2() {
    critical_section::with(|cs| {
        if let Some(refresh) = REFRESH.borrow_ref_mut(cs).as_mut() {
            refresh.timer.clear_update_interrupt_flag();
            refresh.plex.fire(&STATUS);
        }
    });
}

#[interrupt]
fn TIM3() {
    critical_section::with(|cs| {
        if let Some(tim3) = GAME_TIMER.borrow_ref_mut(cs).as_ref() {
            tim3.sr.modify(|_r, w| w.uif().clear());
        }
    });

    on_clock_interrupt(&STATUS);
}

#[interrupt]
fn EXTI0() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON_ONE.borrow_ref_mut(cs).as_mut() {
            button.clear_interrupt_pending_bit();
        }
    });

    INPUT.on_falling_edge(&STATUS, PongButton::One);
}

#[interrupt]
fn EXTI1() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON_TWO.borrow_ref_mut(cs).as_mut() {
            button.clear_interrupt_pending_bit();
        }
    });

    INPUT.on_falling_edge(&STATUS, PongButton::Two);
}
