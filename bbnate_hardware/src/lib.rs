//! Device backends for the BBnate capability traits.
//!
//! The simulated devices hand out probe handles (`PinProbe`, `AdcHandle`,
//! `LcdProbe`) that share state with the device they came from, so a test or
//! the CLI can script inputs and inspect outputs after the device has been
//! moved into the core.
pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;

use bbnate_traits::{AnalogInput, BoxError, CharDisplay, Clock, DigitalOutput, Level};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::HwError;

/// Raw reading that produces `volts` on an ADC with the given reference and bit depth.
/// Rounds to the nearest count and clamps into `0..=max_raw`.
pub fn volts_to_raw(volts: f32, reference_v: f32, max_raw: u16) -> u16 {
    if !(volts.is_finite() && reference_v > 0.0) {
        return 0;
    }
    let counts = (volts / reference_v * f32::from(max_raw)).round();
    counts.clamp(0.0, f32::from(max_raw)) as u16
}

// ── Digital outputs ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PinBank {
    outputs: BTreeSet<u8>,
    levels: BTreeMap<u8, Level>,
    writes: Vec<(u8, Level)>,
}

/// Simulated output pin bank. Writes to pins that were never configured fail.
#[derive(Debug, Default)]
pub struct SimulatedOutputs {
    bank: Rc<RefCell<PinBank>>,
}

impl SimulatedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> PinProbe {
        PinProbe {
            bank: Rc::clone(&self.bank),
        }
    }
}

impl DigitalOutput for SimulatedOutputs {
    fn configure_output(&mut self, pin: u8) -> Result<(), BoxError> {
        let mut bank = self.bank.borrow_mut();
        bank.outputs.insert(pin);
        bank.levels.entry(pin).or_insert(Level::Low);
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), BoxError> {
        let mut bank = self.bank.borrow_mut();
        if !bank.outputs.contains(&pin) {
            return Err(Box::new(HwError::InvalidPin(pin)));
        }
        tracing::trace!(pin, ?level, "digital write (simulated)");
        bank.levels.insert(pin, level);
        bank.writes.push((pin, level));
        Ok(())
    }
}

/// Read-only view of a `SimulatedOutputs` bank.
#[derive(Debug, Clone)]
pub struct PinProbe {
    bank: Rc<RefCell<PinBank>>,
}

impl PinProbe {
    /// Current level; pins never written read as low.
    pub fn level(&self, pin: u8) -> Level {
        self.bank
            .borrow()
            .levels
            .get(&pin)
            .copied()
            .unwrap_or(Level::Low)
    }

    pub fn is_high(&self, pin: u8) -> bool {
        self.level(pin).is_high()
    }

    pub fn is_output(&self, pin: u8) -> bool {
        self.bank.borrow().outputs.contains(&pin)
    }

    /// Every write in order, across all pins.
    pub fn writes(&self) -> Vec<(u8, Level)> {
        self.bank.borrow().writes.clone()
    }

    /// Writes to a single pin, in order.
    pub fn writes_to(&self, pin: u8) -> Vec<Level> {
        self.bank
            .borrow()
            .writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, l)| *l)
            .collect()
    }
}

// ── Analog inputs ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Channel {
    scripted: VecDeque<u16>,
    idle: u16,
    reads: usize,
}

/// Simulated ADC. Each wired channel returns its scripted readings first and
/// its idle reading once the script runs out.
#[derive(Debug, Default)]
pub struct SimulatedAdc {
    channels: Rc<RefCell<BTreeMap<u8, Channel>>>,
}

impl SimulatedAdc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire `channel` with a constant idle reading.
    pub fn with_channel(self, channel: u8, idle: u16) -> Self {
        self.handle().set_idle(channel, idle);
        self
    }

    pub fn handle(&self) -> AdcHandle {
        AdcHandle {
            channels: Rc::clone(&self.channels),
        }
    }
}

impl AnalogInput for SimulatedAdc {
    fn read_raw(&mut self, channel: u8) -> Result<u16, BoxError> {
        let mut channels = self.channels.borrow_mut();
        let ch = channels
            .get_mut(&channel)
            .ok_or(HwError::InvalidChannel(channel))?;
        ch.reads = ch.reads.saturating_add(1);
        Ok(ch.scripted.pop_front().unwrap_or(ch.idle))
    }
}

/// Scripting and inspection handle for a `SimulatedAdc`.
#[derive(Debug, Clone)]
pub struct AdcHandle {
    channels: Rc<RefCell<BTreeMap<u8, Channel>>>,
}

impl AdcHandle {
    pub fn set_idle(&self, channel: u8, raw: u16) {
        self.channels.borrow_mut().entry(channel).or_default().idle = raw;
    }

    /// Queue `raw` to be returned `times` times before the idle reading resumes.
    pub fn push_repeat(&self, channel: u8, raw: u16, times: usize) {
        let mut channels = self.channels.borrow_mut();
        let ch = channels.entry(channel).or_default();
        ch.scripted.extend(std::iter::repeat_n(raw, times));
    }

    pub fn push(&self, channel: u8, raw: u16) {
        self.push_repeat(channel, raw, 1);
    }

    /// Total conversions performed on `channel`.
    pub fn reads(&self, channel: u8) -> usize {
        self.channels
            .borrow()
            .get(&channel)
            .map_or(0, |ch| ch.reads)
    }

    pub fn pending(&self, channel: u8) -> usize {
        self.channels
            .borrow()
            .get(&channel)
            .map_or(0, |ch| ch.scripted.len())
    }
}

// ── Character LCD ───────────────────────────────────────────────────────────

#[derive(Debug)]
struct Screen {
    cols: u8,
    rows: u8,
    cells: Vec<Vec<char>>,
    cursor: (u8, u8),
    clears: usize,
}

impl Screen {
    fn blank(cols: u8, rows: u8) -> Self {
        Self {
            cols,
            rows,
            cells: vec![vec![' '; usize::from(cols)]; usize::from(rows)],
            cursor: (0, 0),
            clears: 0,
        }
    }
}

/// Simulated character LCD. Text printed past the last column is dropped;
/// cursor rows past the last row are clamped, matching HD44780 shields.
#[derive(Debug)]
pub struct SimulatedLcd {
    screen: Rc<RefCell<Screen>>,
}

impl Default for SimulatedLcd {
    fn default() -> Self {
        Self::new(16, 2)
    }
}

impl SimulatedLcd {
    pub fn new(cols: u8, rows: u8) -> Self {
        Self {
            screen: Rc::new(RefCell::new(Screen::blank(cols, rows))),
        }
    }

    pub fn probe(&self) -> LcdProbe {
        LcdProbe {
            screen: Rc::clone(&self.screen),
        }
    }
}

impl CharDisplay for SimulatedLcd {
    fn begin(&mut self, cols: u8, rows: u8) -> Result<(), BoxError> {
        let clears = self.screen.borrow().clears;
        let mut fresh = Screen::blank(cols, rows);
        fresh.clears = clears;
        *self.screen.borrow_mut() = fresh;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        let mut s = self.screen.borrow_mut();
        for row in &mut s.cells {
            row.fill(' ');
        }
        s.cursor = (0, 0);
        s.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), BoxError> {
        let mut s = self.screen.borrow_mut();
        let row = row.min(s.rows.saturating_sub(1));
        s.cursor = (col, row);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), BoxError> {
        let mut s = self.screen.borrow_mut();
        let (mut col, row) = s.cursor;
        let cols = s.cols;
        for ch in text.chars() {
            if col < cols
                && let Some(line) = s.cells.get_mut(usize::from(row))
            {
                line[usize::from(col)] = ch;
            }
            col = col.saturating_add(1);
        }
        s.cursor = (col, row);
        tracing::trace!(row, text, "lcd print (simulated)");
        Ok(())
    }
}

/// Read-only view of a `SimulatedLcd`.
#[derive(Debug, Clone)]
pub struct LcdProbe {
    screen: Rc<RefCell<Screen>>,
}

impl LcdProbe {
    /// Full row contents including trailing blanks.
    pub fn row(&self, row: u8) -> String {
        self.screen
            .borrow()
            .cells
            .get(usize::from(row))
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    /// Row contents with trailing blanks trimmed.
    pub fn line(&self, row: u8) -> String {
        self.row(row).trim_end().to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        let rows = self.screen.borrow().rows;
        (0..rows).map(|r| self.line(r)).collect()
    }

    pub fn dimensions(&self) -> (u8, u8) {
        let s = self.screen.borrow();
        (s.cols, s.rows)
    }

    pub fn clears(&self) -> usize {
        self.screen.borrow().clears
    }
}

// ── Clock ───────────────────────────────────────────────────────────────────

/// Deterministic clock whose time only moves when slept on or advanced.
///
/// now() = origin + offset
/// sleep(d) advances the offset by d without actually sleeping.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Total simulated time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
