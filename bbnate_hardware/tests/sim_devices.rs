use std::time::Duration;

use bbnate_hardware::{SimulatedAdc, SimulatedClock, SimulatedLcd, SimulatedOutputs, volts_to_raw};
use bbnate_traits::{AnalogInput, CharDisplay, Clock, DigitalOutput, Level};
use rstest::rstest;

#[rstest]
#[case(0.00, 0)]
#[case(0.70, 143)]
#[case(1.60, 327)]
#[case(2.45, 501)]
#[case(3.62, 741)]
fn keypad_ladder_voltages_map_to_expected_counts(#[case] volts: f32, #[case] raw: u16) {
    assert_eq!(volts_to_raw(volts, 5.0, 1023), raw);
}

#[test]
fn boxed_devices_forward_to_the_simulation() {
    let outputs = SimulatedOutputs::new();
    let pins = outputs.probe();
    let mut boxed: Box<dyn DigitalOutput> = Box::new(outputs);
    boxed.configure_output(11).unwrap();
    boxed.write(11, Level::High).unwrap();
    assert!(pins.is_output(11));
    assert!(pins.is_high(11));

    let adc = SimulatedAdc::new().with_channel(0, 1023);
    let mut boxed: Box<dyn AnalogInput> = Box::new(adc);
    assert_eq!(boxed.read_raw(0).unwrap(), 1023);
}

#[test]
fn begin_resizes_and_blanks_the_screen() {
    let mut lcd = SimulatedLcd::new(8, 1);
    let probe = lcd.probe();
    lcd.print("hello").unwrap();
    lcd.begin(16, 2).unwrap();
    assert_eq!(probe.dimensions(), (16, 2));
    assert_eq!(probe.lines(), vec![String::new(), String::new()]);
}

#[test]
fn cursor_row_is_clamped_to_last_row() {
    let mut lcd = SimulatedLcd::default();
    let probe = lcd.probe();
    lcd.set_cursor(0, 5).unwrap();
    lcd.print("x").unwrap();
    assert_eq!(probe.line(1), "x");
}

#[test]
fn clock_clones_share_time() {
    let clock = SimulatedClock::new();
    let other = clock.clone();
    clock.sleep(Duration::from_millis(7));
    assert_eq!(other.elapsed(), Duration::from_millis(7));
}
