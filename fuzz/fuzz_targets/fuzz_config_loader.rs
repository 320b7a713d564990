#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either fail to parse or reach validate() without panicking.
    let Ok(cfg) = bbnate_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        let b = &cfg.bmd;
        assert!(b.max > b.mid1 && b.mid1 > b.mid2 && b.mid2 > b.min);
        assert_ne!(cfg.pins.keypad_channel, cfg.pins.echo_channel);
    }
});
