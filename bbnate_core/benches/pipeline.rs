use bbnate_core::{
    AdcScale, BmdClassifier, SignalAcquirer, WINDOW_COUNT, WINDOW_LEN, integrate,
};
use bbnate_hardware::SimulatedAdc;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

// Echo trace: decaying ramp with xorshift noise, in raw counts
fn synth_echo(seed: u32) -> Vec<u16> {
    let mut state = seed.max(1);
    let mut noise = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        x % 16
    };
    (0..WINDOW_COUNT * WINDOW_LEN)
        .map(|i| {
            let decay = 600u32.saturating_sub(i as u32 / 2);
            (decay + noise()).min(1023) as u16
        })
        .collect()
}

pub fn bench_pipeline(c: &mut Criterion) {
    let mut g = c.benchmark_group("pipeline");
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p bbnate_core --bench pipeline
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE")
        && let Ok(n) = ss.parse::<usize>()
    {
        g.sample_size(n.max(10));
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let trace = synth_echo(0xB0_7E);
    let acquirer = SignalAcquirer::new(1, AdcScale::default());

    g.bench_function("read_signal", |b| {
        b.iter_batched(
            || {
                let adc = SimulatedAdc::new().with_channel(1, 0);
                let handle = adc.handle();
                for raw in &trace {
                    handle.push(1, *raw);
                }
                adc
            },
            |mut adc| {
                let acq = acquirer.read_signal(&mut adc, None);
                black_box(acq.is_ok());
            },
            BatchSize::SmallInput,
        )
    });

    let series = [0.55f32; WINDOW_COUNT];
    g.bench_function("integrate", |b| {
        b.iter(|| black_box(integrate(black_box(&series))))
    });

    let classifier = BmdClassifier::default();
    g.bench_function("classify_sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for step in 0..200u16 {
                acc += classifier.evaluate(black_box(f32::from(step) * 0.1)).value();
            }
            black_box(acc)
        })
    });

    g.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
