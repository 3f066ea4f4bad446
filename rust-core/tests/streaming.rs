//! End-to-end scenarios across the filter, spectrum and streaming layers

use sensor_spectrum::filters::{high_pass, high_pass_filter, low_pass, low_pass_filter, FilterState};
use sensor_spectrum::spectrum::transform;
use sensor_spectrum::stream::{Channel, ConfigUpdate, LatestUpdate, RetentionPolicy, Sample, StreamConfig, StreamProcessor};
use sensor_spectrum::{FilterConfig, FilterMode};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn square_wave_peaks_at_two_hertz() {
    let signal = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
    let spectrum = transform(&signal, 8.0).unwrap();

    assert_eq!(spectrum.len(), 8);

    // Lower half only; the upper half mirrors it
    let (peak_bin, _) = spectrum.magnitudes[..4]
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .unwrap();
    assert_eq!(peak_bin, 2);
    assert_eq!(spectrum.frequencies[peak_bin], 2.0);
    assert!((spectrum.magnitudes[2] - 4.0).abs() < 1e-12);
}

#[test]
fn sinusoid_peak_within_one_bin() {
    let sample_rate = 256.0;
    for &freq in &[5.0, 17.5, 40.0, 100.0] {
        let signal: Vec<f64> = (0..300)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate).cos())
            .collect();
        let spectrum = transform(&signal, sample_rate).unwrap();
        let half = spectrum.len() / 2;
        let (peak, _) = spectrum.magnitudes[..half]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap();

        let bin_width = sample_rate / spectrum.len() as f64;
        assert!((spectrum.frequencies[peak] - freq).abs() <= bin_width, "freq {}", freq);
    }
}

#[test]
fn band_stop_cascade_rejects_dc() {
    let step = [1.0, 1.0, 1.0, 1.0, 1.0];
    let low = low_pass_filter(&step, 1.0, 100.0).unwrap();
    let stopped = high_pass_filter(&low, 1.0, 100.0).unwrap();

    // High-pass stage never grows and decays geometrically once the input settles
    for pair in stopped.windows(2) {
        assert!(pair[1].abs() <= pair[0].abs() + 1e-15);
    }
    assert!(stopped[4].abs() < stopped[0].abs() * 1e-3);

    let longer = high_pass_filter(&low_pass_filter(&[1.0; 20], 1.0, 100.0).unwrap(), 1.0, 100.0).unwrap();
    assert!(longer[19].abs() < 1e-12);
}

#[test]
fn streaming_filter_matches_batch() {
    let signal: Vec<f64> = (0..1000).map(|n| ((n * 37) % 101) as f64 / 50.0 - 1.0).collect();
    let config = FilterConfig {
        low_cutoff_hz: 3.0,
        high_cutoff_hz: 30.0,
        sample_rate_hz: 200.0,
        order: 1,
    };

    let batch = low_pass_filter(&high_pass_filter(&signal, 3.0, 200.0).unwrap(), 30.0, 200.0).unwrap();

    let mut hp = FilterState::new(config.low_alpha().unwrap());
    let mut lp = FilterState::new(config.high_alpha().unwrap());
    let mut channel = Channel::new(StreamConfig {
        filter: config,
        mode: FilterMode::Bandpass,
        spectrum_interval: 100,
        ..StreamConfig::default()
    })
    .unwrap();

    for (n, &x) in signal.iter().enumerate() {
        let by_hand = low_pass(high_pass(x, &mut hp), &mut lp);
        let update = channel.on_sample(Sample::new(n as i64, x));

        assert!((by_hand - batch[n]).abs() < 1e-9);
        assert!((update.filtered.value - batch[n]).abs() < 1e-9);
    }
}

#[test]
fn channel_windows_respect_age_bound() {
    init_logging();
    let mut channel = Channel::new(StreamConfig {
        retention: RetentionPolicy {
            max_samples: 1000,
            max_age_ms: Some(100),
        },
        ..StreamConfig::default()
    })
    .unwrap();

    for t in 0..500 {
        channel.on_sample(Sample::new(t * 5, 1.0));
    }

    // 5 ms spacing, 100 ms horizon: 21 samples inclusive
    assert_eq!(channel.raw_window().len(), 21);
    assert_eq!(channel.filtered_window().len(), 21);
}

#[test]
fn channel_range_restriction_applies_to_both_spectra() {
    let mut channel = Channel::new(StreamConfig {
        filter: FilterConfig {
            low_cutoff_hz: 0.5,
            high_cutoff_hz: 3.0,
            sample_rate_hz: 8.0,
            order: 1,
        },
        ..StreamConfig::default()
    })
    .unwrap();
    channel
        .apply_update(&ConfigUpdate::from_json(r#"{"minFreqHz": 1, "maxFreqHz": 3}"#).unwrap())
        .unwrap();

    let mut last = None;
    for (t, &v) in [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0].iter().enumerate() {
        last = Some(channel.on_sample(Sample::new(t as i64, v)));
    }
    let update = last.unwrap();

    let raw = update.raw_spectrum.unwrap();
    let filtered = update.filtered_spectrum.unwrap();
    assert_eq!(raw.frequencies, vec![1.0, 2.0, 3.0]);
    assert_eq!(filtered.frequencies, vec![1.0, 2.0, 3.0]);
    assert_eq!(raw.magnitudes.len(), raw.frequencies.len());
}

#[test]
fn processor_publishes_latest_update() {
    init_logging();
    let mut processor = StreamProcessor::new(StreamConfig::default(), 128).unwrap();
    let latest = LatestUpdate::new();
    processor.start(latest.clone());

    for t in 0..50 {
        processor.push_sample(Sample::new(t, 2.5));
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut newest = 0;
    while Instant::now() < deadline && newest < 50 {
        if let Some(update) = latest.take() {
            newest = update.sequence;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    processor.stop();

    assert_eq!(newest, 50);
    assert_eq!(processor.dropped_samples(), 0);
}
