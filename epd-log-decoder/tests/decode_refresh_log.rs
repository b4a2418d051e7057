//! End-to-end decoding of a realistic multi-iteration refresh log

use epd_log_decoder::{Decoder, DecoderConfig, Mode};

const SESSION_LOG: &str = "\
device boot noise, discarded by the splitter
ITERATION_01
2023-10-27 10:00:00.123 [INFO] button 1 up 12345.678
2023-10-27 10:00:00.250 [DEBUG] mxc_epdc_fb: [1]
2023-10-27 10:00:00.200 [DEBUG] Sending update. height=800, waveform=DU
2023-10-27 10:00:00.350 [DEBUG] [EPDC][2]
2023-10-27 10:00:00.300 [DEBUG] Sending update. height=1200, waveform:0x1f (GC16)
2023-10-27 10:00:00.800 [INFO] update end marker=1 end time=12345900
2023-10-27 10:00:00.900 [INFO] update end marker=2 end time=12346000
ITERATION_02
2023-10-27 10:00:05.000 [INFO] button 1 up 12349.100

2023-10-27 10:00:05.100 [DEBUG] mxc_epdc_fb: [3]
2023-10-27 10:00:05.050 [DEBUG] Sending update. height=600, waveform=DU
2023-10-27 10:00:05.700 [INFO] update end marker=3 end time=12349800
ITERATION_03
no trigger event in this one
mxc_epdc_fb: [4]
Sending update. height=500, waveform=DU
update end marker=4 end time=12350000
";

#[test]
fn decodes_complete_iterations_and_skips_incomplete_ones() {
    let decoder = Decoder::new();
    let (results, stats) = decoder.decode_text_with_stats(SESSION_LOG);

    assert_eq!(stats.total_iterations, 3);
    assert_eq!(stats.extracted, 2);
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.iteration, 1);
    // GC16 is the only resolvable waveform, and also the tallest update
    assert_eq!(first.marker, "2");
    assert_eq!(first.max_height, 1200);
    assert_eq!(first.max_height_waveform, "GC16");
    assert_eq!(first.start, 345678);
    assert_eq!(first.stop, 346000);
    assert!((first.duration_secs - 0.322).abs() < 1e-9);
    assert_eq!(first.all_heights.len(), 2);
    assert_eq!(first.all_end_times.len(), 2);
    assert!(first.original_log.contains("button 1 up 12345.678"));

    let second = &results[1];
    assert_eq!(second.iteration, 2);
    assert_eq!(second.start, 349100);
    assert_eq!(second.stop, 349800);
    assert!((second.duration_secs - 0.700).abs() < 1e-9);
}

#[test]
fn results_serialize_to_json() {
    let decoder = Decoder::new();
    let results = decoder.decode_text(SESSION_LOG);

    let json = serde_json::to_string(&results).unwrap();
    let restored: Vec<epd_log_decoder::IterationResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, results);
    assert!(json.contains("\"max_height_waveform\":\"GC16\""));
}

#[test]
fn suspend_mode_log_without_delimiters() {
    let log = "\
def:pbpress:time=1751099650.205:Power button pressed
mxc_epdc_fb: [123]
Sending update. height=1200, waveform=DU
update end marker=123 end time=1751099651234
";
    let decoder = Decoder::with_config(DecoderConfig::new().with_mode(Mode::Suspend));
    let results = decoder.decode_text(log);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].iteration, 1);
    assert!((results[0].duration_secs - 1.029).abs() < 1e-9);
}
