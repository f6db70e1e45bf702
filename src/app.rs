//! Whistle counting application entry point.
//!
//! Orchestrates the complete flow:
//! sample source → block stream → detector → event sink

use crate::audio::capture::{CpalSampleSource, suppress_audio_warnings};
use crate::audio::source::SampleSource;
use crate::audio::stream::{BlockStream, BlockStreamConfig};
use crate::audio::wav::WavSampleSource;
use crate::cli::Cli;
use crate::config::Config;
use crate::detect::detector::{Detector, DetectorConfig};
use crate::error::Result;
use crate::sink::{ConsoleSink, EventSink};
use owo_colors::OwoColorize;

/// Run the listen command: capture audio and count whistles until the
/// source ends or Ctrl-C arrives.
///
/// Configuration is validated on the merged (file + env + CLI) result
/// before any audio device is touched; an inconsistent hysteresis band is
/// a startup error, never a runtime one.
pub async fn run_listen_command(mut config: Config, cli: &Cli) -> Result<()> {
    cli.apply_to(&mut config);
    let detector_config = config.detector_config();
    detector_config.validate()?;

    let mut sink = ConsoleSink::new(cli.quiet, cli.verbose);

    if let Some(path) = &cli.wav {
        let source = WavSampleSource::open(path, detector_config.sample_rate)?;
        if !cli.quiet {
            eprintln!("{}", format!("Reading {}...", path.display()).dimmed());
        }
        run_detection(source, detector_config, &mut sink).await?;
    } else {
        // Suppress noisy JACK/ALSA warnings before audio init
        suppress_audio_warnings();
        let source =
            CpalSampleSource::new(config.audio.device.as_deref(), detector_config.sample_rate)?;
        if !cli.quiet {
            eprintln!("{}", "Listening... press Ctrl-C to exit.".dimmed());
        }
        run_detection(source, detector_config, &mut sink).await?;
    }

    Ok(())
}

/// Drives detection over any sample source until it ends or Ctrl-C.
///
/// The detector is owned by this task alone; blocks are processed strictly
/// in arrival order. Returns the accepted whistle total.
pub async fn run_detection<S, K>(source: S, config: DetectorConfig, sink: &mut K) -> Result<u32>
where
    S: SampleSource + 'static,
    K: EventSink,
{
    let stream_config = BlockStreamConfig {
        block_size: config.block_size,
        sample_rate: config.sample_rate,
        ..BlockStreamConfig::default()
    };
    let stream = BlockStream::with_config(source, stream_config);
    let (mut rx, handle) = stream.start()?;

    let mut detector = Detector::new(config)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let run_result = loop {
        tokio::select! {
            maybe_block = rx.recv() => {
                match maybe_block {
                    Some(block) => match detector.process_block(&block) {
                        Ok(Some(event)) => {
                            sink.handle(&event)?;
                        }
                        Ok(None) => {}
                        Err(e) => break Err(e),
                    },
                    // Source ended (finite input) or capture stopped.
                    None => break Ok(()),
                }
            }
            _ = &mut ctrl_c => {
                // Move past the echoed ^C before the summary
                println!();
                break Ok(());
            }
        }
    };

    handle.stop();
    run_result?;

    Ok(sink.finish().unwrap_or_else(|| detector.accepted_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::source::MockSampleSource;
    use crate::sink::CollectorSink;

    /// Concatenated quiet/loud/quiet waveform: one clean whistle.
    fn whistle_waveform() -> Vec<f32> {
        let mut samples = Vec::new();
        samples.extend(vec![0.001f32; 1024 * 40]); // seed + warm-up + converge
        samples.extend(vec![0.01f32; 1024 * 40]); // ~2.5s blast
        samples.extend(vec![0.001f32; 1024 * 16]); // ~1s quiet to close
        samples
    }

    #[tokio::test]
    async fn counts_one_whistle_end_to_end() {
        let source = MockSampleSource::new()
            .with_samples(whistle_waveform())
            .finite();
        let mut sink = CollectorSink::new();

        let config = DetectorConfig {
            min_duration: 1.0,
            max_duration: 15.0,
            ..DetectorConfig::default()
        };

        let total = run_detection(source, config, &mut sink).await.unwrap();

        assert_eq!(total, 1);
        let ends: Vec<_> = sink
            .events()
            .iter()
            .filter_map(|e| e.as_end().copied())
            .collect();
        assert_eq!(ends.len(), 1);
        assert!(ends[0].accepted);
        assert_eq!(ends[0].count, 1);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_processing() {
        let source = MockSampleSource::new().finite();
        let mut sink = CollectorSink::new();

        let config = DetectorConfig {
            rise_multiplier: 2.0,
            fall_multiplier: 2.0,
            ..DetectorConfig::default()
        };

        assert!(run_detection(source, config, &mut sink).await.is_err());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn silence_counts_nothing() {
        let source = MockSampleSource::new()
            .with_samples(vec![0.001f32; 1024 * 64])
            .finite();
        let mut sink = CollectorSink::new();

        let total = run_detection(source, DetectorConfig::default(), &mut sink)
            .await
            .unwrap();

        assert_eq!(total, 0);
        assert!(sink.events().is_empty());
    }
}
