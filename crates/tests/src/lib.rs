//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 真实节拍 + 设备通知 + 目录传输目标的 e2e 测试
//! - 配置驱动的组件装配测试

#[cfg(test)]
mod contract_tests {
    use contracts::{ControllerState, DeviceSession, Sample, SAMPLE_WIDTH};

    #[test]
    fn test_contract_snapshot() {
        assert_eq!(SAMPLE_WIDTH, 6);
        assert_eq!(Sample::default().to_le_bytes().len(), SAMPLE_WIDTH);
        assert_eq!(ControllerState::default(), ControllerState::Idle);
        assert_eq!(DeviceSession::default(), DeviceSession::NotPresent);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use acquisition::{AcquisitionController, CadenceTimer, ControllerConfig, StepOutcome};
    use contracts::{DeviceMonitor, Sample, SensorSource, StagingLog, TransferSink};
    use devices::{
        IndicatorProbe, MockAccelerometer, MountWatcher, RecordingIndicator, ScriptedMonitor,
    };
    use staging::MemoryStagingLog;
    use tempfile::tempdir;
    use transfer::DirectorySink;

    type E2eController = AcquisitionController<MockAccelerometer, MemoryStagingLog, DirectorySink>;

    fn build(mount_point: &Path) -> (E2eController, IndicatorProbe) {
        let transfer_led = RecordingIndicator::new();
        let probe = transfer_led.probe();
        let controller = AcquisitionController::new(
            ControllerConfig {
                chunk_capacity: 32,
                ..Default::default()
            },
            MockAccelerometer::with_defaults("acc"),
            MemoryStagingLog::new(64 * 1024),
            DirectorySink::new("usb", mount_point),
            Box::new(transfer_led),
            Box::new(RecordingIndicator::new()),
        );
        (controller, probe)
    }

    /// Step until `done` returns true or the deadline passes, collecting staged samples
    async fn run_until<S, L, T>(
        controller: &mut AcquisitionController<S, L, T>,
        samples: &mut Vec<Sample>,
        timeout: Duration,
        mut done: impl FnMut(&StepOutcome) -> bool,
    ) -> Option<StepOutcome>
    where
        S: SensorSource,
        L: StagingLog,
        T: TransferSink,
    {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let outcome = controller.step().expect("controller halted");
            if let StepOutcome::Sampled(sample) = &outcome {
                samples.push(*sample);
            }
            if done(&outcome) {
                return Some(outcome);
            }
            if outcome == StepOutcome::Idle {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
        None
    }

    fn encode(samples: &[Sample]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// End-to-end: CadenceTimer -> controller -> DirectorySink, attach scripted
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_scripted_attach_drains_all_samples() {
        let dir = tempdir().unwrap();
        let (mut controller, transfer_led) = build(dir.path());

        let timer = Arc::new(CadenceTimer::new(controller.handle(), 2));
        let ticker = timer.spawn(Duration::from_millis(1));
        let monitor = ScriptedMonitor::new(ScriptedMonitor::attach_after(Duration::from_millis(60)));
        monitor.listen(controller.handle().device_callback());

        let mut samples = Vec::new();
        let drained = run_until(&mut controller, &mut samples, Duration::from_secs(5), |o| {
            matches!(o, StepOutcome::Drained(_))
        })
        .await;
        ticker.abort();
        monitor.stop();

        let Some(StepOutcome::Drained(report)) = drained else {
            panic!("no drain within deadline");
        };
        assert!(!samples.is_empty());
        assert_eq!(report.bytes_transferred, samples.len() * 6);
        assert_eq!(report.write_calls as usize, (samples.len() * 6).div_ceil(32));

        let written = std::fs::read(dir.path().join("data.txt")).unwrap();
        assert_eq!(written, encode(&samples));
        assert_eq!(controller.pending(), 0);
        assert!(transfer_led.is_on());
    }

    fn count_samples(target: usize) -> impl FnMut(&StepOutcome) -> bool {
        let mut seen = 0;
        move |outcome| {
            if matches!(outcome, StepOutcome::Sampled(_)) {
                seen += 1;
            }
            seen >= target
        }
    }

    /// End-to-end: MountWatcher sees the device come, go and come back
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_mount_watcher_reattach() {
        let root = tempdir().unwrap();
        let mount_point = root.path().join("usb");
        let target = mount_point.join("data.txt");
        let (mut controller, _) = build(&mount_point);

        let timer = Arc::new(CadenceTimer::new(controller.handle(), 2));
        let ticker = timer.spawn(Duration::from_millis(1));
        let watcher = MountWatcher::new(&mount_point, Duration::from_millis(5));
        watcher.listen(controller.handle().device_callback());
        let timeout = Duration::from_secs(5);

        // No device: samples only accumulate
        let mut first = Vec::new();
        run_until(&mut controller, &mut first, timeout, count_samples(5))
            .await
            .expect("no samples staged");
        assert_eq!(controller.pending(), 30);

        // Attach: everything staged so far lands on the device
        std::fs::create_dir(&mount_point).unwrap();
        run_until(&mut controller, &mut first, timeout, |o| {
            matches!(o, StepOutcome::Drained(_))
        })
        .await
        .expect("no drain after attach");
        assert_eq!(std::fs::read(&target).unwrap(), encode(&first));
        assert_eq!(controller.pending(), 0);

        // Detach: the device is released, sampling carries on
        std::fs::remove_dir_all(&mount_point).unwrap();
        let mut second = Vec::new();
        run_until(&mut controller, &mut second, timeout, |o| {
            *o == StepOutcome::DeviceReleased
        })
        .await
        .expect("detach not observed");
        run_until(&mut controller, &mut second, timeout, count_samples(3))
            .await
            .expect("sampling did not resume");
        assert_eq!(controller.pending(), second.len() * 6);

        // Reattach: only samples taken since the first drain are written
        std::fs::create_dir(&mount_point).unwrap();
        run_until(&mut controller, &mut second, timeout, |o| {
            matches!(o, StepOutcome::Drained(_))
        })
        .await
        .expect("no drain after reattach");
        assert_eq!(std::fs::read(&target).unwrap(), encode(&second));

        ticker.abort();
        watcher.stop();
        assert_eq!(controller.stats().drains_completed, 2);
        assert_eq!(controller.stats().devices_released, 1);
    }
}

#[cfg(test)]
mod config_tests {
    use std::path::Path;

    use acquisition::{AcquisitionController, ControllerConfig, DeviceEvent, StepOutcome};
    use config_loader::ConfigLoader;
    use contracts::{LoggerError, Sample};
    use devices::{create_sensor, RecordingIndicator};
    use staging::create_staging_log;
    use tempfile::tempdir;
    use transfer::DirectorySink;

    fn write_replay(path: &Path, samples: &[Sample]) -> Vec<u8> {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        std::fs::write(path, &bytes).unwrap();
        bytes
    }

    /// Replay sensor + file staging + directory sink, assembled from TOML
    #[test]
    fn test_config_driven_replay_round_trip() {
        let dir = tempdir().unwrap();
        let replay = dir.path().join("recorded.bin");
        let usb = dir.path().join("usb");
        std::fs::create_dir(&usb).unwrap();

        let recorded = write_replay(
            &replay,
            &[
                Sample::new(1, 2, 3),
                Sample::new(-1, -2, -3),
                Sample::new(i16::MAX, i16::MIN, 0),
                Sample::new(100, 200, 300),
            ],
        );

        let toml = format!(
            r#"
[sensor]
kind = "replay"
replay_path = "{replay}"
loop_playback = false

[staging]
backend = "file"
path = "{staging}"

[transfer]
mount_point = "{usb}"
chunk_capacity = 10
"#,
            replay = replay.display(),
            staging = dir.path().join("staging.bin").display(),
            usb = usb.display(),
        );
        let blueprint =
            ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml).unwrap();

        let fault_led = RecordingIndicator::new();
        let fault = fault_led.probe();
        let mut controller = AcquisitionController::new(
            ControllerConfig::from_blueprint(&blueprint),
            create_sensor(&blueprint.sensor).unwrap(),
            create_staging_log(&blueprint.staging).unwrap(),
            DirectorySink::from_config("usb", &blueprint.transfer),
            Box::new(RecordingIndicator::new()),
            Box::new(fault_led),
        );
        let handle = controller.handle();

        for _ in 0..4 {
            handle.raise_sample_due();
            assert!(matches!(controller.step().unwrap(), StepOutcome::Sampled(_)));
        }

        handle.notify(DeviceEvent::ClassActive);
        let StepOutcome::Drained(report) = controller.step().unwrap() else {
            panic!("drain did not complete");
        };
        assert_eq!(report.write_calls, 3);
        assert_eq!(std::fs::read(usb.join("data.txt")).unwrap(), recorded);
        assert_eq!(
            std::fs::metadata(dir.path().join("staging.bin")).unwrap().len(),
            0
        );

        // The recording is exhausted: the next sample is a fatal sensor error
        handle.raise_sample_due();
        assert!(matches!(
            controller.step(),
            Err(LoggerError::SensorRead { .. })
        ));
        assert!(fault.is_on());
        assert!(matches!(controller.step(), Err(LoggerError::Halted)));
    }
}
