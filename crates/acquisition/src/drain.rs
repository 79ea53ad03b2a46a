//! Drain protocol
//!
//! Copies every pending staged byte to the removable device in chunks of at
//! most `chunk_capacity`, then truncates the staging store. Runs to
//! completion on the main loop; the only early exit is a detach observed
//! between chunks, which aborts and keeps the staged bytes.

use std::time::Instant;

use contracts::{
    DeviceSession, DrainReport, DrainStatus, LoggerError, SensorSource, StagingLog, StorageOp,
    TransferSink,
};
use observability::record_drain_metrics;
use tracing::{debug, info, instrument, warn};

use crate::controller::{AcquisitionController, StepOutcome};

impl<S, L, T> AcquisitionController<S, L, T>
where
    S: SensorSource,
    L: StagingLog,
    T: TransferSink,
{
    #[instrument(
        name = "acquisition_drain",
        skip(self),
        fields(
            sink = %self.sink.name(),
            pending = self.pending,
            chunk_capacity = self.chunk.len()
        )
    )]
    pub(crate) fn drain(&mut self) -> Result<StepOutcome, LoggerError> {
        let started = Instant::now();
        let mut report = DrainReport::begin(self.pending);

        if self.signals.detach_pending() {
            return Ok(self.abort_drain(report, started));
        }

        if self.session == DeviceSession::NotPresent {
            if let Err(e) = self.sink.mount() {
                return self.fail_or_abort(e, report, started);
            }
            self.session = DeviceSession::Mounted;
            debug!("device mounted");
        }

        let mut handle = match self.sink.open_write(&self.config.target_file) {
            Ok(handle) => handle,
            Err(e) => return self.fail_or_abort(e, report, started),
        };

        self.staging.rewind()?;

        let mut remaining = self.pending;
        while remaining > 0 {
            if self.signals.detach_pending() {
                self.close_quietly(handle);
                return Ok(self.abort_drain(report, started));
            }

            let len = remaining.min(self.chunk.len());
            let read = self.staging.read(&mut self.chunk[..len])?;
            if read != len {
                return Err(LoggerError::short_transfer(StorageOp::Read, len, read));
            }

            let written = match self.sink.write(&mut handle, &self.chunk[..len]) {
                Ok(written) => written,
                Err(e) => return self.fail_or_abort(e, report, started),
            };
            if written != len {
                let err = LoggerError::short_transfer(StorageOp::Write, len, written);
                return self.fail_or_abort(err, report, started);
            }

            report.record_chunk(len);
            remaining -= len;
        }

        if let Err(e) = self.sink.close(handle) {
            return self.fail_or_abort(e, report, started);
        }

        self.staging.rewind()?;
        self.staging.truncate()?;
        self.pending = 0;
        self.transfer_led.on();

        report.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        let next = self.signals.complete_transfer();

        self.stats.drains_completed += 1;
        self.stats.bytes_transferred += report.bytes_transferred as u64;
        record_drain_metrics(&report);

        info!(
            bytes = report.bytes_transferred,
            writes = report.write_calls,
            duration_ms = format!("{:.2}", report.duration_ms),
            next_state = ?next,
            "Drain completed"
        );

        Ok(StepOutcome::Drained(report))
    }

    /// Sink errors after a detach are an abort, not a fault
    fn fail_or_abort(
        &mut self,
        err: LoggerError,
        report: DrainReport,
        started: Instant,
    ) -> Result<StepOutcome, LoggerError> {
        if self.signals.detach_pending() {
            debug!(error = %err, "sink error after detach");
            Ok(self.abort_drain(report, started))
        } else {
            Err(err)
        }
    }

    /// Leave pending, the staged bytes and the state set by the detach untouched
    fn abort_drain(&mut self, mut report: DrainReport, started: Instant) -> StepOutcome {
        report.status = DrainStatus::Aborted;
        report.duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.stats.drains_aborted += 1;
        record_drain_metrics(&report);

        warn!(
            pending = self.pending,
            bytes_copied = report.bytes_transferred,
            "Device detached during drain, drain aborted"
        );

        StepOutcome::DrainAborted(report)
    }

    fn close_quietly(&mut self, handle: T::Handle) {
        if let Err(e) = self.sink.close(handle) {
            debug!(error = %e, "close after detach failed, ignored");
        }
    }
}
