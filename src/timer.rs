use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Tick(u64),
    LowTime,
    Expired,
}

/// Stops the countdown thread. Must be called on every exit path so an
/// abandoned session does not leave the thread ticking.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    stop: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

pub const LOW_TIME_SECS: u64 = 120;

/// 1Hz countdown from `duration_secs` to zero. `Expired` fires exactly once;
/// the `expired` latch guards against a duplicate even if the final ticks
/// race the receiving loop.
pub fn spawn_countdown(duration_secs: u64) -> (TimerHandle, mpsc::Receiver<TimerEvent>) {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    thread::spawn(move || {
        let mut remaining = duration_secs;
        let mut warned_low = false;
        let mut expired = false;

        if tx.send(TimerEvent::Tick(remaining)).is_err() {
            return;
        }

        loop {
            if stop_flag.load(Ordering::SeqCst) {
                return;
            }

            thread::sleep(Duration::from_secs(1));

            if stop_flag.load(Ordering::SeqCst) {
                return;
            }

            remaining = remaining.saturating_sub(1);

            if tx.send(TimerEvent::Tick(remaining)).is_err() {
                return;
            }

            if remaining == 0 {
                if !expired {
                    expired = true;
                    let _ = tx.send(TimerEvent::Expired);
                }
                return;
            }

            if remaining <= LOW_TIME_SECS && !warned_low {
                warned_low = true;
                let _ = tx.send(TimerEvent::LowTime);
            }
        }
    });

    (TimerHandle { stop }, rx)
}

pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}
