use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::utils::entropy;

pub const DEFAULT_TICK: Duration = Duration::from_millis(200);
pub const MAX_INCREMENT: f32 = 30.0;

/// Supplies the cosmetic progress step applied on each tick.
pub trait ProgressSource: Send + Sync {
    /// A value in `[0, MAX_INCREMENT)`.
    fn next_increment(&self) -> f32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIncrements;

impl ProgressSource for RandomIncrements {
    fn next_increment(&self) -> f32 {
        (entropy::unit_interval() * f64::from(MAX_INCREMENT)) as f32
    }
}

pub struct ProgressSimulation {
    tick: Duration,
}

impl ProgressSimulation {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Reports a running total after every tick until it reaches 100.
    pub async fn run<F>(&self, source: &dyn ProgressSource, mut report: F)
    where
        F: FnMut(f32),
    {
        let mut progress = 0.0_f32;
        loop {
            tokio::time::sleep(self.tick).await;
            progress += source.next_increment().clamp(0.0, MAX_INCREMENT);
            if progress >= 100.0 {
                report(100.0);
                return;
            }
            report(progress);
        }
    }
}

/// A spawned unit of work that can be stopped explicitly and stops itself on drop.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn start<F>(runtime: &Handle, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(runtime.spawn(work)),
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct Sequence(Mutex<Vec<f32>>);

    impl ProgressSource for Sequence {
        fn next_increment(&self) -> f32 {
            let mut steps = self.0.lock().unwrap();
            if steps.is_empty() {
                29.0
            } else {
                steps.remove(0)
            }
        }
    }

    #[test]
    fn random_increments_stay_below_cap() {
        for _ in 0..500 {
            let step = RandomIncrements.next_increment();
            assert!((0.0..MAX_INCREMENT).contains(&step), "step {step}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulation_is_monotonic_and_ends_at_hundred() {
        let source = Sequence(Mutex::new(vec![10.0, 0.0, 25.5, 29.75, 29.75, 29.75]));
        let mut seen = Vec::new();
        let started = tokio::time::Instant::now();

        ProgressSimulation::new(DEFAULT_TICK)
            .run(&source, |value| seen.push(value))
            .await;

        assert_eq!(seen, vec![10.0, 10.0, 35.5, 65.25, 95.0, 100.0]);
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(started.elapsed() >= DEFAULT_TICK * 6);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_steps_are_clamped() {
        let source = Sequence(Mutex::new(vec![-5.0, 500.0]));
        let mut seen = Vec::new();

        ProgressSimulation::new(DEFAULT_TICK)
            .run(&source, |value| seen.push(value))
            .await;

        assert_eq!(seen, vec![0.0, 30.0, 59.0, 88.0, 100.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_task_never_completes() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let mut task = ScheduledTask::start(&Handle::current(), async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(task.is_running());

        task.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!task.is_running());
        assert!(!finished.load(Ordering::SeqCst));
    }
}
