use std::io::{self, Write};
use std::panic;
use std::sync::OnceLock;

use log::info;

use crate::config::RunnerConfig;

#[derive(Debug)]
pub struct Singleton {
    value: String,
}

impl Singleton {
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Holds at most one [`Singleton`], created by the first caller.
///
/// Later callers get the same instance whatever value they pass in. The slot
/// is `Sync`, so it can be shared between threads or stored in a `static`.
#[derive(Debug, Default)]
pub struct InstanceSlot {
    cell: OnceLock<Singleton>,
}

impl InstanceSlot {
    pub const fn new() -> Self {
        InstanceSlot {
            cell: OnceLock::new(),
        }
    }

    pub fn get_or_init(&self, value: &str) -> &Singleton {
        self.cell.get_or_init(|| {
            info!("initialising singleton with {value:?}");
            Singleton {
                value: value.to_string(),
            }
        })
    }

    pub fn get(&self) -> Option<&Singleton> {
        self.cell.get()
    }
}

static PROCESS_SLOT: InstanceSlot = InstanceSlot::new();

/// The process-wide instance. Initialised once, on first call, and never
/// torn down.
pub fn process_instance(value: &str) -> &'static Singleton {
    PROCESS_SLOT.get_or_init(value)
}

const CANDIDATES: [&str; 4] = ["FOO", "BAR", "BAZ", "QUX"];

/// Races `threads` threads for `slot` and returns what each one saw.
pub fn race(slot: &InstanceSlot, threads: usize) -> Vec<String> {
    race_with(slot, threads, |i| CANDIDATES[i % CANDIDATES.len()])
}

/// A panic in any racing thread is resumed on the caller.
fn race_with<F>(slot: &InstanceSlot, threads: usize, candidate: F) -> Vec<String>
where
    F: Fn(usize) -> &'static str + Sync,
{
    let candidate = &candidate;
    let seen = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|i| scope.spawn(move |_| slot.get_or_init(candidate(i)).value().to_string()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect::<Vec<_>>()
    });
    seen.unwrap_or_else(|payload| panic::resume_unwind(payload))
}

pub fn run(out: &mut dyn Write, config: &RunnerConfig) -> io::Result<()> {
    writeln!(out, "If you see the same value, then singleton was reused (yay!)")?;
    writeln!(out, "If you see different values, then 2 singletons were created (booo!!)\n")?;
    writeln!(out, "RESULT:")?;

    let seen = race(&PROCESS_SLOT, config.singleton.threads);
    for value in &seen {
        writeln!(out, "{value}")?;
    }
    writeln!(out, "Process instance: {}", process_instance("LATE").value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        let slot = InstanceSlot::new();
        assert!(slot.get().is_none());
        assert_eq!(slot.get_or_init("FOO").value(), "FOO");
        assert_eq!(slot.get_or_init("BAR").value(), "FOO");
        assert!(std::ptr::eq(slot.get_or_init("BAZ"), slot.get().unwrap()));
    }

    #[test]
    fn test_race_agrees_on_one_value() {
        let slot = InstanceSlot::new();
        let seen = race(&slot, 8);

        assert_eq!(seen.len(), 8);
        assert!(seen.iter().all(|value| value == &seen[0]));
        assert_eq!(slot.get().map(Singleton::value), Some(seen[0].as_str()));
    }

    #[test]
    #[should_panic(expected = "no candidate for thread 1")]
    fn test_race_propagates_thread_panic() {
        let slot = InstanceSlot::new();
        race_with(&slot, 3, |i| {
            if i == 1 {
                panic!("no candidate for thread 1");
            }
            "FOO"
        });
    }

    #[test]
    fn test_process_instance_is_shared() {
        let first = process_instance("ONE");
        let second = process_instance("TWO");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_demo_transcript() {
        let mut config = RunnerConfig::default();
        config.singleton.threads = 3;
        let mut out = Vec::new();
        run(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        let values: Vec<&str> = text
            .lines()
            .skip_while(|line| *line != "RESULT:")
            .skip(1)
            .take(3)
            .collect();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|value| *value == values[0]));
    }
}
