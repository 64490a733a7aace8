use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use log::debug;
use rustc_hash::FxHashMap;

use crate::config::RunnerConfig;
use crate::SharedPtr;

/// Intrinsic state, shared by every car of the same model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedState {
    pub brand: String,
    pub model: String,
    pub color: String,
}

impl SharedState {
    pub fn new(brand: &str, model: &str, color: &str) -> Self {
        SharedState {
            brand: brand.to_string(),
            model: model.to_string(),
            color: color.to_string(),
        }
    }

    fn key(&self) -> String {
        format!("{}_{}_{}", self.brand, self.model, self.color)
    }
}

impl fmt::Display for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} , {} , {} ]", self.brand, self.model, self.color)
    }
}

/// Extrinsic state, supplied by the client on every call.
#[derive(Debug, Clone)]
pub struct UniqueState {
    pub owner: String,
    pub plates: String,
}

impl fmt::Display for UniqueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} , {} ]", self.owner, self.plates)
    }
}

/// Copying a flyweight copies the handle, never the shared state.
#[derive(Clone)]
pub struct Flyweight {
    shared: SharedPtr<SharedState>,
}

impl Flyweight {
    pub fn shared(&self) -> &SharedPtr<SharedState> {
        &self.shared
    }

    pub fn operation(&self, unique: &UniqueState) -> String {
        format!(
            "Flyweight: Displaying shared ({}) and unique ({unique}) state.",
            self.shared
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Reused,
    Created,
}

#[derive(Default)]
pub struct FlyweightFactory {
    flyweights: RefCell<FxHashMap<String, Flyweight>>,
}

impl FlyweightFactory {
    pub fn new(states: impl IntoIterator<Item = SharedState>) -> Self {
        let factory = FlyweightFactory::default();
        for state in states {
            factory.get_flyweight(&state);
        }
        factory
    }

    pub fn get_flyweight(&self, state: &SharedState) -> (Flyweight, Lookup) {
        let key = state.key();
        let mut flyweights = self.flyweights.borrow_mut();
        if let Some(existing) = flyweights.get(&key) {
            debug!("reusing flyweight {key}");
            return (existing.clone(), Lookup::Reused);
        }

        debug!("creating flyweight {key}");
        let flyweight = Flyweight {
            shared: SharedPtr::new(state.clone()),
        };
        flyweights.insert(key, flyweight.clone());
        (flyweight, Lookup::Created)
    }

    pub fn len(&self) -> usize {
        self.flyweights.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flyweights.borrow().is_empty()
    }

    /// Cache keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.flyweights.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn list_flyweights(out: &mut dyn Write, factory: &FlyweightFactory) -> io::Result<()> {
    writeln!(out, "\nFlyweightFactory: I have {} flyweights:", factory.len())?;
    for key in factory.keys() {
        writeln!(out, "{key}")?;
    }
    Ok(())
}

fn add_car_to_police_database(
    out: &mut dyn Write,
    factory: &FlyweightFactory,
    unique: UniqueState,
    shared: SharedState,
) -> io::Result<()> {
    writeln!(out, "\nClient: Adding a car to database.")?;
    let (flyweight, lookup) = factory.get_flyweight(&shared);
    match lookup {
        Lookup::Reused => writeln!(out, "FlyweightFactory: Reusing existing flyweight.")?,
        Lookup::Created => {
            writeln!(out, "FlyweightFactory: Can't find a flyweight, creating new one.")?
        }
    }
    writeln!(out, "{}", flyweight.operation(&unique))
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let factory = SharedPtr::new(FlyweightFactory::new([
        SharedState::new("Chevrolet", "Camaro2018", "pink"),
        SharedState::new("Mercedes Benz", "C300", "black"),
        SharedState::new("Mercedes Benz", "C500", "red"),
        SharedState::new("BMW", "M5", "red"),
        SharedState::new("BMW", "X6", "white"),
    ]));
    list_flyweights(out, &factory)?;

    let owner = UniqueState {
        owner: "James Doe".to_string(),
        plates: "CL234IR".to_string(),
    };
    add_car_to_police_database(out, &factory, owner.clone(), SharedState::new("BMW", "M5", "red"))?;
    add_car_to_police_database(out, &factory, owner, SharedState::new("BMW", "X1", "red"))?;

    list_flyweights(out, &factory)
}
