use std::cell::RefCell;
use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eater {
    Monkey,
    Squirrel,
    Dog,
}

impl Eater {
    pub fn name(self) -> &'static str {
        match self {
            Eater::Monkey => "Monkey",
            Eater::Squirrel => "Squirrel",
            Eater::Dog => "Dog",
        }
    }

    pub fn food(self) -> &'static str {
        match self {
            Eater::Monkey => "Banana",
            Eater::Squirrel => "Nut",
            Eater::Dog => "MeatBall",
        }
    }
}

/// One link of the chain. `set_next` keeps chains acyclic, so an unhandled
/// request always runs off the end.
pub struct Handler {
    eater: Eater,
    next: RefCell<SharedPtr<Handler>>,
}

impl Handler {
    pub fn new(eater: Eater) -> SharedPtr<Handler> {
        SharedPtr::new(Handler {
            eater,
            next: RefCell::new(SharedPtr::empty()),
        })
    }

    pub fn eater(&self) -> Eater {
        self.eater
    }

    /// Links `next` after this handler and hands it back so calls can be
    /// chained with `and_then`. Returns `None`, leaving the old link in
    /// place, when `next` already leads back to this handler.
    pub fn set_next(&self, next: SharedPtr<Handler>) -> Option<SharedPtr<Handler>> {
        if SharedPtr::get(&next).is_some_and(|handler| handler.reaches(self)) {
            return None;
        }
        self.next.borrow_mut().clone_from(&next);
        Some(next)
    }

    fn reaches(&self, target: &Handler) -> bool {
        if std::ptr::eq(self, target) {
            return true;
        }
        let next = self.next.borrow();
        SharedPtr::get(&*next).is_some_and(|handler| handler.reaches(target))
    }

    pub fn handle(&self, request: &str) -> Option<String> {
        if request == self.eater.food() {
            return Some(format!("{}: I'll eat the {request}.", self.eater.name()));
        }
        let next = self.next.borrow();
        SharedPtr::get(&*next).and_then(|handler| handler.handle(request))
    }
}

fn client_code(out: &mut dyn Write, handler: &Handler) -> io::Result<()> {
    for food in ["Nut", "Banana", "Cup of coffee"] {
        writeln!(out, "Client: Who wants a {food}?")?;
        match handler.handle(food) {
            Some(result) => writeln!(out, "  {result}")?,
            None => writeln!(out, "  {food} was left untouched.")?,
        }
    }
    Ok(())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let monkey = Handler::new(Eater::Monkey);
    let squirrel = Handler::new(Eater::Squirrel);
    let dog = Handler::new(Eater::Dog);
    monkey
        .set_next(squirrel.clone())
        .and_then(|squirrel| squirrel.set_next(dog));

    writeln!(out, "Chain: Monkey > Squirrel > Dog\n")?;
    client_code(out, &monkey)?;

    writeln!(out, "\nSub chain: Squirrel > Dog\n")?;
    client_code(out, &squirrel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_chain() -> (SharedPtr<Handler>, SharedPtr<Handler>) {
        let monkey = Handler::new(Eater::Monkey);
        let squirrel = Handler::new(Eater::Squirrel);
        monkey
            .set_next(squirrel.clone())
            .and_then(|squirrel| squirrel.set_next(Handler::new(Eater::Dog)));
        (monkey, squirrel)
    }

    #[test]
    fn test_request_reaches_right_handler() {
        let (monkey, _) = full_chain();
        assert_eq!(monkey.handle("Banana").as_deref(), Some("Monkey: I'll eat the Banana."));
        assert_eq!(monkey.handle("Nut").as_deref(), Some("Squirrel: I'll eat the Nut."));
        assert_eq!(monkey.handle("MeatBall").as_deref(), Some("Dog: I'll eat the MeatBall."));
        assert_eq!(monkey.handle("Cup of coffee"), None);
    }

    #[test]
    fn test_sub_chain_skips_head() {
        let (_, squirrel) = full_chain();
        assert_eq!(squirrel.handle("Banana"), None);
        assert!(squirrel.handle("MeatBall").is_some());
    }

    #[test]
    fn test_set_next_shares_handler() {
        let monkey = Handler::new(Eater::Monkey);
        let dog = Handler::new(Eater::Dog);
        let returned = monkey.set_next(dog.clone()).unwrap();

        assert!(returned == dog);
        assert_eq!(SharedPtr::use_count(&dog), 3);
        drop(returned);
        assert_eq!(SharedPtr::use_count(&dog), 2);
    }

    #[test]
    fn test_relinking_releases_old_next() {
        let monkey = Handler::new(Eater::Monkey);
        let dog = Handler::new(Eater::Dog);
        monkey.set_next(dog.clone());
        monkey.set_next(Handler::new(Eater::Squirrel));

        assert_eq!(SharedPtr::use_count(&dog), 1);
        assert_eq!(monkey.handle("Nut").as_deref(), Some("Squirrel: I'll eat the Nut."));
    }

    #[test]
    fn test_cycles_rejected() {
        let (monkey, squirrel) = full_chain();

        assert!(monkey.set_next(monkey.clone()).is_none());
        assert!(squirrel.set_next(monkey.clone()).is_none());
        assert_eq!(SharedPtr::use_count(&monkey), 1);
        assert_eq!(monkey.handle("Cup of coffee"), None);
        assert_eq!(monkey.handle("MeatBall").as_deref(), Some("Dog: I'll eat the MeatBall."));
    }

    #[test]
    fn test_unlinking_with_empty_handle() {
        let (monkey, _) = full_chain();
        assert!(monkey.set_next(SharedPtr::empty()).is_some());
        assert_eq!(monkey.handle("Nut"), None);
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  Squirrel: I'll eat the Nut."));
        assert!(text.contains("  Cup of coffee was left untouched."));
        assert!(text.contains("  Banana was left untouched."));
    }
}
