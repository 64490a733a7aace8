use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub trait Command {
    fn execute(&self, out: &mut dyn Write) -> io::Result<()>;
}

pub struct SimpleCommand {
    payload: String,
}

impl SimpleCommand {
    pub fn new(payload: impl Into<String>) -> Self {
        SimpleCommand {
            payload: payload.into(),
        }
    }
}

impl Command for SimpleCommand {
    fn execute(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "SimpleCommand: See, I can do simple things like printing ({})",
            self.payload
        )
    }
}

/// Does the actual work behind complex commands.
#[derive(Debug, Default)]
pub struct Receiver;

impl Receiver {
    pub fn do_something(&self, a: &str) -> String {
        format!("Receiver: Working on ({a}.)")
    }

    pub fn do_something_else(&self, b: &str) -> String {
        format!("Receiver: Also working on ({b}.)")
    }
}

pub struct ComplexCommand {
    receiver: SharedPtr<Receiver>,
    a: String,
    b: String,
}

impl ComplexCommand {
    pub fn new(receiver: &SharedPtr<Receiver>, a: &str, b: &str) -> Self {
        ComplexCommand {
            receiver: receiver.clone(),
            a: a.to_string(),
            b: b.to_string(),
        }
    }
}

impl Command for ComplexCommand {
    fn execute(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "ComplexCommand: Complex stuff should be done by a receiver object.")?;
        writeln!(out, "{}", self.receiver.do_something(&self.a))?;
        writeln!(out, "{}", self.receiver.do_something_else(&self.b))
    }
}

pub fn command<C: Command + 'static>(command: C) -> SharedPtr<dyn Command> {
    SharedPtr::upcast::<dyn Command>(&SharedPtr::new(command), |c| c)
}

/// Runs optional commands around its own work. Unset hooks are empty
/// handles and are skipped.
#[derive(Default)]
pub struct Invoker {
    on_start: SharedPtr<dyn Command>,
    on_finish: SharedPtr<dyn Command>,
}

impl Invoker {
    pub fn set_on_start(&mut self, command: SharedPtr<dyn Command>) {
        self.on_start = command;
    }

    pub fn set_on_finish(&mut self, command: SharedPtr<dyn Command>) {
        self.on_finish = command;
    }

    pub fn do_something_important(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Invoker: Does anybody want something done before I begin?")?;
        if let Some(command) = SharedPtr::get(&self.on_start) {
            command.execute(out)?;
        }
        writeln!(out, "Invoker: ...doing something really important...")?;
        writeln!(out, "Invoker: Does anybody want something done after I finish?")?;
        if let Some(command) = SharedPtr::get(&self.on_finish) {
            command.execute(out)?;
        }
        Ok(())
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let mut invoker = Invoker::default();
    invoker.set_on_start(command(SimpleCommand::new("Say Hi!")));
    let receiver = SharedPtr::new(Receiver);
    invoker.set_on_finish(command(ComplexCommand::new(&receiver, "Send email", "Save report")));
    invoker.do_something_important(out)
}
