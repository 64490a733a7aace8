use std::cell::{Cell, RefCell};
use std::io::{self, Write};

use chrono::Local;
use log::debug;

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub trait Subject {
    fn request(&self, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct RealSubject;

impl Subject for RealSubject {
    fn request(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "RealSubject: Handling request.")
    }
}

/// Stands in for a [`RealSubject`], which is either handed in up front or
/// created on the first request.
pub struct Proxy {
    real_subject: RefCell<SharedPtr<RealSubject>>,
    requests: Cell<usize>,
}

impl Proxy {
    pub fn new(real_subject: SharedPtr<RealSubject>) -> Self {
        Proxy {
            real_subject: RefCell::new(real_subject),
            requests: Cell::new(0),
        }
    }

    pub fn lazy() -> Self {
        Proxy::new(SharedPtr::empty())
    }

    pub fn real_subject(&self) -> SharedPtr<RealSubject> {
        self.real_subject.borrow().clone()
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    fn check_access(&self, out: &mut dyn Write) -> io::Result<bool> {
        writeln!(out, "Proxy: Checking access prior to firing a real request.")?;
        Ok(true)
    }

    fn log_access(&self, out: &mut dyn Write) -> io::Result<()> {
        self.requests.set(self.requests.get() + 1);
        writeln!(
            out,
            "Proxy: Logging the time of request: {}",
            Local::now().format("%H:%M:%S")
        )
    }

    fn load(&self) -> SharedPtr<RealSubject> {
        let mut slot = self.real_subject.borrow_mut();
        if SharedPtr::is_empty(&slot) {
            debug!("proxy loading its real subject");
            *slot = SharedPtr::new(RealSubject);
        }
        slot.clone()
    }
}

impl Subject for Proxy {
    fn request(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.check_access(out)? {
            self.load().request(out)?;
            self.log_access(out)?;
        }
        Ok(())
    }
}

fn client_code(out: &mut dyn Write, subject: &SharedPtr<dyn Subject>) -> io::Result<()> {
    subject.request(out)
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    writeln!(out, "Client: Executing the client code with a real subject:")?;
    let real_subject = SharedPtr::new(RealSubject);
    client_code(out, &SharedPtr::upcast::<dyn Subject>(&real_subject, |s| s))?;

    writeln!(out, "\nClient: Executing the same client code with a proxy:")?;
    let proxy = SharedPtr::new(Proxy::new(real_subject));
    client_code(out, &SharedPtr::upcast::<dyn Subject>(&proxy, |p| p))?;

    writeln!(out, "\nClient: And with a proxy that loads its subject on demand:")?;
    let lazy = SharedPtr::new(Proxy::lazy());
    client_code(out, &SharedPtr::upcast::<dyn Subject>(&lazy, |p| p))?;
    writeln!(out, "Client: The proxies served {} request(s).", proxy.requests() + lazy.requests())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_wraps_request() {
        let proxy = Proxy::new(SharedPtr::new(RealSubject));
        let mut out = Vec::new();
        proxy.request(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Proxy: Checking access prior to firing a real request.");
        assert_eq!(lines[1], "RealSubject: Handling request.");
        assert!(lines[2].starts_with("Proxy: Logging the time of request: "));
        assert_eq!(proxy.requests(), 1);
    }

    #[test]
    fn test_proxy_shares_real_subject() {
        let real = SharedPtr::new(RealSubject);
        let proxy = Proxy::new(real.clone());
        assert_eq!(SharedPtr::use_count(&real), 2);
        assert!(proxy.real_subject() == real);
    }

    #[test]
    fn test_lazy_proxy_loads_once() {
        let proxy = Proxy::lazy();
        assert!(SharedPtr::is_empty(&proxy.real_subject()));

        let mut out = Vec::new();
        proxy.request(&mut out).unwrap();
        let loaded = proxy.real_subject();
        assert!(SharedPtr::is_owning(&loaded));

        proxy.request(&mut out).unwrap();
        assert!(proxy.real_subject() == loaded);
        assert_eq!(proxy.requests(), 2);
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("RealSubject: Handling request.").count(), 3);
        assert_eq!(text.matches("Proxy: Checking access").count(), 2);
        assert!(text.contains("The proxies served 2 request(s)."));
    }
}
