use std::{
    io,
    sync::{Arc, Mutex},
};

use givenspecs::{
    report, Config, Registry, Report, ScenarioContext, StepInput, StepResolver,
    Table,
};

/// Shared in-memory log sink.
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn steps_are_logged() {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .finish();

    let registry = Registry::builder()
        .given("a table", |_: &mut ScenarioContext, _: Table| {})
        .when("it breaks", |_: &mut ScenarioContext| {
            Err::<(), _>(anyhow::anyhow!("boom"))
        })
        .build()
        .unwrap();

    tracing::subscriber::with_default(subscriber, || {
        let mut resolver =
            StepResolver::new(&registry, Report::new(), Config::default());
        let feature = report::Feature::new("logs", "Logs", 1, vec![], None);
        let scenario = report::Scenario::new("logs;one", "One", 2, vec![]);
        _ = resolver.scenario_reset(&feature, scenario, vec![]).unwrap();

        let table = Table::from_raw([["name"], ["Alice"]]).unwrap();
        _ = resolver.given(StepInput::new("a table").table(table));
        _ = resolver.when("it breaks");
        _ = resolver.then("anything");
    });

    let logs = buffer.contents();
    for expected in [
        "-> Given a table",
        "| Alice |",
        "... ok",
        "-> When it breaks",
        "... error: boom",
        "-> Then anything",
        "... skipped",
    ] {
        assert!(logs.contains(expected), "missing `{expected}` in:\n{logs}");
    }
}
