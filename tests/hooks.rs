use std::sync::{Arc, Mutex};

use givenspecs::{
    report, Config, HookKind, HookOptions, Phase, Registry, Report,
    ScenarioContext, ScenarioError, StepResolver,
};

type Journal = Arc<Mutex<Vec<String>>>;

fn note(journal: &Journal, entry: impl Into<String>) {
    journal.lock().unwrap().push(entry.into());
}

fn registry(journal: &Journal) -> Registry {
    let (j1, j2, j3, j4, j5, j6) = (
        journal.clone(),
        journal.clone(),
        journal.clone(),
        journal.clone(),
        journal.clone(),
        journal.clone(),
    );
    Registry::builder()
        .before_scenario(move |_: &mut ScenarioContext| note(&j1, "default"))
        .before_scenario_with(
            HookOptions::default().order(1),
            move |_: &mut ScenarioContext| note(&j2, "first"),
        )
        .before_scenario_with(
            HookOptions::default().tags(["@db"]),
            move |_: &mut ScenarioContext| note(&j3, "db"),
        )
        .before_step(move |_: &mut ScenarioContext, text: &str| {
            note(&j4, format!("before {text}"));
        })
        .after_step(move |_: &mut ScenarioContext, text: &str| {
            note(&j5, format!("after {text}"));
        })
        .after_scenario(move |ctx: &mut ScenarioContext| {
            note(&j6, format!("done {}", ctx.tags().join(",")));
        })
        .given("a step", |_: &mut ScenarioContext| {})
        .build()
        .unwrap()
}

fn reset(resolver: &mut StepResolver<'_>, tags: &[&str]) {
    let feature = report::Feature::new("hooks", "Hooks", 1, vec![], None);
    let tags = tags
        .iter()
        .map(|t| report::Tag { name: (*t).to_owned(), line: 2 })
        .collect();
    let scenario = report::Scenario::new("hooks;one", "One", 3, tags);
    _ = resolver.scenario_reset(&feature, scenario, vec![]).unwrap();
}

#[test]
fn hooks_run_in_order_and_by_tags() {
    let journal = Journal::default();
    let registry = registry(&journal);
    let mut resolver =
        StepResolver::new(&registry, Report::new(), Config::default());

    reset(&mut resolver, &["@db"]);
    resolver.before_scenario().unwrap();
    resolver.before_step("a <raw> step").unwrap();
    _ = resolver.given("a step");
    resolver.after_step("a <raw> step").unwrap();
    resolver.after_scenario().unwrap();

    reset(&mut resolver, &["@web"]);
    resolver.before_scenario().unwrap();

    assert_eq!(
        *journal.lock().unwrap(),
        [
            "first",
            "default",
            "db",
            "before a <raw> step",
            "after a <raw> step",
            "done db",
            "first",
            "default",
        ],
    );
}

#[test]
fn hook_failures_propagate() {
    let registry = Registry::builder()
        .after_scenario(|_: &mut ScenarioContext| {
            Err::<(), _>(anyhow::anyhow!("cleanup failed"))
        })
        .before_step_with(
            HookOptions::default().tags(["flaky"]),
            |_: &mut ScenarioContext, _: &str| {
                Err::<(), _>(anyhow::anyhow!("no db"))
            },
        )
        .build()
        .unwrap();
    let mut resolver =
        StepResolver::new(&registry, Report::new(), Config::default());

    reset(&mut resolver, &["@flaky"]);
    let err = resolver.before_step("a step").unwrap_err();
    assert_eq!(err.kind, HookKind::BeforeStep);
    assert!(err.to_string().ends_with("failed: no db"));
    assert_eq!(resolver.phase(), Phase::Aborted);

    reset(&mut resolver, &[]);
    resolver.before_step("a step").unwrap();
    let err = resolver.after_scenario().unwrap_err();
    assert!(matches!(err, ScenarioError::Hook(_)));
    assert_eq!(err.as_hook().unwrap().kind, HookKind::AfterScenario);
}

#[test]
fn step_hook_attachments_are_not_reported() {
    let registry = Registry::builder()
        .before_step(|ctx: &mut ScenarioContext, text: &str| {
            ctx.log(format!("hook before {text}"));
        })
        .after_step(|ctx: &mut ScenarioContext, text: &str| {
            ctx.log(format!("hook after {text}"));
        })
        .given("(one|two)", |ctx: &mut ScenarioContext, name: String| {
            ctx.log(format!("body {name}"));
        })
        .build()
        .unwrap();
    let mut resolver =
        StepResolver::new(&registry, Report::new(), Config::default());

    reset(&mut resolver, &[]);
    for text in ["one", "two"] {
        resolver.before_step(text).unwrap();
        _ = resolver.given(text);
        resolver.after_step(text).unwrap();
    }

    let scenario = resolver.reported_scenario().unwrap();
    let logged = scenario
        .steps
        .iter()
        .map(|step| {
            step.embeddings
                .iter()
                .map(|e| String::from_utf8(e.data.decode().unwrap()).unwrap())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    assert_eq!(logged, [["body one"], ["body two"]]);
}
