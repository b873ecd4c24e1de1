use std::fs;

use givenspecs::{
    document, gherkin, report::Status, Config, FeatureModel, Registry, Report,
    Runner, ScenarioContext, Table,
};
use tempfile::NamedTempFile;

fn parse(path: &str) -> FeatureModel {
    let feature =
        gherkin::Feature::parse_path(path, gherkin::GherkinEnv::default())
            .unwrap();
    FeatureModel::new(&document::Feature::from(&feature))
}

fn cucumbers(ctx: &mut ScenarioContext) -> &mut u32 {
    ctx.get_mut::<u32>("cucumbers").unwrap()
}

fn registry() -> Registry {
    Registry::builder()
        .given("the basket is empty", |ctx: &mut ScenarioContext| {
            ctx.insert("cucumbers", 0_u32);
        })
        .given(r"there are (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
            ctx.insert("cucumbers", n);
        })
        .when(r"I eat (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
            let left = cucumbers(ctx);
            *left = left
                .checked_sub(n)
                .ok_or_else(|| anyhow::anyhow!("not enough cucumbers"))?;
            anyhow::Ok(())
        })
        .when("I eat (?:some )?cucumbers", |_: &mut ScenarioContext| {})
        .step("I (?:eat|devour) cucumbers", |_: &mut ScenarioContext| {})
        .when("I write a letter", |ctx: &mut ScenarioContext, text: String| {
            ctx.log(&text);
            ctx.insert("letter", text);
        })
        .then(r"I should have (\d+) cucumbers", |ctx: &mut ScenarioContext, n: u32| {
            let left = *cucumbers(ctx);
            anyhow::ensure!(left == n, "expected {n} cucumbers, found {left}");
            Ok(())
        })
        .then("the leftovers are", |ctx: &mut ScenarioContext, table: Table| {
            let row = table.row(0).unwrap();
            assert_eq!(
                row.get("cucumbers"),
                Some(cucumbers(ctx).to_string().as_str()),
            );
            assert_ne!(row.get("row"), Some("<givenSpecsIdx>"));
        })
        .build()
        .unwrap()
}

#[test]
fn runs_outlines_per_examples_row() {
    let registry = registry();
    let report = Report::new();
    let mut runner = Runner::new(&registry, report.clone(), Config::default());

    let summary = runner.run(&parse("tests/features/eating.feature")).unwrap();

    assert_eq!((summary.passed, summary.failed), (6, 0));
    let cases = summary
        .outcomes
        .iter()
        .map(|o| (o.scenario.as_str(), o.case))
        .collect::<Vec<_>>();
    assert_eq!(
        cases,
        [
            ("Plain eating", None),
            ("Eating some - small", Some(1)),
            ("Eating some - small", Some(2)),
            ("Eating some - big", Some(1)),
            ("Eating some - big", Some(2)),
            ("Eating some - big", Some(3)),
        ],
    );

    let features = report.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].id, "eating-cucumbers");
    assert_eq!(features[0].elements.len(), 6);

    let small = &features[0].elements[1];
    assert_eq!(small.id, "eating-cucumbers;eating-some-small");
    assert_eq!(
        small.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        ["@outline", "@small"],
    );
    let names = small.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            "the basket is empty",
            "there are 12 cucumbers",
            "I eat 5 cucumbers",
            "I should have 7 cucumbers",
            "the leftovers are",
        ],
    );
    assert_eq!(small.steps[4].keyword, "Then ");
    assert!(small.steps.iter().all(|s| s.result.status == Status::Passed));
}

#[test]
fn failures_are_isolated_per_scenario() {
    let registry = registry();
    let report = Report::new();
    let mut runner = Runner::new(&registry, report.clone(), Config::default());

    let summary = runner.run(&parse("tests/features/failing.feature")).unwrap();

    assert_eq!((summary.passed, summary.failed), (2, 3));
    let errors = summary
        .outcomes
        .iter()
        .map(|o| o.error.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(
        errors,
        [
            Some("no step for When -> I juggle them"),
            Some(
                "multiple step implementations founds for When -> I eat \
                 cucumbers",
            ),
            Some("not enough cucumbers"),
            None,
            None,
        ],
    );

    let statuses = |i: usize| {
        report.features()[0].elements[i]
            .steps
            .iter()
            .map(|s| s.result.status)
            .collect::<Vec<_>>()
    };
    assert_eq!(statuses(0), [Status::Passed, Status::Pending, Status::Skipped]);
    assert_eq!(
        statuses(1),
        [Status::Passed, Status::Ambiguous, Status::Skipped],
    );
    assert_eq!(statuses(2), [Status::Passed, Status::Failed, Status::Skipped]);
    assert_eq!(statuses(4), [Status::Undefined, Status::Undefined]);

    let letter = &report.features()[0].elements[3].steps[1];
    assert_eq!(letter.embeddings.len(), 1);
    assert_eq!(
        letter.embeddings[0].mime_type.essence_str(),
        "text/x.cucumber.log+plain",
    );
}

#[test]
fn report_is_written_as_json() {
    let file = NamedTempFile::new().unwrap();
    let config = Config::default().with_report_path(file.path());

    let registry = registry();
    let mut runner = Runner::new(&registry, Report::new(), config);
    _ = runner.run(&parse("tests/features/failing.feature")).unwrap();
    let written = runner.finish().unwrap();

    assert_eq!(written.as_deref(), Some(file.path()));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap())
            .unwrap();

    let feature = &json[0];
    assert_eq!(feature["keyword"], "Feature");
    assert_eq!(feature["id"], "broken-steps");
    assert_eq!(feature["elements"][0]["type"], "scenario");
    assert_eq!(feature["elements"][0]["steps"][1]["keyword"], "When ");
    assert_eq!(
        feature["elements"][0]["steps"][1]["result"]["status"],
        "pending",
    );
    assert_eq!(
        feature["elements"][2]["steps"][1]["result"]["error_message"],
        "not enough cucumbers",
    );
    assert!(feature["elements"][3]["steps"][1]["arguments"][0]["content"]
        .as_str()
        .unwrap()
        .contains("Dear <name>"));
}

#[test]
fn empty_report_path_writes_nothing() {
    let registry = registry();
    let runner = Runner::new(&registry, Report::new(), Config::default());

    assert_eq!(runner.finish().unwrap(), None);
}
