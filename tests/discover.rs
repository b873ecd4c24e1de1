use givenspecs::{
    register_bindings, report, Binding, Bindings, Config, HookKind,
    HookOptions, Registry, Report, ScenarioContext, Status, StepResolver,
};

/// Calculator driven by the steps below.
struct Calculator {
    entered: Vec<i64>,
}

impl Binding for Calculator {
    fn new(ctx: &mut ScenarioContext) -> Self {
        Self { entered: ctx.remove("entered").unwrap_or_default() }
    }

    fn register(bindings: Bindings<Self>) -> Bindings<Self> {
        bindings
            .given(r"(-?\d+) is entered", Self::enter)
            .when("I add them", Self::add)
            .then(r"the result is (-?\d+)", Self::check)
            .hook(
                HookKind::BeforeScenario,
                HookOptions::default().tags(["calc"]),
                |_: &mut Self, ctx: &mut ScenarioContext| {
                    ctx.insert("prepared", true);
                },
            )
    }
}

impl Calculator {
    fn enter(&mut self, ctx: &mut ScenarioContext, n: i64) {
        self.entered.push(n);
        ctx.insert("entered", self.entered.clone());
    }

    fn add(&mut self, ctx: &mut ScenarioContext) {
        ctx.insert("result", self.entered.iter().sum::<i64>());
    }

    fn check(&mut self, ctx: &mut ScenarioContext, expected: i64) {
        assert_eq!(ctx.get::<i64>("result"), Some(&expected));
    }
}

/// Container contributing steps of another kind.
struct Printer;

impl Binding for Printer {
    fn new(_: &mut ScenarioContext) -> Self {
        Self
    }

    fn register(bindings: Bindings<Self>) -> Bindings<Self> {
        bindings.step(
            "the result is printed",
            |_: &mut Self, ctx: &mut ScenarioContext| ctx.log("printed"),
        )
    }
}

register_bindings!(Calculator, Printer);

#[test]
fn discovers_submitted_containers_once() {
    let registry = Registry::discover().unwrap();

    assert_eq!(registry.steps().len(), 4);
    assert_eq!(registry.hooks(HookKind::BeforeScenario).count(), 1);
    assert!(std::ptr::eq(registry, Registry::discover().unwrap()));
}

#[test]
fn discovered_steps_run() {
    let registry = Registry::discover().unwrap();
    let mut resolver =
        StepResolver::new(registry, Report::new(), Config::default());
    let feature = report::Feature::new("calc", "Calc", 1, vec![], None);
    let tag = report::Tag { name: "@calc".into(), line: 2 };
    let scenario = report::Scenario::new("calc;add", "Add", 3, vec![tag]);
    _ = resolver.scenario_reset(&feature, scenario, vec![]).unwrap();

    resolver.before_scenario().unwrap();
    assert_eq!(resolver.context().get::<bool>("prepared"), Some(&true));

    for step in ["2 is entered", "-5 is entered"] {
        assert_eq!(resolver.given(step).status, Status::Passed);
    }
    assert_eq!(resolver.when("I add them").status, Status::Passed);
    assert_eq!(resolver.then("the result is -3").status, Status::Passed);
    assert_eq!(resolver.and("the result is printed").status, Status::Passed);
    resolver.after_scenario().unwrap();
}
